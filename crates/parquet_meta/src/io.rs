use std::fmt::Debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use bytes::Bytes;
use parquet_meta_error::{ErrorKind, MetaError, Result};

/// A source of bytes that supports reading arbitrary ranges.
pub trait ByteRangeSource: Debug {
    /// Identity of the source used in logs and errors, typically a path or
    /// url.
    fn identity(&self) -> String;

    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// An error should be returned if the range cannot be completely read.
    fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes>;
}

/// Reading directly from a file. Identity is the file's debug representation
/// since `File` doesn't keep its path, wrap it in [`NamedSource`] for
/// something friendlier.
impl ByteRangeSource for File {
    fn identity(&self) -> String {
        format!("{self:?}")
    }

    fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        let mut buf = vec![0; len];
        read_at_sync(self, offset, &mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// Helper for synchronously reading into a buffer.
fn read_at_sync<R>(mut reader: R, start: u64, buf: &mut [u8]) -> Result<()>
where
    R: Read + Seek,
{
    reader.seek(SeekFrom::Start(start))?;
    reader.read_exact(buf)?;
    Ok(())
}

/// In-memory source, mostly useful for tests and already fetched files.
impl ByteRangeSource for Bytes {
    fn identity(&self) -> String {
        "<memory>".to_string()
    }

    fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        let out_of_bounds = || {
            MetaError::with_kind(
                ErrorKind::Io,
                format!(
                    "range {offset}+{len} out of bounds for {} byte buffer",
                    self.len()
                ),
            )
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.len())
            .ok_or_else(out_of_bounds)?;

        Ok(self.slice(start..end))
    }
}

/// Wraps a source with an explicit identity.
#[derive(Debug)]
pub struct NamedSource<S> {
    name: String,
    inner: S,
}

impl<S> NamedSource<S> {
    pub fn new(name: impl Into<String>, inner: S) -> Self {
        NamedSource {
            name: name.into(),
            inner,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteRangeSource> ByteRangeSource for NamedSource<S> {
    fn identity(&self) -> String {
        self.name.clone()
    }

    fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        self.inner.read_range(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn bytes_range() {
        let mut source = Bytes::from_static(b"0123456789");
        assert_eq!(Bytes::from_static(b"345"), source.read_range(3, 3).unwrap());
        assert_eq!(Bytes::from_static(b""), source.read_range(10, 0).unwrap());

        let err = source.read_range(8, 3).unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
    }

    #[test]
    fn file_range() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"hello parquet").unwrap();

        assert_eq!(Bytes::from_static(b"parquet"), file.read_range(6, 7).unwrap());

        let err = file.read_range(10, 10).unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
    }

    #[test]
    fn named_identity() {
        let source = NamedSource::new("s3://bucket/file.parquet", Bytes::new());
        assert_eq!("s3://bucket/file.parquet", source.identity());
    }
}
