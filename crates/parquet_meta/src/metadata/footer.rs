//! Reading and writing the file footer.
//!
//! Parquet file layout:
//!
//! ```text
//! MAGIC
//! data
//! metadata            (thrift FileMetaData, possibly encrypted)
//! 4 bytes             metadata length, little-endian
//! MAGIC
//! ```

use std::cell::RefCell;

use bytes::{Bytes, BytesMut};
use indexmap::IndexMap;
use parquet_meta_error::{ErrorKind, MetaError, Result};
use tracing::debug;

use super::column_chunk::ColumnChunkMetadata;
use super::file::FileMetadata;
use super::index::{column_index_from_thrift, offset_index_from_thrift, ColumnIndex, OffsetIndex};
use super::row_group::{decrypt_column_metadata, RowGroupMetadata};
use super::schema::{build_schema, Schema};
use crate::counters::MetadataCounters;
use crate::crypto::{ColumnMetadataDecryptor, DecryptionContext, EncryptionContext};
use crate::intern::StringInterner;
use crate::io::ByteRangeSource;
use crate::protocol::{FileMetadataHandlers, WireCodec};
use crate::thrift_gen;
use crate::types::ColumnOrder;

pub const MAGIC: &[u8; 4] = b"PAR1";

/// Metadata length followed by the magic.
pub const POSTSCRIPT_SIZE: usize = 4 + MAGIC.len();

/// Default number of trailing bytes read on the first attempt. Most footers
/// fit, larger ones need a second read.
pub const EXPECTED_FOOTER_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct FooterReadOptions<'a> {
    /// Number of trailing bytes to read speculatively.
    pub expected_footer_size: usize,
    /// Only decode the schema and file-level fields.
    pub skip_row_groups: bool,
    /// Decrypt the metadata blob before decoding.
    pub decryption: Option<DecryptionContext<'a>>,
    /// Decrypt column metadata stored with column keys.
    pub column_decryption: Option<&'a dyn ColumnMetadataDecryptor>,
    pub counters: Option<&'a MetadataCounters>,
}

impl Default for FooterReadOptions<'_> {
    fn default() -> Self {
        FooterReadOptions {
            expected_footer_size: EXPECTED_FOOTER_SIZE,
            skip_row_groups: false,
            decryption: None,
            column_decryption: None,
            counters: None,
        }
    }
}

/// Decoded footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetFooter {
    pub metadata: FileMetadata,
    /// Length of the serialized metadata, postscript excluded.
    pub metadata_len: usize,
}

/// Reads and decodes parquet footers.
///
/// Holds no per-file state, one reader can be used for any number of files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FooterReader<'a> {
    options: FooterReadOptions<'a>,
}

impl<'a> FooterReader<'a> {
    pub fn new(options: FooterReadOptions<'a>) -> Self {
        FooterReader { options }
    }

    pub fn options(&self) -> &FooterReadOptions<'a> {
        &self.options
    }

    /// Read the footer from the end of `source`.
    ///
    /// `file_size` must be the exact size of the file.
    pub fn read_footer<S>(&self, source: &mut S, file_size: u64) -> Result<ParquetFooter>
    where
        S: ByteRangeSource + ?Sized,
    {
        let identity = source.identity();
        self.read_footer_inner(source, &identity, file_size)
            .map_err(|e| e.with_file(identity))
    }

    fn read_footer_inner<S>(
        &self,
        source: &mut S,
        identity: &str,
        file_size: u64,
    ) -> Result<ParquetFooter>
    where
        S: ByteRangeSource + ?Sized,
    {
        if file_size < (MAGIC.len() + POSTSCRIPT_SIZE) as u64 {
            return Err(MetaError::corrupt(format!(
                "{identity} is not a valid parquet file"
            )));
        }

        let expected = self.options.expected_footer_size.max(POSTSCRIPT_SIZE) as u64;
        let tail_len = file_size.min(expected) as usize;
        let tail = source.read_range(file_size - tail_len as u64, tail_len)?;
        check_read_len(identity, tail_len, tail.len())?;
        let mut bytes_read = tail.len();

        let magic = &tail[tail_len - MAGIC.len()..];
        if magic != MAGIC {
            return Err(MetaError::corrupt(format!(
                "not a valid parquet file: {identity} expected magic number: {:?} got: {:?}",
                MAGIC, magic
            )));
        }

        let len_bytes: [u8; 4] = tail[tail_len - POSTSCRIPT_SIZE..tail_len - MAGIC.len()]
            .try_into()
            .map_err(|_| MetaError::corrupt("short postscript"))?;
        let metadata_len = u32::from_le_bytes(len_bytes) as usize;
        let complete_footer_size = metadata_len + POSTSCRIPT_SIZE;

        let metadata_file_offset = file_size as i64 - complete_footer_size as i64;
        if metadata_file_offset < MAGIC.len() as i64
            || metadata_file_offset + POSTSCRIPT_SIZE as i64 >= file_size as i64
        {
            return Err(MetaError::corrupt(format!(
                "corrupted parquet file: {identity} metadata index: {metadata_file_offset} out of range"
            )));
        }

        // Make sure the buffer covers the entire metadata range.
        let spliced = tail_len < complete_footer_size;
        let footer = if spliced {
            let missing = complete_footer_size - tail_len;
            let prefix = source.read_range(metadata_file_offset as u64, missing)?;
            check_read_len(identity, missing, prefix.len())?;
            bytes_read += prefix.len();

            let mut buf = BytesMut::with_capacity(complete_footer_size);
            buf.extend_from_slice(&prefix);
            buf.extend_from_slice(&tail);
            buf.freeze()
        } else {
            tail
        };

        if let Some(counters) = self.options.counters {
            counters.add_footer_bytes(bytes_read);
        }

        let start = footer.len() - complete_footer_size;
        let metadata_bytes: Bytes = footer.slice(start..start + metadata_len);

        debug!(
            file = %identity,
            %file_size,
            %metadata_len,
            %spliced,
            "reading parquet footer"
        );

        let metadata = decode_file_metadata(&metadata_bytes, &self.options)?;

        Ok(ParquetFooter {
            metadata,
            metadata_len,
        })
    }
}

fn check_read_len(identity: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(MetaError::with_kind(
            ErrorKind::Io,
            format!("short read from {identity}: expected {expected} bytes, got {got}"),
        ));
    }
    Ok(())
}

/// Decode a serialized metadata blob into file metadata.
///
/// `bytes` must be exactly the metadata, without the postscript.
pub fn decode_file_metadata(bytes: &[u8], options: &FooterReadOptions) -> Result<FileMetadata> {
    let codec = WireCodec::with_counters(options.counters);

    let version = RefCell::new(None);
    let schema: RefCell<Option<Schema>> = RefCell::new(None);
    let num_rows = RefCell::new(None);
    let row_groups = RefCell::new(Vec::new());
    let key_value_metadata = RefCell::new(IndexMap::new());
    let created_by = RefCell::new(None);
    let encryption_algorithm = RefCell::new(None);
    let footer_signing_key_metadata = RefCell::new(None);
    let mut interner = StringInterner::new();

    {
        let mut handlers = FileMetadataHandlers {
            on_version: Some(Box::new(|v: i32| -> Result<()> {
                *version.borrow_mut() = Some(v);
                Ok(())
            })),
            on_schema: Some(Box::new(|elements: Vec<thrift_gen::SchemaElement>| -> Result<()> {
                if elements.is_empty() {
                    return Err(MetaError::corrupt("empty parquet schema"));
                }
                *schema.borrow_mut() = Some(build_schema(&elements)?);
                Ok(())
            })),
            on_num_rows: Some(Box::new(|n: i64| -> Result<()> {
                *num_rows.borrow_mut() = Some(n);
                Ok(())
            })),
            on_row_group: Some(Box::new(|mut rg: thrift_gen::RowGroup| -> Result<()> {
                if let Some(column_decryption) = options.column_decryption {
                    let ordinal = row_groups.borrow().len();
                    decrypt_column_metadata(
                        &mut rg,
                        ordinal,
                        column_decryption,
                        options.counters,
                    )?;
                }
                let schema = schema.borrow();
                let schema = schema
                    .as_ref()
                    .ok_or_else(|| MetaError::corrupt("row groups precede schema"))?;
                let rg = RowGroupMetadata::from_thrift(rg, schema, &mut interner)?;
                row_groups.borrow_mut().push(rg);
                Ok(())
            })),
            on_key_value: Some(Box::new(|kv: thrift_gen::KeyValue| -> Result<()> {
                // Later duplicates replace earlier values, keeping the first
                // position.
                key_value_metadata.borrow_mut().insert(kv.key, kv.value);
                Ok(())
            })),
            on_created_by: Some(Box::new(|s: String| -> Result<()> {
                *created_by.borrow_mut() = Some(s);
                Ok(())
            })),
            on_encryption_algorithm: Some(Box::new(
                |alg: thrift_gen::EncryptionAlgorithm| -> Result<()> {
                    *encryption_algorithm.borrow_mut() = Some(alg);
                    Ok(())
                },
            )),
            on_footer_signing_key: Some(Box::new(|key: Vec<u8>| -> Result<()> {
                *footer_signing_key_metadata.borrow_mut() = Some(key);
                Ok(())
            })),
        };

        codec.decode_file_metadata_streaming(
            bytes,
            options.decryption,
            options.skip_row_groups,
            &mut handlers,
        )?;
    }

    let schema = schema
        .into_inner()
        .ok_or_else(|| MetaError::corrupt("missing parquet schema"))?;

    Ok(FileMetadata {
        version: version.into_inner().unwrap_or_default(),
        schema,
        num_rows: num_rows.into_inner().unwrap_or_default(),
        row_groups: row_groups.into_inner(),
        key_value_metadata: key_value_metadata.into_inner(),
        created_by: created_by.into_inner(),
        encryption_algorithm: encryption_algorithm.into_inner(),
        footer_signing_key_metadata: footer_signing_key_metadata.into_inner(),
    })
}

/// Serialize `metadata` and append it to `out` followed by the postscript.
///
/// Returns the length of the serialized metadata.
pub fn write_footer(
    metadata: &FileMetadata,
    out: &mut Vec<u8>,
    encryption: Option<EncryptionContext>,
) -> Result<usize> {
    let start = out.len();
    WireCodec::new().encode(&metadata.to_thrift(), out, encryption)?;
    let metadata_len = out.len() - start;

    let len = u32::try_from(metadata_len).map_err(|_| {
        MetaError::new(format!("metadata too large for footer: {metadata_len} bytes"))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(MAGIC);

    Ok(metadata_len)
}

/// Read the plaintext crypto metadata at the start of `bytes`, returning it
/// and its serialized length.
///
/// With an encrypted footer the encrypted `FileMetaData` follows directly
/// after it.
pub fn read_file_crypto_metadata(
    bytes: &[u8],
) -> Result<(thrift_gen::FileCryptoMetaData, usize)> {
    WireCodec::new().decode_prefix(bytes, None)
}

/// Serialize crypto metadata, appending to `out`.
pub fn write_file_crypto_metadata(
    crypto_metadata: &thrift_gen::FileCryptoMetaData,
    out: &mut Vec<u8>,
) -> Result<()> {
    WireCodec::new().encode(crypto_metadata, out, None)
}

/// Read the column index referenced by `chunk`.
///
/// Returns `None` if the chunk has no column index or if its type has no
/// defined sort order.
pub fn read_column_index<S>(
    source: &mut S,
    chunk: &ColumnChunkMetadata,
) -> Result<Option<ColumnIndex>>
where
    S: ByteRangeSource + ?Sized,
{
    let reference = match chunk.column_index_reference {
        Some(reference) => reference,
        None => return Ok(None),
    };
    if chunk.primitive_type.column_order() == ColumnOrder::Undefined {
        return Ok(None);
    }

    let identity = source.identity();
    read_index_bytes(source, reference.offset, reference.length)
        .and_then(|bytes| WireCodec::new().decode::<thrift_gen::ColumnIndex>(&bytes, None))
        .and_then(|wire| column_index_from_thrift(&chunk.primitive_type, wire))
        .map_err(|e| e.with_file(identity))
}

/// Read the offset index referenced by `chunk`.
pub fn read_offset_index<S>(
    source: &mut S,
    chunk: &ColumnChunkMetadata,
) -> Result<Option<OffsetIndex>>
where
    S: ByteRangeSource + ?Sized,
{
    let reference = match chunk.offset_index_reference {
        Some(reference) => reference,
        None => return Ok(None),
    };

    let identity = source.identity();
    read_index_bytes(source, reference.offset, reference.length)
        .and_then(|bytes| WireCodec::new().decode::<thrift_gen::OffsetIndex>(&bytes, None))
        .map(|wire| Some(offset_index_from_thrift(wire)))
        .map_err(|e| e.with_file(identity))
}

fn read_index_bytes<S>(source: &mut S, offset: i64, length: i32) -> Result<Bytes>
where
    S: ByteRangeSource + ?Sized,
{
    let offset = u64::try_from(offset)
        .map_err(|_| MetaError::corrupt(format!("negative index offset: {offset}")))?;
    let length = usize::try_from(length)
        .map_err(|_| MetaError::corrupt(format!("negative index length: {length}")))?;
    source.read_range(offset, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::testutil::XorCipher;
    use crate::types::{GroupType, TypeInfo};

    fn empty_metadata() -> FileMetadata {
        FileMetadata {
            version: 1,
            schema: Schema::new(GroupType {
                info: TypeInfo::new("schema"),
                fields: Vec::new(),
            }),
            num_rows: 0,
            row_groups: Vec::new(),
            key_value_metadata: IndexMap::new(),
            created_by: None,
            encryption_algorithm: None,
            footer_signing_key_metadata: None,
        }
    }

    fn file_with_footer(metadata: &FileMetadata) -> (Bytes, usize) {
        let mut buf = MAGIC.to_vec();
        let len = write_footer(metadata, &mut buf, None).unwrap();
        (Bytes::from(buf), len)
    }

    #[test]
    fn minimal_footer() {
        let metadata = empty_metadata();
        let (mut file, len) = file_with_footer(&metadata);
        let file_size = file.len() as u64;

        let footer = FooterReader::default()
            .read_footer(&mut file, file_size)
            .unwrap();
        assert_eq!(len, footer.metadata_len);
        assert_eq!(metadata, footer.metadata);
    }

    #[test]
    fn too_small() {
        let mut file = Bytes::from_static(b"PAR1PAR1");
        let err = FooterReader::default().read_footer(&mut file, 8).unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(Some("<memory>"), err.file());
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let mut wire = empty_metadata().to_thrift();
        wire.key_value_metadata = Some(vec![
            thrift_gen::KeyValue {
                key: "a".to_string(),
                value: Some("1".to_string()),
            },
            thrift_gen::KeyValue {
                key: "b".to_string(),
                value: None,
            },
            thrift_gen::KeyValue {
                key: "a".to_string(),
                value: Some("2".to_string()),
            },
        ]);
        let mut bytes = Vec::new();
        WireCodec::new().encode(&wire, &mut bytes, None).unwrap();

        let md = decode_file_metadata(&bytes, &FooterReadOptions::default()).unwrap();
        let kvs: Vec<_> = md
            .key_value_metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
            .collect();
        assert_eq!(vec![("a", Some("2")), ("b", None)], kvs);
    }

    #[test]
    fn empty_schema_is_corrupt() {
        let mut wire = empty_metadata().to_thrift();
        wire.schema.clear();
        let mut bytes = Vec::new();
        WireCodec::new().encode(&wire, &mut bytes, None).unwrap();

        let err = decode_file_metadata(&bytes, &FooterReadOptions::default()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn counts_footer_bytes() {
        let counters = MetadataCounters::new();
        let (mut file, _) = file_with_footer(&empty_metadata());
        let file_size = file.len() as u64;

        FooterReader::new(FooterReadOptions {
            counters: Some(&counters),
            ..Default::default()
        })
        .read_footer(&mut file, file_size)
        .unwrap();

        assert_eq!(file_size, counters.footer_bytes());
        assert_eq!(0, counters.decrypted_bytes());
    }

    /// Returns at most `limit` bytes per read.
    #[derive(Debug)]
    struct ShortReads {
        inner: Bytes,
        limit: usize,
    }

    impl ByteRangeSource for ShortReads {
        fn identity(&self) -> String {
            "short".to_string()
        }

        fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes> {
            let start = offset as usize;
            Ok(self.inner.slice(start..start + len.min(self.limit)))
        }
    }

    #[test]
    fn short_tail_read_is_io_error() {
        let (file, _) = file_with_footer(&empty_metadata());
        let file_size = file.len() as u64;
        let mut source = ShortReads {
            inner: file,
            limit: 4,
        };

        let err = FooterReader::default()
            .read_footer(&mut source, file_size)
            .unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
        assert_eq!(Some("short"), err.file());
    }

    #[test]
    fn short_prefix_read_is_io_error() {
        let (file, len) = file_with_footer(&empty_metadata());
        let file_size = file.len() as u64;
        // Tail read covers only the postscript, forcing a second read of the
        // metadata that then comes back short.
        let mut source = ShortReads {
            inner: file,
            limit: POSTSCRIPT_SIZE,
        };
        assert!(len > POSTSCRIPT_SIZE);

        let err = FooterReader::new(FooterReadOptions {
            expected_footer_size: POSTSCRIPT_SIZE,
            ..Default::default()
        })
        .read_footer(&mut source, file_size)
        .unwrap_err();
        assert_eq!(ErrorKind::Io, err.kind());
    }

    #[test]
    fn crypto_metadata_precedes_encrypted_footer() {
        let cipher = XorCipher { key: 0x71 };
        let crypto_metadata = thrift_gen::FileCryptoMetaData {
            encryption_algorithm: thrift_gen::EncryptionAlgorithm::AesGcmV1(
                thrift_gen::AesParameters::default(),
            ),
            key_metadata: Some(b"footer-key".to_vec()),
        };

        let mut buf = Vec::new();
        write_file_crypto_metadata(&crypto_metadata, &mut buf).unwrap();
        let metadata = empty_metadata();
        WireCodec::new()
            .encode(
                &metadata.to_thrift(),
                &mut buf,
                Some(EncryptionContext::new(&cipher, b"footer")),
            )
            .unwrap();

        let (got, consumed) = read_file_crypto_metadata(&buf).unwrap();
        assert_eq!(crypto_metadata, got);

        let options = FooterReadOptions {
            decryption: Some(DecryptionContext::new(&cipher, b"footer")),
            ..Default::default()
        };
        let decoded = decode_file_metadata(&buf[consumed..], &options).unwrap();
        assert_eq!(metadata, decoded);
    }

    #[test]
    fn truncated_crypto_metadata_is_corrupt() {
        let crypto_metadata = thrift_gen::FileCryptoMetaData {
            encryption_algorithm: thrift_gen::EncryptionAlgorithm::AesGcmCtrV1(
                thrift_gen::AesParameters::default(),
            ),
            key_metadata: None,
        };
        let mut buf = Vec::new();
        write_file_crypto_metadata(&crypto_metadata, &mut buf).unwrap();
        buf.truncate(buf.len() - 1);

        let err = read_file_crypto_metadata(&buf).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn reader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FooterReader<'static>>();
    }
}
