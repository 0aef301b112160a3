//! Compression codecs and page decompression.
//!
//! Codec implementations come from external crates, each behind a cargo
//! feature of the same name. Decompressing with a codec whose feature is
//! disabled is an error, not a panic.

use std::fmt::Debug;

use parquet_meta_error::{MetaError, Result};

use crate::thrift_gen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
    Lz4Raw,
}

impl TryFrom<thrift_gen::CompressionCodec> for CompressionCodec {
    type Error = MetaError;

    fn try_from(value: thrift_gen::CompressionCodec) -> Result<Self> {
        Ok(match value {
            thrift_gen::CompressionCodec::UNCOMPRESSED => Self::Uncompressed,
            thrift_gen::CompressionCodec::SNAPPY => Self::Snappy,
            thrift_gen::CompressionCodec::GZIP => Self::Gzip,
            thrift_gen::CompressionCodec::LZO => Self::Lzo,
            thrift_gen::CompressionCodec::BROTLI => Self::Brotli,
            thrift_gen::CompressionCodec::LZ4 => Self::Lz4,
            thrift_gen::CompressionCodec::ZSTD => Self::Zstd,
            thrift_gen::CompressionCodec::LZ4_RAW => Self::Lz4Raw,
            other => {
                return Err(MetaError::corrupt(format!(
                    "unsupported compression codec: {}",
                    other.0
                )))
            }
        })
    }
}

impl From<CompressionCodec> for thrift_gen::CompressionCodec {
    fn from(value: CompressionCodec) -> Self {
        match value {
            CompressionCodec::Uncompressed => Self::UNCOMPRESSED,
            CompressionCodec::Snappy => Self::SNAPPY,
            CompressionCodec::Gzip => Self::GZIP,
            CompressionCodec::Lzo => Self::LZO,
            CompressionCodec::Brotli => Self::BROTLI,
            CompressionCodec::Lz4 => Self::LZ4,
            CompressionCodec::Zstd => Self::ZSTD,
            CompressionCodec::Lz4Raw => Self::LZ4_RAW,
        }
    }
}

/// Decompresses page payloads.
pub trait Decompressor: Debug + Sync + Send {
    /// Decompress `input` that was compressed with `codec`.
    ///
    /// `expected_size` is the uncompressed size declared by the page header.
    /// Implementations may use it as a capacity hint, callers verify the
    /// length of the returned buffer.
    fn decompress(
        &self,
        codec: CompressionCodec,
        input: &[u8],
        expected_size: usize,
    ) -> Result<Vec<u8>>;
}

/// Decompressor backed by the codec crates enabled at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecompressor;

impl Decompressor for DefaultDecompressor {
    fn decompress(
        &self,
        codec: CompressionCodec,
        input: &[u8],
        expected_size: usize,
    ) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        match codec {
            CompressionCodec::Uncompressed => Ok(input.to_vec()),
            #[cfg(feature = "snap")]
            CompressionCodec::Snappy => snap::raw::Decoder::new()
                .decompress_vec(input)
                .map_err(|e| MetaError::with_source("snappy decompress", Box::new(e))),
            #[cfg(feature = "flate2")]
            CompressionCodec::Gzip => {
                use std::io::Read;

                let mut out = Vec::with_capacity(expected_size);
                flate2::read::MultiGzDecoder::new(input)
                    .read_to_end(&mut out)
                    .map_err(|e| MetaError::with_source("gzip decompress", Box::new(e)))?;
                Ok(out)
            }
            #[cfg(feature = "brotli")]
            CompressionCodec::Brotli => {
                use std::io::Read;

                const BROTLI_BUFFER_SIZE: usize = 4096;
                let mut out = Vec::with_capacity(expected_size);
                brotli::Decompressor::new(input, BROTLI_BUFFER_SIZE)
                    .read_to_end(&mut out)
                    .map_err(|e| MetaError::with_source("brotli decompress", Box::new(e)))?;
                Ok(out)
            }
            #[cfg(feature = "lz4")]
            CompressionCodec::Lz4 => match try_decompress_lz4_hadoop(input, expected_size) {
                Some(out) => Ok(out),
                None => lz4_flex::block::decompress(input, expected_size)
                    .map_err(|e| MetaError::with_source("lz4 decompress", Box::new(e))),
            },
            #[cfg(feature = "lz4")]
            CompressionCodec::Lz4Raw => lz4_flex::block::decompress(input, expected_size)
                .map_err(|e| MetaError::with_source("lz4 raw decompress", Box::new(e))),
            #[cfg(feature = "zstd")]
            CompressionCodec::Zstd => zstd::bulk::decompress(input, expected_size)
                .map_err(|e| MetaError::with_source("zstd decompress", Box::new(e))),
            #[allow(unreachable_patterns)]
            other => Err(MetaError::new(format!(
                "compression codec not supported: {other:?}"
            ))),
        }
    }
}

/// Big-endian uncompressed and compressed lengths preceding each block of
/// hadoop framed lz4.
#[cfg(feature = "lz4")]
const LZ4_HADOOP_PREFIX_LEN: usize = 8;

/// Decompress lz4 blocks in the framing hadoop uses for the deprecated LZ4
/// codec.
///
/// Returns `None` if the input isn't framed that way or doesn't add up to
/// `expected_size`, in which case it may still be a raw block.
#[cfg(feature = "lz4")]
fn try_decompress_lz4_hadoop(input: &[u8], expected_size: usize) -> Option<Vec<u8>> {
    let mut out = vec![0; expected_size];
    let mut written = 0;
    let mut input = input;

    while input.len() >= LZ4_HADOOP_PREFIX_LEN {
        let uncompressed = u32::from_be_bytes(input[0..4].try_into().ok()?) as usize;
        let compressed = u32::from_be_bytes(input[4..8].try_into().ok()?) as usize;
        input = &input[LZ4_HADOOP_PREFIX_LEN..];

        if compressed > input.len() || uncompressed > expected_size - written {
            return None;
        }
        let n = lz4_flex::block::decompress_into(
            &input[..compressed],
            &mut out[written..written + uncompressed],
        )
        .ok()?;
        if n != uncompressed {
            return None;
        }

        written += n;
        input = &input[compressed..];
    }

    if !input.is_empty() || written != expected_size {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_passthrough() {
        let out = DefaultDecompressor
            .decompress(CompressionCodec::Uncompressed, b"hello", 5)
            .unwrap();
        assert_eq!(b"hello".as_slice(), out.as_slice());
    }

    #[test]
    fn lzo_not_supported() {
        DefaultDecompressor
            .decompress(CompressionCodec::Lzo, b"abc", 10)
            .unwrap_err();
    }

    #[test]
    fn empty_input() {
        let out = DefaultDecompressor
            .decompress(CompressionCodec::Lzo, &[], 0)
            .unwrap();
        assert!(out.is_empty());
    }

    #[cfg(feature = "snap")]
    #[test]
    fn snappy() {
        let input = b"some bytes some bytes some bytes".repeat(10);
        let compressed = snap::raw::Encoder::new().compress_vec(&input).unwrap();

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Snappy, &compressed, input.len())
            .unwrap();
        assert_eq!(input, out);
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd() {
        let input = b"abcdefgh".repeat(64);
        let compressed = zstd::bulk::compress(&input, 3).unwrap();

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Zstd, &compressed, input.len())
            .unwrap();
        assert_eq!(input, out);
    }

    #[cfg(feature = "lz4")]
    fn hadoop_frame(block: &[u8]) -> Vec<u8> {
        let compressed = lz4_flex::block::compress(block);
        let mut out = (block.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        out.extend_from_slice(&compressed);
        out
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_hadoop_framed() {
        let input: Vec<u8> = (0..1000).map(|i| (i % 17) as u8).collect();
        let framed = hadoop_frame(&input);

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Lz4, &framed, input.len())
            .unwrap();
        assert_eq!(input, out);
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_hadoop_multiple_frames() {
        let first = b"first block first block".repeat(8);
        let second = b"second".repeat(20);
        let mut framed = hadoop_frame(&first);
        framed.extend_from_slice(&hadoop_frame(&second));

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Lz4, &framed, first.len() + second.len())
            .unwrap();
        assert_eq!([first, second].concat(), out);
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_falls_back_to_raw_block() {
        let input = b"raw lz4 block data ".repeat(30);
        let compressed = lz4_flex::block::compress(&input);

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Lz4, &compressed, input.len())
            .unwrap();
        assert_eq!(input, out);
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn lz4_raw_is_not_framed() {
        let input = b"lz4 raw".repeat(40);
        let compressed = lz4_flex::block::compress(&input);

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Lz4Raw, &compressed, input.len())
            .unwrap();
        assert_eq!(input, out);

        DefaultDecompressor
            .decompress(CompressionCodec::Lz4Raw, &hadoop_frame(&input), input.len())
            .unwrap_err();
    }

    #[cfg(feature = "flate2")]
    #[test]
    fn gzip() {
        use std::io::Write;

        let input = b"gzip gzip gzip".repeat(16);
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&input).unwrap();
        let compressed = encoder.finish().unwrap();

        let out = DefaultDecompressor
            .decompress(CompressionCodec::Gzip, &compressed, input.len())
            .unwrap();
        assert_eq!(input, out);
    }

    #[test]
    fn unknown_wire_codec() {
        let err = CompressionCodec::try_from(thrift_gen::CompressionCodec(42)).unwrap_err();
        assert!(err.is_corrupt());
    }
}
