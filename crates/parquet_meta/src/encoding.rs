use parquet_meta_error::{MetaError, Result};

use crate::thrift_gen;

/// Encoding of values and levels within a page.
///
/// Ordered by wire value so sets of encodings iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Encoding {
    Plain,
    PlainDictionary,
    Rle,
    BitPacked,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
    RleDictionary,
    ByteStreamSplit,
}

impl TryFrom<thrift_gen::Encoding> for Encoding {
    type Error = MetaError;

    fn try_from(value: thrift_gen::Encoding) -> Result<Self> {
        Ok(match value {
            thrift_gen::Encoding::PLAIN => Self::Plain,
            thrift_gen::Encoding::PLAIN_DICTIONARY => Self::PlainDictionary,
            thrift_gen::Encoding::RLE => Self::Rle,
            thrift_gen::Encoding::BIT_PACKED => Self::BitPacked,
            thrift_gen::Encoding::DELTA_BINARY_PACKED => Self::DeltaBinaryPacked,
            thrift_gen::Encoding::DELTA_LENGTH_BYTE_ARRAY => Self::DeltaLengthByteArray,
            thrift_gen::Encoding::DELTA_BYTE_ARRAY => Self::DeltaByteArray,
            thrift_gen::Encoding::RLE_DICTIONARY => Self::RleDictionary,
            thrift_gen::Encoding::BYTE_STREAM_SPLIT => Self::ByteStreamSplit,
            other => return Err(MetaError::corrupt(format!("unsupported encoding: {}", other.0))),
        })
    }
}

impl From<Encoding> for thrift_gen::Encoding {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Plain => Self::PLAIN,
            Encoding::PlainDictionary => Self::PLAIN_DICTIONARY,
            Encoding::Rle => Self::RLE,
            Encoding::BitPacked => Self::BIT_PACKED,
            Encoding::DeltaBinaryPacked => Self::DELTA_BINARY_PACKED,
            Encoding::DeltaLengthByteArray => Self::DELTA_LENGTH_BYTE_ARRAY,
            Encoding::DeltaByteArray => Self::DELTA_BYTE_ARRAY,
            Encoding::RleDictionary => Self::RLE_DICTIONARY,
            Encoding::ByteStreamSplit => Self::BYTE_STREAM_SPLIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_wire_value_is_rejected() {
        // 1 was GROUP_VAR_INT and was never used.
        let err = Encoding::try_from(thrift_gen::Encoding(1)).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn ordered_by_wire_value() {
        assert!(Encoding::Plain < Encoding::Rle);
        assert!(Encoding::Rle < Encoding::RleDictionary);
    }
}
