//! Column chunk metadata

use std::collections::BTreeSet;
use std::sync::Arc;

use parquet_meta_error::{MetaError, Result};

use super::schema::{ColumnPath, Schema};
use crate::compression::CompressionCodec;
use crate::counters::MetadataCounters;
use crate::crypto::{DecryptionContext, EncryptionContext};
use crate::encoding::Encoding;
use crate::intern::StringInterner;
use crate::page::PageEncodingStats;
use crate::protocol::WireCodec;
use crate::statistics::Statistics;
use crate::thrift_gen;
use crate::types::PrimitiveType;

/// Location of a secondary index structure in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReference {
    pub offset: i64,
    pub length: i32,
}

impl IndexReference {
    /// Only present when both parts are set.
    fn from_parts(offset: Option<i64>, length: Option<i32>) -> Option<Self> {
        match (offset, length) {
            (Some(offset), Some(length)) => Some(IndexReference { offset, length }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChunkMetadata {
    /// Lower-cased path of the column.
    pub path: ColumnPath,
    pub primitive_type: Arc<PrimitiveType>,
    pub codec: CompressionCodec,
    pub encodings: BTreeSet<Encoding>,
    pub encoding_stats: Option<Vec<PageEncodingStats>>,
    pub statistics: Option<Statistics>,
    pub num_values: i64,
    pub file_offset: i64,
    pub data_page_offset: i64,
    pub dictionary_page_offset: Option<i64>,
    pub total_compressed_size: i64,
    pub total_uncompressed_size: i64,
    pub column_index_reference: Option<IndexReference>,
    pub offset_index_reference: Option<IndexReference>,
}

impl ColumnChunkMetadata {
    pub fn from_thrift(
        chunk: thrift_gen::ColumnChunk,
        schema: &Schema,
        interner: &mut StringInterner,
    ) -> Result<Self> {
        let meta = match chunk.meta_data {
            Some(meta) => meta,
            None if chunk.encrypted_column_metadata.is_some() => {
                return Err(MetaError::corrupt(
                    "column chunk metadata is encrypted with a column key and no column decryptor is configured",
                ))
            }
            None => return Err(MetaError::corrupt("missing column chunk metadata")),
        };

        let path = ColumnPath::new(
            meta.path_in_schema
                .iter()
                .map(|part| interner.intern(&part.to_lowercase()))
                .collect(),
        );
        let primitive_type = schema
            .primitive_at(&path)
            .cloned()
            .ok_or_else(|| MetaError::corrupt(format!("column '{path}' not found in schema")))?;

        let encodings = meta
            .encodings
            .iter()
            .map(|&enc| Encoding::try_from(enc))
            .collect::<Result<BTreeSet<_>>>()?;
        let encoding_stats = meta
            .encoding_stats
            .as_ref()
            .map(|stats| {
                stats
                    .iter()
                    .map(PageEncodingStats::from_thrift)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(ColumnChunkMetadata {
            path,
            primitive_type,
            codec: meta.codec.try_into()?,
            encodings,
            encoding_stats,
            statistics: meta.statistics.map(Statistics::from_thrift),
            num_values: meta.num_values,
            file_offset: chunk.file_offset,
            data_page_offset: meta.data_page_offset,
            dictionary_page_offset: meta.dictionary_page_offset,
            total_compressed_size: meta.total_compressed_size,
            total_uncompressed_size: meta.total_uncompressed_size,
            column_index_reference: IndexReference::from_parts(
                chunk.column_index_offset,
                chunk.column_index_length,
            ),
            offset_index_reference: IndexReference::from_parts(
                chunk.offset_index_offset,
                chunk.offset_index_length,
            ),
        })
    }

    pub fn to_thrift(&self, file_path: Option<&str>) -> thrift_gen::ColumnChunk {
        let meta = thrift_gen::ColumnMetaData {
            type_: self.primitive_type.physical_type.into(),
            encodings: self.encodings.iter().map(|&enc| enc.into()).collect(),
            path_in_schema: self.path.parts().iter().map(|p| p.to_string()).collect(),
            codec: self.codec.into(),
            num_values: self.num_values,
            total_uncompressed_size: self.total_uncompressed_size,
            total_compressed_size: self.total_compressed_size,
            key_value_metadata: None,
            data_page_offset: self.data_page_offset,
            index_page_offset: None,
            dictionary_page_offset: self.dictionary_page_offset,
            statistics: self.statistics.as_ref().map(Statistics::to_thrift),
            encoding_stats: self
                .encoding_stats
                .as_ref()
                .map(|stats| stats.iter().map(PageEncodingStats::to_thrift).collect()),
            bloom_filter_offset: None,
            bloom_filter_length: None,
        };

        thrift_gen::ColumnChunk {
            file_path: file_path.map(|p| p.to_string()),
            file_offset: self.file_offset,
            meta_data: Some(meta),
            offset_index_offset: self.offset_index_reference.map(|r| r.offset),
            offset_index_length: self.offset_index_reference.map(|r| r.length),
            column_index_offset: self.column_index_reference.map(|r| r.offset),
            column_index_length: self.column_index_reference.map(|r| r.length),
            encrypted_column_metadata: None,
        }
    }

    /// Byte range `(start, len)` of the chunk's pages in the file.
    ///
    /// Starts at the dictionary page when there is one.
    pub fn byte_range(&self) -> (i64, i64) {
        let start = match self.dictionary_page_offset {
            Some(dict) if dict > 0 && dict < self.data_page_offset => dict,
            _ => self.data_page_offset,
        };
        (start, self.total_compressed_size)
    }
}

/// Decrypt and decode column metadata stored in a chunk's
/// `encrypted_column_metadata`.
pub fn read_column_metadata(
    ciphertext: &[u8],
    decryption: DecryptionContext,
    counters: Option<&MetadataCounters>,
) -> Result<thrift_gen::ColumnMetaData> {
    WireCodec::with_counters(counters).decode(ciphertext, Some(decryption))
}

/// Serialize and encrypt column metadata for storing in a chunk's
/// `encrypted_column_metadata`.
pub fn write_column_metadata(
    meta: &thrift_gen::ColumnMetaData,
    encryption: EncryptionContext,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    WireCodec::new().encode(meta, &mut out, Some(encryption))?;
    Ok(out)
}
