//! Shared helpers for integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use indexmap::IndexMap;
use parquet_meta::crypto::{
    ColumnMetadataDecryptor,
    Decryptor,
    Encryptor,
    CIPHERTEXT_LENGTH_PREFIX,
};
use parquet_meta::io::ByteRangeSource;
use parquet_meta::intern::StringInterner;
use parquet_meta::metadata::file::FileMetadata;
use parquet_meta::metadata::footer::{write_footer, MAGIC};
use parquet_meta::metadata::row_group::RowGroupMetadata;
use parquet_meta::metadata::schema::build_schema;
use parquet_meta::thrift_gen::{
    self,
    ColumnChunk,
    ColumnMetaData,
    ConvertedType,
    FieldRepetitionType,
    SchemaElement,
    Type,
};
use parquet_meta::{MetaError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Xors with a key and frames the output with a length prefix. The AAD is
/// appended to the plaintext and verified on decrypt.
#[derive(Debug, Clone, Copy)]
pub struct ToyCipher {
    pub key: u8,
}

impl Encryptor for ToyCipher {
    fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let body: Vec<u8> = plaintext
            .iter()
            .chain(aad)
            .map(|b| b ^ self.key)
            .collect();
        let mut out = (body.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&body);
        Ok(out)
    }
}

impl Decryptor for ToyCipher {
    fn decrypt(&self, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let len = self.ciphertext_len(ciphertext)?;
        let body: Vec<u8> = ciphertext[CIPHERTEXT_LENGTH_PREFIX..len]
            .iter()
            .map(|b| b ^ self.key)
            .collect();
        match body.len().checked_sub(aad.len()) {
            Some(split) if &body[split..] == aad => Ok(body[..split].to_vec()),
            _ => Err(MetaError::cipher("aad mismatch")),
        }
    }
}

/// AAD binding column metadata to its row group and column.
pub fn column_aad(row_group_ordinal: usize, column_ordinal: usize) -> Vec<u8> {
    format!("rg{row_group_ordinal}-col{column_ordinal}").into_bytes()
}

/// One column key shared by every column.
#[derive(Debug)]
pub struct ColumnKeys {
    pub cipher: ToyCipher,
}

impl ColumnMetadataDecryptor for ColumnKeys {
    fn column_decryption(
        &self,
        row_group_ordinal: usize,
        column_ordinal: usize,
    ) -> Option<(&dyn Decryptor, Vec<u8>)> {
        Some((&self.cipher, column_aad(row_group_ordinal, column_ordinal)))
    }
}

/// In-memory source that records every range read.
#[derive(Debug)]
pub struct RecordingSource {
    pub inner: Bytes,
    pub reads: Vec<(u64, usize)>,
}

impl RecordingSource {
    pub fn new(inner: Bytes) -> Self {
        RecordingSource {
            inner,
            reads: Vec::new(),
        }
    }
}

impl ByteRangeSource for RecordingSource {
    fn identity(&self) -> String {
        "recording".to_string()
    }

    fn read_range(&mut self, offset: u64, len: usize) -> Result<Bytes> {
        self.reads.push((offset, len));
        self.inner.read_range(offset, len)
    }
}

/// Wire schema with a mix of column types. Column names are mixed case.
pub fn schema_elements(num_columns: usize) -> Vec<SchemaElement> {
    let mut elements = vec![SchemaElement {
        name: "Schema".to_string(),
        num_children: Some(num_columns as i32),
        ..Default::default()
    }];

    for idx in 0..num_columns {
        let elem = match idx % 3 {
            0 => SchemaElement {
                type_: Some(Type::INT64),
                repetition_type: Some(FieldRepetitionType::REQUIRED),
                ..Default::default()
            },
            1 => SchemaElement {
                type_: Some(Type::BYTE_ARRAY),
                repetition_type: Some(FieldRepetitionType::OPTIONAL),
                converted_type: Some(ConvertedType::UTF8),
                logical_type: Some(thrift_gen::LogicalType::String),
                ..Default::default()
            },
            _ => SchemaElement {
                type_: Some(Type::INT96),
                repetition_type: Some(FieldRepetitionType::OPTIONAL),
                ..Default::default()
            },
        };
        elements.push(SchemaElement {
            name: format!("Col_{idx}"),
            ..elem
        });
    }

    elements
}

fn wire_chunk(rng: &mut StdRng, column: usize, elem: &SchemaElement, offset: i64) -> ColumnChunk {
    let size = rng.gen_range(100..10_000);
    ColumnChunk {
        file_path: None,
        file_offset: offset,
        meta_data: Some(ColumnMetaData {
            type_: elem.type_.unwrap_or(Type::INT32),
            encodings: vec![thrift_gen::Encoding::PLAIN, thrift_gen::Encoding::RLE],
            path_in_schema: vec![format!("Col_{column}")],
            codec: thrift_gen::CompressionCodec::SNAPPY,
            num_values: rng.gen_range(1..1000),
            total_uncompressed_size: size * 2,
            total_compressed_size: size,
            key_value_metadata: None,
            data_page_offset: offset,
            index_page_offset: None,
            dictionary_page_offset: None,
            statistics: Some(thrift_gen::Statistics {
                min_value: Some(rng.gen::<[u8; 8]>().to_vec()),
                max_value: Some(rng.gen::<[u8; 8]>().to_vec()),
                null_count: Some(rng.gen_range(0..10)),
                ..Default::default()
            }),
            encoding_stats: Some(vec![thrift_gen::PageEncodingStats {
                page_type: thrift_gen::PageType::DATA_PAGE,
                encoding: thrift_gen::Encoding::PLAIN,
                count: 1,
            }]),
            bloom_filter_offset: None,
            bloom_filter_length: None,
        }),
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
        encrypted_column_metadata: None,
    }
}

/// Generate file metadata with random column chunk details.
pub fn file_metadata(seed: u64, num_row_groups: usize, num_columns: usize) -> FileMetadata {
    let mut rng = StdRng::seed_from_u64(seed);
    let elements = schema_elements(num_columns);
    let schema = build_schema(&elements).unwrap();
    let mut interner = StringInterner::new();

    let mut offset = MAGIC.len() as i64;
    let mut row_groups = Vec::with_capacity(num_row_groups);
    for _ in 0..num_row_groups {
        let columns: Vec<_> = (0..num_columns)
            .map(|col| {
                let chunk = wire_chunk(&mut rng, col, &elements[col + 1], offset);
                offset += chunk.meta_data.as_ref().unwrap().total_compressed_size;
                chunk
            })
            .collect();
        let wire = thrift_gen::RowGroup {
            columns,
            total_byte_size: rng.gen_range(1000..100_000),
            num_rows: 1000,
            ..Default::default()
        };
        row_groups.push(RowGroupMetadata::from_thrift(wire, &schema, &mut interner).unwrap());
    }

    let mut key_value_metadata = IndexMap::new();
    key_value_metadata.insert("writer.model".to_string(), Some("test".to_string()));
    key_value_metadata.insert("empty".to_string(), None);
    key_value_metadata.insert(format!("random.{}", rng.gen::<u32>()), Some(rng.gen::<u64>().to_string()));

    FileMetadata {
        version: 1,
        schema,
        num_rows: 1000 * num_row_groups as i64,
        row_groups,
        key_value_metadata,
        created_by: Some("parquet_meta tests".to_string()),
        encryption_algorithm: None,
        footer_signing_key_metadata: None,
    }
}

/// Complete file with `data_len` filler bytes between the leading magic and
/// the footer.
pub fn file_bytes(metadata: &FileMetadata, data_len: usize) -> (Bytes, usize) {
    let mut buf = MAGIC.to_vec();
    buf.resize(MAGIC.len() + data_len, 0xab);
    let metadata_len = write_footer(metadata, &mut buf, None).unwrap();
    (Bytes::from(buf), metadata_len)
}
