//! Row group metadata.

use std::sync::Arc;

use parquet_meta_error::{MetaError, Result};

use super::column_chunk::{read_column_metadata, ColumnChunkMetadata};
use super::schema::Schema;
use crate::counters::MetadataCounters;
use crate::crypto::{ColumnMetadataDecryptor, DecryptionContext};
use crate::intern::StringInterner;
use crate::thrift_gen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroupMetadata {
    pub num_rows: i64,
    pub total_byte_size: i64,
    pub columns: Vec<ColumnChunkMetadata>,
    /// File containing the column chunks if not the footer's own file.
    ///
    /// Shared by every chunk in the row group.
    pub file_path: Option<Arc<str>>,
}

impl RowGroupMetadata {
    pub fn from_thrift(
        row_group: thrift_gen::RowGroup,
        schema: &Schema,
        interner: &mut StringInterner,
    ) -> Result<Self> {
        if row_group.columns.is_empty() {
            return Err(MetaError::corrupt("row group has no columns"));
        }

        let file_path = row_group.columns[0].file_path.as_deref().map(|p| interner.intern(p));
        let mut columns = Vec::with_capacity(row_group.columns.len());
        for chunk in row_group.columns {
            if chunk.file_path.as_deref() != file_path.as_deref() {
                return Err(MetaError::corrupt(format!(
                    "inconsistent file paths in row group, expected {:?}, got {:?}",
                    file_path, chunk.file_path
                )));
            }
            columns.push(ColumnChunkMetadata::from_thrift(chunk, schema, interner)?);
        }

        Ok(RowGroupMetadata {
            num_rows: row_group.num_rows,
            total_byte_size: row_group.total_byte_size,
            columns,
            file_path,
        })
    }

    pub fn to_thrift(&self) -> thrift_gen::RowGroup {
        thrift_gen::RowGroup {
            columns: self
                .columns
                .iter()
                .map(|c| c.to_thrift(self.file_path.as_deref()))
                .collect(),
            total_byte_size: self.total_byte_size,
            num_rows: self.num_rows,
            file_offset: None,
            total_compressed_size: None,
            ordinal: None,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Decrypt column metadata stored with a column key, filling in `meta_data`
/// of the chunks carrying it.
///
/// A chunk whose key isn't available keeps its plaintext `meta_data` if it
/// has one. Otherwise it's an error.
pub fn decrypt_column_metadata(
    row_group: &mut thrift_gen::RowGroup,
    row_group_ordinal: usize,
    decryptor: &dyn ColumnMetadataDecryptor,
    counters: Option<&MetadataCounters>,
) -> Result<()> {
    for (column_ordinal, chunk) in row_group.columns.iter_mut().enumerate() {
        let ciphertext = match chunk.encrypted_column_metadata.as_deref() {
            Some(ciphertext) => ciphertext,
            None => continue,
        };

        match decryptor.column_decryption(row_group_ordinal, column_ordinal) {
            Some((column_decryptor, aad)) => {
                let ctx = DecryptionContext::new(column_decryptor, &aad);
                chunk.meta_data = Some(read_column_metadata(ciphertext, ctx, counters)?);
            }
            None if chunk.meta_data.is_some() => (),
            None => {
                return Err(MetaError::cipher(format!(
                    "no key for column {column_ordinal} of row group {row_group_ordinal}"
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::testutil::XorCipher;
    use crate::crypto::{Decryptor, EncryptionContext};
    use crate::metadata::column_chunk::write_column_metadata;
    use crate::metadata::schema::build_schema;
    use crate::thrift_gen::{ColumnChunk, ColumnMetaData, SchemaElement, Type};

    fn schema() -> Schema {
        build_schema(&[
            SchemaElement {
                name: "schema".to_string(),
                num_children: Some(2),
                ..Default::default()
            },
            SchemaElement {
                type_: Some(Type::INT32),
                name: "a".to_string(),
                ..Default::default()
            },
            SchemaElement {
                type_: Some(Type::INT32),
                name: "b".to_string(),
                ..Default::default()
            },
        ])
        .unwrap()
    }

    fn chunk(name: &str, file_path: Option<&str>) -> ColumnChunk {
        ColumnChunk {
            file_path: file_path.map(|s| s.to_string()),
            file_offset: 4,
            meta_data: Some(ColumnMetaData {
                type_: Type::INT32,
                encodings: vec![thrift_gen::Encoding::PLAIN],
                path_in_schema: vec![name.to_string()],
                codec: thrift_gen::CompressionCodec::UNCOMPRESSED,
                num_values: 10,
                total_uncompressed_size: 40,
                total_compressed_size: 40,
                key_value_metadata: None,
                data_page_offset: 4,
                index_page_offset: None,
                dictionary_page_offset: None,
                statistics: None,
                encoding_stats: None,
                bloom_filter_offset: None,
                bloom_filter_length: None,
            }),
            ..Default::default()
        }
    }

    fn row_group(columns: Vec<ColumnChunk>) -> thrift_gen::RowGroup {
        thrift_gen::RowGroup {
            columns,
            total_byte_size: 80,
            num_rows: 10,
            ..Default::default()
        }
    }

    #[test]
    fn shared_file_path() {
        let mut interner = StringInterner::new();
        let rg = RowGroupMetadata::from_thrift(
            row_group(vec![chunk("a", Some("part-0")), chunk("b", Some("part-0"))]),
            &schema(),
            &mut interner,
        )
        .unwrap();

        assert_eq!(Some("part-0"), rg.file_path.as_deref());
        assert_eq!(2, rg.num_columns());
        // Path segments and file path are interned.
        assert_eq!(3, interner.len());
    }

    #[test]
    fn inconsistent_file_paths() {
        let mut interner = StringInterner::new();
        let err = RowGroupMetadata::from_thrift(
            row_group(vec![chunk("a", Some("part-0")), chunk("b", None)]),
            &schema(),
            &mut interner,
        )
        .unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn no_columns() {
        let mut interner = StringInterner::new();
        let err = RowGroupMetadata::from_thrift(row_group(vec![]), &schema(), &mut interner)
            .unwrap_err();
        assert!(err.is_corrupt());
    }

    /// Holds the key for column 0 only, AAD naming the row group and column.
    #[derive(Debug)]
    struct FirstColumnKey(XorCipher);

    impl ColumnMetadataDecryptor for FirstColumnKey {
        fn column_decryption(
            &self,
            row_group_ordinal: usize,
            column_ordinal: usize,
        ) -> Option<(&dyn Decryptor, Vec<u8>)> {
            if column_ordinal != 0 {
                return None;
            }
            let aad = format!("rg{row_group_ordinal}-col{column_ordinal}").into_bytes();
            Some((&self.0, aad))
        }
    }

    fn encrypt_chunk(chunk: &mut ColumnChunk, cipher: &XorCipher, aad: &[u8]) {
        let meta = chunk.meta_data.take().unwrap();
        chunk.encrypted_column_metadata =
            Some(write_column_metadata(&meta, EncryptionContext::new(cipher, aad)).unwrap());
    }

    #[test]
    fn decrypts_column_metadata() {
        let key = FirstColumnKey(XorCipher { key: 0x42 });
        let mut a = chunk("a", None);
        encrypt_chunk(&mut a, &key.0, b"rg3-col0");
        let mut wire = row_group(vec![a, chunk("b", None)]);

        decrypt_column_metadata(&mut wire, 3, &key, None).unwrap();
        let mut interner = StringInterner::new();
        let rg = RowGroupMetadata::from_thrift(wire, &schema(), &mut interner).unwrap();

        let paths: Vec<_> = rg.columns.iter().map(|c| c.path.to_string()).collect();
        assert_eq!(vec!["a", "b"], paths);
    }

    #[test]
    fn missing_column_key() {
        let key = FirstColumnKey(XorCipher { key: 0x42 });
        let mut b = chunk("b", None);
        encrypt_chunk(&mut b, &key.0, b"rg0-col1");
        let mut wire = row_group(vec![chunk("a", None), b]);

        let err = decrypt_column_metadata(&mut wire, 0, &key, None).unwrap_err();
        assert_eq!(parquet_meta_error::ErrorKind::Cipher, err.kind());
    }

    #[test]
    fn wrong_row_group_ordinal() {
        let key = FirstColumnKey(XorCipher { key: 0x42 });
        let mut a = chunk("a", None);
        encrypt_chunk(&mut a, &key.0, b"rg0-col0");
        let mut wire = row_group(vec![a]);

        let err = decrypt_column_metadata(&mut wire, 1, &key, None).unwrap_err();
        assert_eq!(parquet_meta_error::ErrorKind::Cipher, err.kind());
    }
}
