//! File metadata.

use indexmap::IndexMap;

use super::row_group::RowGroupMetadata;
use super::schema::{flatten_schema, Schema};
use crate::thrift_gen::{self, EncryptionAlgorithm};
use crate::types::ColumnOrder;

/// File metadata for a parquet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub version: i32,
    pub schema: Schema,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroupMetadata>,
    /// Application key/value pairs in file order.
    pub key_value_metadata: IndexMap<String, Option<String>>,
    pub created_by: Option<String>,
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    pub footer_signing_key_metadata: Option<Vec<u8>>,
}

impl FileMetadata {
    pub fn num_row_groups(&self) -> usize {
        self.row_groups.len()
    }

    /// Convert back to the wire representation.
    pub fn to_thrift(&self) -> thrift_gen::FileMetaData {
        let key_value_metadata = if self.key_value_metadata.is_empty() {
            None
        } else {
            Some(
                self.key_value_metadata
                    .iter()
                    .map(|(key, value)| thrift_gen::KeyValue {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
            )
        };

        // The wire union has no variant for undefined orders, column orders
        // are only written when every leaf has a type-defined one.
        let column_orders = self
            .schema
            .leaves()
            .iter()
            .filter(|(_, typ)| typ.column_order() == ColumnOrder::TypeDefined)
            .map(|_| thrift_gen::ColumnOrder::TypeDefinedOrder)
            .collect::<Vec<_>>();

        thrift_gen::FileMetaData {
            version: self.version,
            schema: flatten_schema(&self.schema),
            num_rows: self.num_rows,
            row_groups: self.row_groups.iter().map(|rg| rg.to_thrift()).collect(),
            key_value_metadata,
            created_by: self.created_by.clone(),
            column_orders: if column_orders.len() == self.schema.leaves().len() {
                Some(column_orders)
            } else {
                None
            },
            encryption_algorithm: self.encryption_algorithm.clone(),
            footer_signing_key_metadata: self.footer_signing_key_metadata.clone(),
        }
    }
}
