//! Page-level column and offset indexes.

use parquet_meta_error::{MetaError, Result};

use crate::thrift_gen;
use crate::types::{ColumnOrder, PrimitiveType};

/// Declared ordering of min/max values across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOrder {
    Unordered,
    Ascending,
    Descending,
}

impl TryFrom<thrift_gen::BoundaryOrder> for BoundaryOrder {
    type Error = MetaError;

    fn try_from(value: thrift_gen::BoundaryOrder) -> Result<Self> {
        Ok(match value {
            thrift_gen::BoundaryOrder::UNORDERED => Self::Unordered,
            thrift_gen::BoundaryOrder::ASCENDING => Self::Ascending,
            thrift_gen::BoundaryOrder::DESCENDING => Self::Descending,
            other => {
                return Err(MetaError::corrupt(format!(
                    "unsupported boundary order: {}",
                    other.0
                )))
            }
        })
    }
}

impl From<BoundaryOrder> for thrift_gen::BoundaryOrder {
    fn from(value: BoundaryOrder) -> Self {
        match value {
            BoundaryOrder::Unordered => Self::UNORDERED,
            BoundaryOrder::Ascending => Self::ASCENDING,
            BoundaryOrder::Descending => Self::DESCENDING,
        }
    }
}

/// Per-page statistics for a column chunk.
///
/// All vectors are indexed by page. Min/max values of null pages are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub null_pages: Vec<bool>,
    pub min_values: Vec<Vec<u8>>,
    pub max_values: Vec<Vec<u8>>,
    pub boundary_order: BoundaryOrder,
    pub null_counts: Option<Vec<i64>>,
}

impl ColumnIndex {
    pub fn num_pages(&self) -> usize {
        self.null_pages.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocation {
    /// Offset of the page header in the file.
    pub offset: i64,
    /// Size of the page including its header.
    pub compressed_page_size: i32,
    /// Index of the page's first row within the row group.
    pub first_row_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetIndex {
    pub page_locations: Vec<PageLocation>,
}

impl OffsetIndex {
    pub fn first_row_index(&self, page: usize) -> Option<i64> {
        self.page_locations.get(page).map(|loc| loc.first_row_index)
    }
}

/// Convert a column index to its wire form.
///
/// Types without a defined sort order never carry a column index.
pub fn column_index_to_thrift(
    typ: &PrimitiveType,
    index: Option<&ColumnIndex>,
) -> Option<thrift_gen::ColumnIndex> {
    if typ.column_order() == ColumnOrder::Undefined {
        return None;
    }
    let index = index?;

    Some(thrift_gen::ColumnIndex {
        null_pages: index.null_pages.clone(),
        min_values: index.min_values.clone(),
        max_values: index.max_values.clone(),
        boundary_order: index.boundary_order.into(),
        null_counts: index.null_counts.clone(),
    })
}

/// Convert a wire column index, returning `None` for types without a defined
/// sort order.
pub fn column_index_from_thrift(
    typ: &PrimitiveType,
    index: thrift_gen::ColumnIndex,
) -> Result<Option<ColumnIndex>> {
    if typ.column_order() == ColumnOrder::Undefined {
        return Ok(None);
    }

    let num_pages = index.null_pages.len();
    if index.min_values.len() != num_pages || index.max_values.len() != num_pages {
        return Err(MetaError::corrupt(format!(
            "column index has {num_pages} pages but {} min values and {} max values",
            index.min_values.len(),
            index.max_values.len()
        )));
    }

    Ok(Some(ColumnIndex {
        null_pages: index.null_pages,
        min_values: index.min_values,
        max_values: index.max_values,
        boundary_order: index.boundary_order.try_into()?,
        null_counts: index.null_counts,
    }))
}

pub fn offset_index_to_thrift(index: &OffsetIndex) -> thrift_gen::OffsetIndex {
    thrift_gen::OffsetIndex {
        page_locations: index
            .page_locations
            .iter()
            .map(|loc| thrift_gen::PageLocation {
                offset: loc.offset,
                compressed_page_size: loc.compressed_page_size,
                first_row_index: loc.first_row_index,
            })
            .collect(),
    }
}

/// Convert a wire offset index. Locations are kept in file order and not
/// checked for monotonicity.
pub fn offset_index_from_thrift(index: thrift_gen::OffsetIndex) -> OffsetIndex {
    OffsetIndex {
        page_locations: index
            .page_locations
            .into_iter()
            .map(|loc| PageLocation {
                offset: loc.offset,
                compressed_page_size: loc.compressed_page_size,
                first_row_index: loc.first_row_index,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PhysicalType, TypeInfo};

    fn ascending_index(pages: i32) -> ColumnIndex {
        ColumnIndex {
            null_pages: (0..pages).map(|_| false).collect(),
            min_values: (0..pages).map(|p| (p * 10).to_le_bytes().to_vec()).collect(),
            max_values: (0..pages)
                .map(|p| (p * 10 + 9).to_le_bytes().to_vec())
                .collect(),
            boundary_order: BoundaryOrder::Ascending,
            null_counts: Some((0..pages).map(|_| 0).collect()),
        }
    }

    #[test]
    fn column_index_roundtrip() {
        let typ = PrimitiveType::new(TypeInfo::new("a"), PhysicalType::Int32);
        let index = ascending_index(5);

        let wire = column_index_to_thrift(&typ, Some(&index)).unwrap();
        assert_eq!(thrift_gen::BoundaryOrder::ASCENDING, wire.boundary_order);

        let got = column_index_from_thrift(&typ, wire).unwrap().unwrap();
        assert_eq!(index, got);
        assert_eq!(5, got.num_pages());
    }

    #[test]
    fn column_index_absent_for_int96() {
        let typ = PrimitiveType::new(TypeInfo::new("ts"), PhysicalType::Int96);
        let index = ascending_index(5);

        assert!(column_index_to_thrift(&typ, Some(&index)).is_none());

        let int32 = PrimitiveType::new(TypeInfo::new("a"), PhysicalType::Int32);
        let wire = column_index_to_thrift(&int32, Some(&index)).unwrap();
        assert!(column_index_from_thrift(&typ, wire).unwrap().is_none());
    }

    #[test]
    fn unsupported_boundary_order() {
        let typ = PrimitiveType::new(TypeInfo::new("a"), PhysicalType::Int32);
        let mut wire = column_index_to_thrift(&typ, Some(&ascending_index(2))).unwrap();
        wire.boundary_order = thrift_gen::BoundaryOrder(7);

        let err = column_index_from_thrift(&typ, wire).unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.message().contains("unsupported boundary order"));
    }

    #[test]
    fn mismatched_page_counts() {
        let typ = PrimitiveType::new(TypeInfo::new("a"), PhysicalType::Int32);
        let mut wire = column_index_to_thrift(&typ, Some(&ascending_index(3))).unwrap();
        wire.max_values.pop();

        let err = column_index_from_thrift(&typ, wire).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn offset_index_passthrough() {
        // Deliberately not monotonic.
        let index = OffsetIndex {
            page_locations: vec![
                PageLocation {
                    offset: 4,
                    compressed_page_size: 100,
                    first_row_index: 0,
                },
                PageLocation {
                    offset: 104,
                    compressed_page_size: 80,
                    first_row_index: 50,
                },
                PageLocation {
                    offset: 184,
                    compressed_page_size: 90,
                    first_row_index: 20,
                },
            ],
        };

        let got = offset_index_from_thrift(offset_index_to_thrift(&index));
        assert_eq!(index, got);
        assert_eq!(Some(50), got.first_row_index(1));
        assert_eq!(None, got.first_row_index(3));
    }
}
