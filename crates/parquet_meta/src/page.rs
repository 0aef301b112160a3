use bytes::Bytes;
use parquet_meta_error::{MetaError, Result};

use crate::encoding::Encoding;
use crate::statistics::Statistics;
use crate::thrift_gen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    DataPage,
    IndexPage,
    DictionaryPage,
    DataPageV2,
}

impl TryFrom<thrift_gen::PageType> for PageType {
    type Error = MetaError;

    fn try_from(value: thrift_gen::PageType) -> Result<Self> {
        Ok(match value {
            thrift_gen::PageType::DATA_PAGE => Self::DataPage,
            thrift_gen::PageType::INDEX_PAGE => Self::IndexPage,
            thrift_gen::PageType::DICTIONARY_PAGE => Self::DictionaryPage,
            thrift_gen::PageType::DATA_PAGE_V2 => Self::DataPageV2,
            other => return Err(MetaError::corrupt(format!("unsupported page type: {}", other.0))),
        })
    }
}

impl From<PageType> for thrift_gen::PageType {
    fn from(value: PageType) -> Self {
        match value {
            PageType::DataPage => Self::DATA_PAGE,
            PageType::IndexPage => Self::INDEX_PAGE,
            PageType::DictionaryPage => Self::DICTIONARY_PAGE,
            PageType::DataPageV2 => Self::DATA_PAGE_V2,
        }
    }
}

/// Number of pages of a given type and encoding within a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEncodingStats {
    pub page_type: PageType,
    pub encoding: Encoding,
    pub count: i32,
}

impl PageEncodingStats {
    pub fn from_thrift(stats: &thrift_gen::PageEncodingStats) -> Result<Self> {
        Ok(PageEncodingStats {
            page_type: stats.page_type.try_into()?,
            encoding: stats.encoding.try_into()?,
            count: stats.count,
        })
    }

    pub fn to_thrift(&self) -> thrift_gen::PageEncodingStats {
        thrift_gen::PageEncodingStats {
            page_type: self.page_type.into(),
            encoding: self.encoding.into(),
            count: self.count,
        }
    }
}

/// Data page in the v1 layout.
///
/// Levels and values are compressed together in `buffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageV1 {
    pub buffer: Bytes,
    pub num_values: i32,
    pub uncompressed_size: i32,
    /// First row of this page within the row group, -1 if unknown.
    pub first_row_index: i64,
    pub statistics: Option<Statistics>,
    pub repetition_level_encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub value_encoding: Encoding,
}

/// Data page where levels are stored uncompressed ahead of the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageV2 {
    pub num_rows: i32,
    pub num_nulls: i32,
    pub num_values: i32,
    /// First row of this page within the row group, -1 if unknown.
    pub first_row_index: i64,
    pub repetition_levels: Bytes,
    pub definition_levels: Bytes,
    pub data_encoding: Encoding,
    /// Values only, compressed if `is_compressed` is set.
    pub data: Bytes,
    /// Size of levels and uncompressed values combined.
    pub uncompressed_size: i32,
    pub statistics: Option<Statistics>,
    pub is_compressed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataPage {
    V1(DataPageV1),
    V2(DataPageV2),
}

impl DataPage {
    pub fn num_values(&self) -> i32 {
        match self {
            Self::V1(page) => page.num_values,
            Self::V2(page) => page.num_values,
        }
    }

    pub fn first_row_index(&self) -> i64 {
        match self {
            Self::V1(page) => page.first_row_index,
            Self::V2(page) => page.first_row_index,
        }
    }

    pub fn uncompressed_size(&self) -> i32 {
        match self {
            Self::V1(page) => page.uncompressed_size,
            Self::V2(page) => page.uncompressed_size,
        }
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        match self {
            Self::V1(page) => page.statistics.as_ref(),
            Self::V2(page) => page.statistics.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPage {
    pub buffer: Bytes,
    pub uncompressed_size: i32,
    /// Number of entries in the dictionary.
    pub num_values: i32,
    pub encoding: Encoding,
}
