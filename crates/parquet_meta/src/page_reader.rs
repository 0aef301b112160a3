//! Lazy page decompression for a single column chunk.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parquet_meta_error::{ErrorKind, MetaError, Result};
use tracing::{debug, trace};

use crate::compression::{CompressionCodec, Decompressor};
use crate::crypto::{DecryptionContext, PageHeaderDecryption};
use crate::metadata::column_chunk::ColumnChunkMetadata;
use crate::metadata::index::OffsetIndex;
use crate::page::{DataPage, DataPageV1, DataPageV2, DictionaryPage, PageType};
use crate::protocol::WireCodec;
use crate::statistics::Statistics;
use crate::thrift_gen;

/// Hands out the pages of one column chunk in order, decompressing each one
/// as it's requested.
#[derive(Debug)]
pub struct PageReader {
    codec: CompressionCodec,
    pages: VecDeque<DataPage>,
    dictionary: Option<DictionaryPage>,
    offset_index: Option<OffsetIndex>,
    /// Index of the next page to be returned.
    page_index: usize,
    total_value_count: i64,
    decompressor: Arc<dyn Decompressor>,
}

impl PageReader {
    /// Create a reader over compressed pages.
    ///
    /// When an offset index is given, its page locations must line up with
    /// `pages`.
    pub fn new(
        codec: CompressionCodec,
        pages: impl IntoIterator<Item = DataPage>,
        dictionary: Option<DictionaryPage>,
        offset_index: Option<OffsetIndex>,
        decompressor: Arc<dyn Decompressor>,
    ) -> Self {
        let pages: VecDeque<_> = pages.into_iter().collect();
        let total_value_count: i64 = pages.iter().map(|p| p.num_values() as i64).sum();

        debug!(
            ?codec,
            num_pages = pages.len(),
            %total_value_count,
            has_dictionary = dictionary.is_some(),
            has_offset_index = offset_index.is_some(),
            "created page reader"
        );

        PageReader {
            codec,
            pages,
            dictionary,
            offset_index,
            page_index: 0,
            total_value_count,
            decompressor,
        }
    }

    /// Sum of value counts across all data pages, including ones already
    /// read.
    pub fn total_value_count(&self) -> i64 {
        self.total_value_count
    }

    pub fn codec(&self) -> CompressionCodec {
        self.codec
    }

    /// Number of data pages not yet returned.
    pub fn remaining_pages(&self) -> usize {
        self.pages.len()
    }

    /// Decompress and return the next data page.
    ///
    /// Returns `None` once every page has been returned.
    pub fn read_page(&mut self) -> Result<Option<DataPage>> {
        let page = match self.pages.pop_front() {
            Some(page) => page,
            None => return Ok(None),
        };

        let page_index = self.page_index;
        self.page_index += 1;

        let first_row_index = match &self.offset_index {
            Some(index) => index.first_row_index(page_index).ok_or_else(|| {
                MetaError::page_decode(format!(
                    "offset index has {} pages, missing page {page_index}",
                    index.page_locations.len()
                ))
            })?,
            None => -1,
        };

        let page = match page {
            DataPage::V1(page) => DataPage::V1(self.decompress_v1(page, first_row_index)?),
            DataPage::V2(page) => DataPage::V2(self.decompress_v2(page, first_row_index)?),
        };

        trace!(
            %page_index,
            %first_row_index,
            num_values = page.num_values(),
            "read data page"
        );

        Ok(Some(page))
    }

    /// Decompress the dictionary page, if the chunk has one.
    ///
    /// Independent of data page reads and may be called any number of times.
    pub fn read_dictionary_page(&self) -> Result<Option<DictionaryPage>> {
        let page = match &self.dictionary {
            Some(page) => page,
            None => return Ok(None),
        };

        let buffer = self.decompress(&page.buffer, page.uncompressed_size, "dictionary page")?;

        Ok(Some(DictionaryPage {
            buffer,
            uncompressed_size: page.uncompressed_size,
            num_values: page.num_values,
            encoding: page.encoding,
        }))
    }

    fn decompress_v1(&self, page: DataPageV1, first_row_index: i64) -> Result<DataPageV1> {
        let buffer = self.decompress(&page.buffer, page.uncompressed_size, "data page")?;
        Ok(DataPageV1 {
            buffer,
            first_row_index,
            ..page
        })
    }

    fn decompress_v2(&self, page: DataPageV2, first_row_index: i64) -> Result<DataPageV2> {
        if !page.is_compressed {
            return Ok(DataPageV2 {
                first_row_index,
                ..page
            });
        }

        let levels_len = page.repetition_levels.len() + page.definition_levels.len();
        let data_size = i64::from(page.uncompressed_size) - levels_len as i64;
        let data_size = i32::try_from(data_size)
            .ok()
            .filter(|size| *size >= 0)
            .ok_or_else(|| {
                MetaError::page_decode(format!(
                    "uncompressed page size {} is smaller than level sizes {levels_len}",
                    page.uncompressed_size
                ))
            })?;

        let data = self.decompress(&page.data, data_size, "data page v2")?;
        Ok(DataPageV2 {
            data,
            first_row_index,
            is_compressed: false,
            ..page
        })
    }

    fn decompress(&self, input: &Bytes, expected_size: i32, what: &str) -> Result<Bytes> {
        let expected_size = usize::try_from(expected_size).map_err(|_| {
            MetaError::page_decode(format!(
                "negative uncompressed size {expected_size} for {what}"
            ))
        })?;

        if self.codec == CompressionCodec::Uncompressed {
            if input.len() != expected_size {
                return Err(MetaError::page_decode(format!(
                    "uncompressed {what} is {} bytes, expected {expected_size}",
                    input.len()
                )));
            }
            return Ok(input.clone());
        }

        let out = self
            .decompressor
            .decompress(self.codec, input, expected_size)
            .map_err(|e| e.wrap(ErrorKind::PageDecode, format!("failed to decompress {what}")))?;

        if out.len() != expected_size {
            return Err(MetaError::page_decode(format!(
                "decompressed {what} is {} bytes, expected {expected_size}",
                out.len()
            )));
        }

        Ok(Bytes::from(out))
    }
}

/// Compressed pages of a column chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnChunkPages {
    pub dictionary: Option<DictionaryPage>,
    pub pages: Vec<DataPage>,
}

/// Split the raw bytes of a column chunk into compressed pages.
///
/// `bytes` starts at the chunk's first page, see
/// [`ColumnChunkMetadata::byte_range`]. Parsing stops once the chunk's value
/// count is reached or the bytes run out. Index pages are skipped. Only page
/// headers go through `decryption`, each with the AAD for its ordinal.
/// Payloads are returned as stored.
pub fn read_column_chunk_pages(
    bytes: Bytes,
    chunk: &ColumnChunkMetadata,
    mut decryption: Option<PageHeaderDecryption>,
) -> Result<ColumnChunkPages> {
    let codec = WireCodec::new();
    let mut result = ColumnChunkPages::default();
    let mut values_read: i64 = 0;
    let mut offset = 0;
    let mut ordinal = 0;

    while values_read < chunk.num_values && offset < bytes.len() {
        let aad;
        let ctx = match decryption.as_mut() {
            Some(decryption) => {
                aad = decryption.aad(ordinal);
                Some(DecryptionContext::new(decryption.decryptor(), &aad))
            }
            None => None,
        };
        let (header, consumed) =
            codec.decode_prefix::<thrift_gen::PageHeader>(&bytes[offset..], ctx)?;
        offset += consumed;
        ordinal += 1;

        let page_len = usize::try_from(header.compressed_page_size)
            .ok()
            .filter(|len| offset + len <= bytes.len())
            .ok_or_else(|| {
                MetaError::corrupt(format!(
                    "page at offset {offset} claims {} bytes, {} available",
                    header.compressed_page_size,
                    bytes.len() - offset
                ))
            })?;
        let payload = bytes.slice(offset..offset + page_len);
        offset += page_len;

        let page_type = PageType::try_from(header.type_)?;
        trace!(?page_type, %page_len, "read page header");

        match page_type {
            PageType::DictionaryPage => {
                if result.dictionary.is_some() {
                    return Err(MetaError::corrupt(format!(
                        "column '{}' has more than one dictionary page",
                        chunk.path
                    )));
                }
                let dict = header
                    .dictionary_page_header
                    .ok_or_else(|| MetaError::corrupt("missing dictionary page header"))?;
                result.dictionary = Some(DictionaryPage {
                    buffer: payload,
                    uncompressed_size: header.uncompressed_page_size,
                    num_values: dict.num_values,
                    encoding: dict.encoding.try_into()?,
                });
            }
            PageType::DataPage => {
                let data = header
                    .data_page_header
                    .ok_or_else(|| MetaError::corrupt("missing data page header"))?;
                values_read += i64::from(data.num_values);
                result.pages.push(DataPage::V1(DataPageV1 {
                    buffer: payload,
                    num_values: data.num_values,
                    uncompressed_size: header.uncompressed_page_size,
                    first_row_index: -1,
                    statistics: data.statistics.map(Statistics::from_thrift),
                    repetition_level_encoding: data.repetition_level_encoding.try_into()?,
                    definition_level_encoding: data.definition_level_encoding.try_into()?,
                    value_encoding: data.encoding.try_into()?,
                }));
            }
            PageType::DataPageV2 => {
                let data = header
                    .data_page_header_v2
                    .ok_or_else(|| MetaError::corrupt("missing data page v2 header"))?;
                values_read += i64::from(data.num_values);
                result.pages.push(DataPage::V2(split_v2_page(
                    payload,
                    header.uncompressed_page_size,
                    data,
                )?));
            }
            PageType::IndexPage => (),
        }
    }

    if values_read < chunk.num_values {
        return Err(MetaError::corrupt(format!(
            "column '{}' expected {} values, pages contain {values_read}",
            chunk.path, chunk.num_values
        )));
    }

    debug!(
        column = %chunk.path,
        num_pages = result.pages.len(),
        has_dictionary = result.dictionary.is_some(),
        "read column chunk pages"
    );

    Ok(result)
}

fn split_v2_page(
    payload: Bytes,
    uncompressed_size: i32,
    header: thrift_gen::DataPageHeaderV2,
) -> Result<DataPageV2> {
    let level_len = |len: i32, name: &str| {
        usize::try_from(len)
            .map_err(|_| MetaError::corrupt(format!("negative {name} levels length: {len}")))
    };
    let rep_len = level_len(header.repetition_levels_byte_length, "repetition")?;
    let def_len = level_len(header.definition_levels_byte_length, "definition")?;
    if rep_len + def_len > payload.len() {
        return Err(MetaError::corrupt(format!(
            "levels length {} exceeds page size {}",
            rep_len + def_len,
            payload.len()
        )));
    }

    Ok(DataPageV2 {
        num_rows: header.num_rows,
        num_nulls: header.num_nulls,
        num_values: header.num_values,
        first_row_index: -1,
        repetition_levels: payload.slice(..rep_len),
        definition_levels: payload.slice(rep_len..rep_len + def_len),
        data_encoding: header.encoding.try_into()?,
        data: payload.slice(rep_len + def_len..),
        uncompressed_size,
        statistics: header.statistics.map(Statistics::from_thrift),
        is_compressed: header.is_compressed.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::encoding::Encoding;
    use crate::metadata::index::PageLocation;

    /// Records calls and returns zeroed buffers of a configurable size.
    #[derive(Debug, Default)]
    struct StubDecompressor {
        calls: Mutex<Vec<(usize, usize)>>,
        /// Added to the expected size when producing output.
        size_skew: usize,
        fail: bool,
    }

    impl Decompressor for StubDecompressor {
        fn decompress(
            &self,
            _codec: CompressionCodec,
            input: &[u8],
            expected_size: usize,
        ) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push((input.len(), expected_size));
            if self.fail {
                return Err(MetaError::new("stub failure"));
            }
            Ok(vec![0; expected_size + self.size_skew])
        }
    }

    fn v1_page(compressed: usize, uncompressed: i32, num_values: i32) -> DataPage {
        DataPage::V1(DataPageV1 {
            buffer: Bytes::from(vec![1; compressed]),
            num_values,
            uncompressed_size: uncompressed,
            first_row_index: -1,
            statistics: None,
            repetition_level_encoding: Encoding::Rle,
            definition_level_encoding: Encoding::Rle,
            value_encoding: Encoding::Plain,
        })
    }

    fn v2_page(is_compressed: bool, uncompressed: i32) -> DataPage {
        DataPage::V2(DataPageV2 {
            num_rows: 10,
            num_nulls: 0,
            num_values: 10,
            first_row_index: -1,
            repetition_levels: Bytes::from_static(&[1, 2]),
            definition_levels: Bytes::from_static(&[3, 4, 5]),
            data_encoding: Encoding::Plain,
            data: Bytes::from_static(&[9; 8]),
            uncompressed_size: uncompressed,
            statistics: None,
            is_compressed,
        })
    }

    fn offset_index(first_rows: &[i64]) -> OffsetIndex {
        OffsetIndex {
            page_locations: first_rows
                .iter()
                .map(|&first_row_index| PageLocation {
                    offset: 0,
                    compressed_page_size: 0,
                    first_row_index,
                })
                .collect(),
        }
    }

    #[test]
    fn v1_pages_with_offset_index() {
        let stub = Arc::new(StubDecompressor::default());
        let mut reader = PageReader::new(
            CompressionCodec::Snappy,
            vec![v1_page(10, 40, 4), v1_page(12, 50, 6)],
            None,
            Some(offset_index(&[0, 4])),
            stub.clone(),
        );
        assert_eq!(10, reader.total_value_count());

        let first = reader.read_page().unwrap().unwrap();
        assert_eq!(0, first.first_row_index());
        let second = reader.read_page().unwrap().unwrap();
        assert_eq!(4, second.first_row_index());
        match second {
            DataPage::V1(page) => assert_eq!(50, page.buffer.len()),
            other => panic!("unexpected page: {other:?}"),
        }

        assert_eq!(vec![(10, 40), (12, 50)], *stub.calls.lock().unwrap());

        assert!(reader.read_page().unwrap().is_none());
        assert!(reader.read_page().unwrap().is_none());
        // Total doesn't shrink as pages are read.
        assert_eq!(10, reader.total_value_count());
    }

    #[test]
    fn no_offset_index() {
        let mut reader = PageReader::new(
            CompressionCodec::Uncompressed,
            vec![v1_page(8, 8, 2)],
            None,
            None,
            Arc::new(StubDecompressor::default()),
        );
        let page = reader.read_page().unwrap().unwrap();
        assert_eq!(-1, page.first_row_index());
    }

    #[test]
    fn short_offset_index() {
        let mut reader = PageReader::new(
            CompressionCodec::Snappy,
            vec![v1_page(1, 1, 1), v1_page(1, 1, 1)],
            None,
            Some(offset_index(&[0])),
            Arc::new(StubDecompressor::default()),
        );
        reader.read_page().unwrap().unwrap();
        let err = reader.read_page().unwrap_err();
        assert_eq!(ErrorKind::PageDecode, err.kind());
    }

    #[test]
    fn v2_compressed_decompresses_data_only() {
        let stub = Arc::new(StubDecompressor::default());
        let mut reader = PageReader::new(
            CompressionCodec::Zstd,
            vec![v2_page(true, 25)],
            None,
            Some(offset_index(&[7])),
            stub.clone(),
        );

        let page = match reader.read_page().unwrap().unwrap() {
            DataPage::V2(page) => page,
            other => panic!("unexpected page: {other:?}"),
        };
        // 25 - 2 repetition bytes - 3 definition bytes.
        assert_eq!(vec![(8, 20)], *stub.calls.lock().unwrap());
        assert_eq!(20, page.data.len());
        assert!(!page.is_compressed);
        assert_eq!(7, page.first_row_index);
        assert_eq!(&[1, 2], page.repetition_levels.as_ref());
        assert_eq!(&[3, 4, 5], page.definition_levels.as_ref());
    }

    #[test]
    fn v2_uncompressed_returned_as_is() {
        let stub = Arc::new(StubDecompressor::default());
        let mut reader = PageReader::new(
            CompressionCodec::Zstd,
            vec![v2_page(false, 13)],
            None,
            Some(offset_index(&[3])),
            stub.clone(),
        );

        let page = reader.read_page().unwrap().unwrap();
        let mut expected = v2_page(false, 13);
        if let DataPage::V2(p) = &mut expected {
            p.first_row_index = 3;
        }
        assert_eq!(expected, page);
        assert!(stub.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn v2_levels_larger_than_page() {
        let mut reader = PageReader::new(
            CompressionCodec::Zstd,
            vec![v2_page(true, 4)],
            None,
            None,
            Arc::new(StubDecompressor::default()),
        );
        let err = reader.read_page().unwrap_err();
        assert_eq!(ErrorKind::PageDecode, err.kind());
    }

    #[test]
    fn size_mismatch() {
        let stub = StubDecompressor {
            size_skew: 1,
            ..Default::default()
        };
        let mut reader = PageReader::new(
            CompressionCodec::Gzip,
            vec![v1_page(3, 10, 1)],
            None,
            None,
            Arc::new(stub),
        );
        let err = reader.read_page().unwrap_err();
        assert_eq!(ErrorKind::PageDecode, err.kind());
    }

    #[test]
    fn decompress_failure_consumes_page() {
        let stub = StubDecompressor {
            fail: true,
            ..Default::default()
        };
        let mut reader = PageReader::new(
            CompressionCodec::Gzip,
            vec![v1_page(3, 10, 1)],
            None,
            None,
            Arc::new(stub),
        );
        let err = reader.read_page().unwrap_err();
        assert_eq!(ErrorKind::PageDecode, err.kind());
        assert!(reader.read_page().unwrap().is_none());
    }

    #[test]
    fn dictionary_independent_of_cursor() {
        let stub = Arc::new(StubDecompressor::default());
        let mut reader = PageReader::new(
            CompressionCodec::Snappy,
            vec![v1_page(2, 4, 1)],
            Some(DictionaryPage {
                buffer: Bytes::from_static(b"dict"),
                uncompressed_size: 16,
                num_values: 4,
                encoding: Encoding::PlainDictionary,
            }),
            None,
            stub.clone(),
        );

        reader.read_page().unwrap().unwrap();
        let dict = reader.read_dictionary_page().unwrap().unwrap();
        assert_eq!(16, dict.buffer.len());
        assert_eq!(4, dict.num_values);
        assert!(reader.read_dictionary_page().unwrap().is_some());
    }

    #[test]
    fn no_dictionary() {
        let reader = PageReader::new(
            CompressionCodec::Snappy,
            Vec::new(),
            None,
            None,
            Arc::new(StubDecompressor::default()),
        );
        assert!(reader.read_dictionary_page().unwrap().is_none());
        assert_eq!(0, reader.total_value_count());
    }
}
