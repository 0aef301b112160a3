//! Reading and writing parquet file metadata.
//!
//! Decodes the footer at the end of a parquet file into a typed
//! [`FileMetadata`](metadata::file::FileMetadata), encodes it back, and hands
//! out the decompressed pages of individual column chunks.

pub mod compression;
pub mod counters;
pub mod crypto;
pub mod encoding;
pub mod intern;
pub mod io;
pub mod metadata;
pub mod page;
pub mod page_reader;
pub mod protocol;
pub mod statistics;
pub mod thrift_gen;
pub mod types;

pub(crate) mod thrift_ext;

pub use metadata::footer::{FooterReadOptions, FooterReader, ParquetFooter};
pub use parquet_meta_error::{ErrorKind, MetaError, Result};
pub use thrift_ext::TSerializable;
