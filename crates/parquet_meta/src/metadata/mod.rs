pub mod column_chunk;
pub mod file;
pub mod footer;
pub mod index;
pub mod row_group;
pub mod schema;
