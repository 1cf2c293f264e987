// the only exception is the memory-map call in `read::batch`
#![deny(unsafe_code)]
//! Implementation of the parquet columnar format: metadata, pages,
//! encodings and file IO.

pub mod error;
pub mod arena;
pub mod compression;
pub mod encoding;
pub mod format;
pub mod indexes;
pub mod metadata;
pub mod page;
mod parquet_bridge;
pub mod read;
pub mod schema;
pub mod statistics;
pub mod thrift;
pub mod types;
pub mod write;

const FOOTER_SIZE: u64 = 8;
const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// The number of bytes read at the end of the parquet file on first read
const DEFAULT_FOOTER_READ_SIZE: u64 = 64 * 1024;

/// Maximum number of bytes a page header may occupy on the wire.
const DEFAULT_MAX_PAGE_HEADER_SIZE: usize = 1024 * 1024;

/// `created_by` written when the user does not provide one.
pub(crate) const DEFAULT_CREATED_BY: &str =
    concat!("parquet-core version ", env!("CARGO_PKG_VERSION"));
