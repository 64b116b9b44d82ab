//! Binary index format and the searchers that read it.
//!
//! The index is a sorted list of non-overlapping IPv4 ranges, each pointing
//! at a variable-length region record. All integers are little-endian.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! |   SUPER BLOCK    |  8 bytes: first index ptr, last index ptr
//! +------------------+
//! |   HEADER TABLE   |  8192 bytes: up to 1024 (start ip, index ptr)
//! +------------------+
//! |   DATA RECORDS   |  variable: (city id: u32, region: UTF-8)
//! +------------------+
//! |   INDEX BLOCKS   |  12 bytes each: (start ip, end ip, data ptr)
//! +------------------+
//! ```
//!
//! A data pointer packs the record offset into its low 24 bits and the
//! record length into its high 8 bits.

mod cached_searcher;
mod format;
mod header;
mod memory;
mod search;
mod searcher;
mod source;

#[cfg(test)]
pub(crate) mod fixture;

pub use cached_searcher::{CacheStats, CachedRegionSearcher, CachedSearcherConfig};
pub use format::*;
pub use header::HeaderTable;
pub use memory::MemorySearcher;
pub use search::{range_search, read_record};
pub use searcher::{IndexInfo, IndexSource, RegionSearcher};
pub use source::{ByteSource, ReaderSource, SliceSource};
