//! ip2region - IPv4 to region lookup over a pre-built binary index.
//!
//! The index is a sorted list of non-overlapping IPv4 ranges, each mapped to
//! a region record (a numeric city id plus opaque region text). Lookups are
//! binary searches over fixed-size index blocks.
//!
//! # Features
//!
//! - **Three search modes**: fully buffered (`memory`), direct on-disk
//!   (`binary`) and header-accelerated on-disk (`btree`)
//! - **Lazy bootstrap**: nothing is opened or read until the first lookup
//! - **Sticky corruption**: a searcher that finds its index corrupt keeps
//!   reporting it instead of returning wrong answers
//! - **Thread-safe buffered search**: [`MemorySearcher`] and
//!   [`CachedRegionSearcher`] can be shared across threads
//! - **Hot reload**: swap in a new index without blocking readers
//!
//! # Quick Start
//!
//! ```ignore
//! use ip2region::{RegionSearcher, SearchAlgorithm};
//!
//! let mut searcher = RegionSearcher::new("ip2region.db")
//!     .with_algorithm(SearchAlgorithm::BTree);
//!
//! match searcher.find("1.0.0.128")? {
//!     Some(info) => println!("{} {}", info.city_id, info.region),
//!     None => println!("not found"),
//! }
//! ```
//!
//! # Global Searcher
//!
//! ```ignore
//! use ip2region::{global, SearcherConfig};
//!
//! global::init(&SearcherConfig::load("searcher.yaml")?)?;
//! let region = global::find("8.8.8.8")?;
//! ```

mod error;

pub mod algorithm;
pub mod binary;
pub mod config;
pub mod global;
pub mod ip;
pub mod region;

pub use algorithm::SearchAlgorithm;
pub use binary::{
    CacheStats, CachedRegionSearcher, CachedSearcherConfig, IndexInfo, IndexSource,
    MemorySearcher, RegionSearcher,
};
pub use config::SearcherConfig;
pub use error::{Error, Result};
pub use ip::{normalize_ip, IpQuery};
pub use region::RegionInfo;
