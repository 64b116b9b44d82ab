//! Fully buffered searcher.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::format::SuperBlock;
use super::search::{range_search, read_record};
use super::source::SliceSource;
use super::IndexSource;
use crate::{IpQuery, RegionInfo, Result};

/// Searcher holding the whole index file in memory.
///
/// Once constructed it never touches the filesystem again, so it is
/// `Send + Sync` and cloning only bumps a reference count. Share it across
/// threads freely.
#[derive(Clone)]
pub struct MemorySearcher {
    buffer: Arc<[u8]>,
    super_block: SuperBlock,
}

impl MemorySearcher {
    /// Read an index file into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        log::info!("Loaded index {:?} into memory ({} bytes)", path, data.len());
        Self::from_bytes(data)
    }

    /// Use an already loaded index.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let buffer = data.into();
        let super_block = SuperBlock::parse(&buffer)?;
        super_block.check_within(buffer.len() as u64)?;

        log::debug!(
            "Buffered index ready: {} blocks at {}..={}",
            super_block.total_blocks(),
            super_block.first_index_ptr,
            super_block.last_index_ptr
        );

        Ok(Self {
            buffer,
            super_block,
        })
    }

    pub(crate) fn load(source: &IndexSource) -> Result<Self> {
        match source {
            IndexSource::File(path) => Self::open(path),
            IndexSource::Bytes(bytes) => Self::from_bytes(Arc::clone(bytes)),
        }
    }

    /// Resolve `ip` to its region record.
    pub fn search(&self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        let ip = ip.to_ip_num()?;
        let mut source = SliceSource::new(&self.buffer);

        let hit = range_search(
            &mut source,
            self.super_block.first_index_ptr as u64,
            self.super_block.total_blocks(),
            ip,
        )?;

        match hit {
            Some(ptr) => read_record(&mut source, ptr).map(Some),
            None => Ok(None),
        }
    }

    /// Number of index blocks.
    pub fn total_blocks(&self) -> u32 {
        self.super_block.total_blocks()
    }
}

impl fmt::Debug for MemorySearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySearcher")
            .field("len", &self.buffer.len())
            .field("super_block", &self.super_block)
            .finish()
    }
}
