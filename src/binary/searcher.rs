//! Region searcher with lazily bootstrapped memory, binary and b-tree modes.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::format::*;
use super::header::HeaderTable;
use super::memory::MemorySearcher;
use super::search::{range_search, read_record};
use super::source::{ByteSource, ReaderSource, SliceSource};
use crate::{Error, IpQuery, RegionInfo, Result, SearchAlgorithm, SearcherConfig};

/// Where the index bytes come from.
#[derive(Clone)]
pub enum IndexSource {
    /// Index file on disk
    File(PathBuf),
    /// Index already loaded into memory
    Bytes(Arc<[u8]>),
}

impl fmt::Debug for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSource::File(path) => f.debug_tuple("File").field(path).finish(),
            IndexSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

trait ReadSeek: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> ReadSeek for T {}

type Handle = ReaderSource<Box<dyn ReadSeek>>;

/// Lazily bootstrapped piece of searcher state.
///
/// Empty until the first lookup that needs it, then either ready or corrupt.
/// A bootstrap that finds the index corrupt is remembered, and every later
/// lookup reports the same error without touching the source again. Any
/// other bootstrap error leaves the state empty.
struct State<T> {
    loaded: Option<std::result::Result<T, String>>,
}

impl<T> State<T> {
    fn new() -> Self {
        Self { loaded: None }
    }

    fn ensure_ready(&mut self, init: impl FnOnce() -> Result<T>) -> Result<&mut T> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => match init() {
                Ok(value) => Ok(value),
                Err(Error::CorruptIndex(msg)) => {
                    log::warn!("Index is corrupt, searcher disabled: {}", msg);
                    Err(msg)
                }
                Err(e) => return Err(e),
            },
        };

        self.loaded
            .insert(loaded)
            .as_mut()
            .map_err(|msg| Error::CorruptIndex(msg.clone()))
    }
}

/// Open handle plus what the binary and b-tree modes cache about it.
struct DiskIndex {
    handle: Handle,
    super_block: SuperBlock,
    header: State<HeaderTable>,
}

impl DiskIndex {
    fn open(source: &IndexSource) -> Result<Self> {
        let reader: Box<dyn ReadSeek> = match source {
            IndexSource::File(path) => Box::new(File::open(path)?),
            IndexSource::Bytes(bytes) => Box::new(Cursor::new(Arc::clone(bytes))),
        };
        let mut handle = ReaderSource::new(reader);

        let mut raw = [0u8; SUPER_BLOCK_LENGTH];
        handle.read_at(0, &mut raw)?;
        let super_block = SuperBlock::parse(&raw)?;
        super_block.check_within(handle.stream_len()?)?;

        log::debug!(
            "Opened index handle: {} blocks at {}..={}",
            super_block.total_blocks(),
            super_block.first_index_ptr,
            super_block.last_index_ptr
        );

        Ok(Self {
            handle,
            super_block,
            header: State::new(),
        })
    }

    /// The header table, loaded on first use, alongside the handle.
    fn header_and_handle(&mut self) -> Result<(&HeaderTable, &mut Handle)> {
        let Self {
            handle,
            super_block,
            header,
        } = self;
        let super_block = *super_block;
        let table = header.ensure_ready(|| HeaderTable::load(&mut *handle, &super_block))?;
        Ok((table, handle))
    }
}

/// Layout summary of an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    /// Byte offset of the first index block
    pub first_index_ptr: u32,
    /// Byte offset of the last index block
    pub last_index_ptr: u32,
    /// Number of index blocks
    pub total_blocks: u32,
    /// Number of header table entries
    pub header_entries: usize,
}

/// IPv4 to region searcher.
///
/// Construction does no I/O. Each search mode bootstraps what it needs on
/// first use and keeps it for the lifetime of the searcher:
///
/// - [`memory_search`](Self::memory_search) loads the whole file once;
///   it takes `&self` and is safe to call from many threads after a
///   [`warm_up`](Self::warm_up).
/// - [`binary_search`](Self::binary_search) keeps one file handle and
///   reads one index block per probe.
/// - [`btree_search`](Self::btree_search) additionally caches the header
///   table and reads one window of blocks per lookup.
///
/// The file handle is closed when the searcher is dropped.
///
/// # Example
///
/// ```ignore
/// use ip2region::RegionSearcher;
///
/// let mut searcher = RegionSearcher::new("ip2region.db");
/// if let Some(info) = searcher.find("1.0.0.128")? {
///     println!("{} {}", info.city_id, info.region);
/// }
/// ```
pub struct RegionSearcher {
    source: IndexSource,
    algorithm: SearchAlgorithm,
    memory: OnceCell<std::result::Result<MemorySearcher, String>>,
    disk: State<DiskIndex>,
}

impl RegionSearcher {
    /// Create a searcher for an index file. The file is opened lazily.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_source(IndexSource::File(path.as_ref().to_path_buf()))
    }

    /// Create a searcher over an index already held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self::with_source(IndexSource::Bytes(data.into()))
    }

    /// Create a searcher from configuration values.
    pub fn from_config(config: &SearcherConfig) -> Self {
        Self::new(&config.path).with_algorithm(config.algorithm)
    }

    /// Create a searcher for any index source.
    pub fn with_source(source: IndexSource) -> Self {
        Self {
            source,
            algorithm: SearchAlgorithm::default(),
            memory: OnceCell::new(),
            disk: State::new(),
        }
    }

    /// Set the algorithm used by [`find`](Self::find).
    pub fn with_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Get the algorithm used by [`find`](Self::find).
    pub fn algorithm(&self) -> SearchAlgorithm {
        self.algorithm
    }

    /// Change the algorithm used by [`find`](Self::find).
    pub fn set_algorithm(&mut self, algorithm: SearchAlgorithm) {
        self.algorithm = algorithm;
    }

    /// Get the index source.
    pub fn source(&self) -> &IndexSource {
        &self.source
    }

    /// Search with the configured default algorithm.
    pub fn find(&mut self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        self.search(self.algorithm, ip)
    }

    /// Search with an explicit algorithm.
    pub fn search(
        &mut self,
        algorithm: SearchAlgorithm,
        ip: impl IpQuery,
    ) -> Result<Option<RegionInfo>> {
        match algorithm {
            SearchAlgorithm::Memory => self.memory_search(ip),
            SearchAlgorithm::Binary => self.binary_search(ip),
            SearchAlgorithm::BTree => self.btree_search(ip),
        }
    }

    /// Search the fully buffered index.
    pub fn memory_search(&self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        let ip = ip.to_ip_num()?;
        self.memory()?.search(ip)
    }

    /// Binary search straight against the index file.
    pub fn binary_search(&mut self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        let ip = ip.to_ip_num()?;
        let source = &self.source;
        let disk = self.disk.ensure_ready(|| DiskIndex::open(source))?;

        let hit = range_search(
            &mut disk.handle,
            disk.super_block.first_index_ptr as u64,
            disk.super_block.total_blocks(),
            ip,
        )?;

        match hit {
            Some(ptr) => read_record(&mut disk.handle, ptr).map(Some),
            None => Ok(None),
        }
    }

    /// Narrow the search with the header table, then search one window of
    /// index blocks read in a single call.
    pub fn btree_search(&mut self, ip: impl IpQuery) -> Result<Option<RegionInfo>> {
        let ip = ip.to_ip_num()?;
        let source = &self.source;
        let disk = self.disk.ensure_ready(|| DiskIndex::open(source))?;
        let (header, handle) = disk.header_and_handle()?;

        let Some((sptr, eptr)) = header.bracket(ip) else {
            return Ok(None);
        };

        let block_count = (eptr - sptr) / INDEX_BLOCK_LENGTH as u32 + 1;
        let mut window = vec![0u8; block_count as usize * INDEX_BLOCK_LENGTH];
        handle.read_at(sptr as u64, &mut window)?;

        match range_search(&mut SliceSource::new(&window), 0, block_count, ip)? {
            Some(ptr) => read_record(handle, ptr).map(Some),
            None => Ok(None),
        }
    }

    /// The buffered index, loading it on first use.
    pub fn memory(&self) -> Result<&MemorySearcher> {
        let loaded = self.memory.get_or_try_init(|| {
            match MemorySearcher::load(&self.source) {
                Ok(searcher) => Ok(Ok(searcher)),
                Err(Error::CorruptIndex(msg)) => {
                    log::warn!("Index is corrupt, memory search disabled: {}", msg);
                    Ok(Err(msg))
                }
                Err(e) => Err(e),
            }
        })?;

        loaded
            .as_ref()
            .map_err(|msg| Error::CorruptIndex(msg.clone()))
    }

    /// Bootstrap everything the configured algorithm needs, so the first
    /// real lookup does no setup work.
    pub fn warm_up(&mut self) -> Result<()> {
        match self.algorithm {
            SearchAlgorithm::Memory => self.memory().map(|_| ()),
            SearchAlgorithm::Binary => {
                let source = &self.source;
                self.disk.ensure_ready(|| DiskIndex::open(source)).map(|_| ())
            }
            SearchAlgorithm::BTree => self.index_info().map(|_| ()),
        }
    }

    /// Describe the index layout, opening the file and loading the header
    /// table if that has not happened yet.
    pub fn index_info(&mut self) -> Result<IndexInfo> {
        let source = &self.source;
        let disk = self.disk.ensure_ready(|| DiskIndex::open(source))?;
        let super_block = disk.super_block;
        let (header, _) = disk.header_and_handle()?;

        Ok(IndexInfo {
            first_index_ptr: super_block.first_index_ptr,
            last_index_ptr: super_block.last_index_ptr,
            total_blocks: super_block.total_blocks(),
            header_entries: header.len(),
        })
    }

    /// Release the file handle and buffers.
    pub fn close(self) {
        log::debug!("Closing searcher for {:?}", self.source);
    }
}
