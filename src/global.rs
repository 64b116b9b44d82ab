//! Process-wide searcher and its convenience API.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::{IpQuery, RegionInfo, RegionSearcher, SearcherConfig};

/// Global searcher. Lookups on the disk-backed modes need exclusive access
/// to the file handle, hence the mutex.
static GLOBAL_SEARCHER: Lazy<Mutex<Option<RegionSearcher>>> = Lazy::new(|| Mutex::new(None));

/// Install a searcher built from `config`, replacing any previous one.
///
/// Bootstraps the configured algorithm up front, so a bad path or a corrupt
/// index is reported here rather than on the first lookup.
pub fn init(config: &SearcherConfig) -> Result<()> {
    let mut searcher = RegionSearcher::from_config(config);
    searcher.warm_up()?;
    init_with(searcher);

    log::info!(
        "Initialized global searcher: {:?} ({})",
        config.path,
        config.algorithm
    );
    Ok(())
}

/// Install an already constructed searcher, replacing any previous one.
pub fn init_with(searcher: RegionSearcher) {
    *GLOBAL_SEARCHER.lock() = Some(searcher);
}

/// Check if the global searcher is initialized.
pub fn is_initialized() -> bool {
    GLOBAL_SEARCHER.lock().is_some()
}

/// Look up `ip` with the global searcher's default algorithm.
pub fn find(ip: impl IpQuery) -> Result<Option<RegionInfo>> {
    let mut guard = GLOBAL_SEARCHER.lock();
    let searcher = guard.as_mut().ok_or(Error::NotInitialized)?;
    searcher.find(ip)
}

/// Drop the global searcher, closing its file handle.
pub fn shutdown() {
    if let Some(searcher) = GLOBAL_SEARCHER.lock().take() {
        searcher.close();
    }
}
