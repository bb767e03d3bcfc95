pub mod local_backend;

use crate::config::StoreConfig;
use crate::error::Result;

use self::local_backend::LocalBackend;

/// Key/value object storage underneath a store.
///
/// Keys are `/`-separated paths relative to the store root.
pub trait StorageBackend: Send + Sync {
    /// Read a whole object. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace an object atomically; readers see the old or the new bytes.
    fn put(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Read up to `length` bytes starting at `offset`. Returns `None` if the
    /// key does not exist; may return fewer bytes at end of object.
    fn get_range(&self, key: &str, offset: u64, length: u64) -> Result<Option<Vec<u8>>>;
}

/// Build the storage backend for a store configuration.
pub fn backend_from_config(cfg: &StoreConfig) -> Result<Box<dyn StorageBackend>> {
    Ok(Box::new(LocalBackend::new(cfg.root())?))
}
