use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{DedupError, Result};
use crate::storage::StorageBackend;

/// In-memory storage backend for testing. Clones share the same objects.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let map = self.data.lock().unwrap();
        let mut keys: Vec<String> = map
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn object_len(&self, key: &str) -> Option<usize> {
        self.data.lock().unwrap().get(key).map(Vec::len)
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self.data.lock().unwrap();
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut map = self.data.lock().unwrap();
        map.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_range(&self, key: &str, offset: u64, length: u64) -> Result<Option<Vec<u8>>> {
        let map = self.data.lock().unwrap();
        Ok(map.get(key).map(|data| {
            let start = (offset as usize).min(data.len());
            let end = start.saturating_add(length as usize).min(data.len());
            data[start..end].to_vec()
        }))
    }
}

/// Backend that refuses container writes after a fixed number of them.
pub struct FailingBackend {
    inner: MemoryBackend,
    container_puts_allowed: usize,
    container_puts: AtomicUsize,
}

impl FailingBackend {
    pub fn new(inner: MemoryBackend, container_puts_allowed: usize) -> Self {
        Self {
            inner,
            container_puts_allowed,
            container_puts: AtomicUsize::new(0),
        }
    }
}

impl StorageBackend for FailingBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        if key.starts_with("data/")
            && self.container_puts.fetch_add(1, Ordering::SeqCst) >= self.container_puts_allowed
        {
            return Err(DedupError::Io(std::io::Error::other("disk full")));
        }
        self.inner.put(key, data)
    }

    fn get_range(&self, key: &str, offset: u64, length: u64) -> Result<Option<Vec<u8>>> {
        self.inner.get_range(key, offset, length)
    }
}

/// Deterministic byte stream from a 64-bit LCG (high bits of each state).
pub fn lcg_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}
