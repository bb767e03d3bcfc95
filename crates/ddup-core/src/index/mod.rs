use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk_hash::ChunkHash;
use crate::config::CONTAINER_CAPACITY;
use crate::error::{DedupError, Result};

/// Where the bytes of one unique chunk live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLocation {
    pub container_id: u32,
    pub offset: u64,
    pub length: u32,
}

impl ChunkLocation {
    pub fn end(&self) -> u64 {
        self.offset + self.length as u64
    }
}

/// Running totals over every ingestion the store has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub file_count: u64,
    pub logical_chunk_count: u64,
    pub unique_chunk_count: u64,
    pub logical_byte_count: u64,
    pub unique_byte_count: u64,
    pub container_count: u32,
}

impl CorpusStats {
    /// Logical bytes divided by unique bytes, or `None` before anything is stored.
    pub fn dedup_ratio(&self) -> Option<f64> {
        if self.unique_byte_count == 0 {
            return None;
        }
        Some(self.logical_byte_count as f64 / self.unique_byte_count as f64)
    }
}

/// Content-addressed index of every unique chunk in the store.
/// Maps chunk hash -> (container_id, offset, length).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DedupIndex {
    entries: HashMap<ChunkHash, ChunkLocation>,
    stats: CorpusStats,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this chunk already exists (dedup hit).
    pub fn contains(&self, hash: &ChunkHash) -> bool {
        self.entries.contains_key(hash)
    }

    pub fn get(&self, hash: &ChunkHash) -> Option<&ChunkLocation> {
        self.entries.get(hash)
    }

    /// Record a newly stored unique chunk.
    ///
    /// Returns the location that ends up indexed: an existing entry is never
    /// replaced, so a second insert of the same hash returns the first location.
    pub fn insert(&mut self, hash: ChunkHash, location: ChunkLocation) -> ChunkLocation {
        if let Some(existing) = self.entries.get(&hash) {
            return *existing;
        }
        self.entries.insert(hash, location);
        self.stats.unique_chunk_count += 1;
        self.stats.unique_byte_count += location.length as u64;
        location
    }

    /// Count one processed chunk, duplicate or not.
    pub fn record_logical_chunk(&mut self, length: usize) {
        self.stats.logical_chunk_count += 1;
        self.stats.logical_byte_count += length as u64;
    }

    pub fn record_file(&mut self) {
        self.stats.file_count += 1;
    }

    /// Reserve the next sequential container id.
    pub fn next_container_id(&mut self) -> u32 {
        self.stats.container_count += 1;
        self.stats.container_count
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkHash, &ChunkLocation)> {
        self.entries.iter()
    }

    /// Check that the statistics agree with the entries and that no two
    /// entries share bytes within a container.
    pub fn verify(&self) -> Result<()> {
        let stats = &self.stats;
        if stats.unique_chunk_count != self.entries.len() as u64 {
            return Err(DedupError::InvalidFormat(format!(
                "unique chunk count {} does not match {} index entries",
                stats.unique_chunk_count,
                self.entries.len()
            )));
        }

        let unique_bytes: u64 = self.entries.values().map(|loc| loc.length as u64).sum();
        if stats.unique_byte_count != unique_bytes {
            return Err(DedupError::InvalidFormat(format!(
                "unique byte count {} does not match indexed total {unique_bytes}",
                stats.unique_byte_count
            )));
        }
        if stats.logical_byte_count < stats.unique_byte_count {
            return Err(DedupError::InvalidFormat(format!(
                "logical bytes {} below unique bytes {}",
                stats.logical_byte_count, stats.unique_byte_count
            )));
        }

        let mut by_container: BTreeMap<u32, Vec<&ChunkLocation>> = BTreeMap::new();
        for loc in self.entries.values() {
            if loc.container_id == 0 || loc.container_id > stats.container_count {
                return Err(DedupError::InvalidFormat(format!(
                    "chunk references unknown container {}",
                    loc.container_id
                )));
            }
            by_container.entry(loc.container_id).or_default().push(loc);
        }
        for (container_id, locations) in &mut by_container {
            locations.sort_by_key(|loc| loc.offset);
            for pair in locations.windows(2) {
                if pair[0].end() > pair[1].offset {
                    return Err(DedupError::InvalidFormat(format!(
                        "overlapping chunks in container {container_id} at offset {}",
                        pair[1].offset
                    )));
                }
            }
            if let Some(last) = locations.last() {
                if last.end() > CONTAINER_CAPACITY as u64 {
                    return Err(DedupError::InvalidFormat(format!(
                        "container {container_id} holds {} bytes, over capacity",
                        last.end()
                    )));
                }
            }
        }

        debug!(
            "verified dedup index: {} entries across {} containers",
            self.entries.len(),
            by_container.len()
        );
        Ok(())
    }
}
