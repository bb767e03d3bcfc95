use tracing::debug;

use crate::error::{DedupError, Result};
use crate::index::ChunkLocation;
use crate::storage::StorageBackend;

/// Storage key of a container file.
pub fn container_key(container_id: u32) -> String {
    format!("data/{container_id}")
}

/// Buffers unique chunk bytes for the open container and writes them out
/// when the container is sealed.
///
/// Containers hold raw concatenated chunk bytes with no header or framing;
/// chunk extents are known only through the index.
pub struct ContainerWriter {
    capacity: usize,
    container_id: Option<u32>,
    bytes: Vec<u8>,
}

impl ContainerWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            container_id: None,
            bytes: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_open(&self) -> bool {
        self.container_id.is_some()
    }

    /// Whether `length` more bytes fit in the open container.
    pub fn fits(&self, length: usize) -> bool {
        self.is_open() && self.bytes.len() + length <= self.capacity
    }

    /// Start buffering a new container. Any previous container must be sealed.
    pub fn open(&mut self, container_id: u32) -> Result<()> {
        if let Some(current) = self.container_id {
            return Err(DedupError::InvalidFormat(format!(
                "container {current} is still open"
            )));
        }
        debug!("opening container {container_id}");
        self.container_id = Some(container_id);
        self.bytes.clear();
        Ok(())
    }

    /// Append a whole chunk to the open container and return where it landed.
    pub fn append(&mut self, chunk: &[u8]) -> Result<ChunkLocation> {
        let container_id = self
            .container_id
            .ok_or_else(|| DedupError::InvalidFormat("no open container".into()))?;
        if !self.fits(chunk.len()) {
            return Err(DedupError::ChunkTooLarge {
                length: chunk.len(),
                capacity: self.capacity,
            });
        }
        let location = ChunkLocation {
            container_id,
            offset: self.bytes.len() as u64,
            length: chunk.len() as u32,
        };
        self.bytes.extend_from_slice(chunk);
        Ok(location)
    }

    /// Write the open container to storage and close it.
    ///
    /// Returns the sealed container id, or `None` if nothing was open. On a
    /// storage error the container stays open with its bytes intact.
    pub fn seal(&mut self, storage: &dyn StorageBackend) -> Result<Option<u32>> {
        let Some(container_id) = self.container_id else {
            return Ok(None);
        };
        storage.put(&container_key(container_id), &self.bytes)?;
        debug!(
            "sealed container {container_id} ({} bytes)",
            self.bytes.len()
        );
        self.container_id = None;
        self.bytes.clear();
        Ok(Some(container_id))
    }
}

/// Read the bytes of one stored chunk.
pub fn read_chunk(storage: &dyn StorageBackend, location: &ChunkLocation) -> Result<Vec<u8>> {
    let data = storage
        .get_range(
            &container_key(location.container_id),
            location.offset,
            location.length as u64,
        )?
        .ok_or(DedupError::ContainerNotFound(location.container_id))?;
    if data.len() != location.length as usize {
        return Err(DedupError::ShortRead {
            container_id: location.container_id,
            offset: location.offset,
            expected: location.length,
            actual: data.len(),
        });
    }
    Ok(data)
}
