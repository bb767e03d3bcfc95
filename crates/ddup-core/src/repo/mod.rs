pub mod container;
pub mod format;

use std::io::Write;

use tracing::{debug, info};

use crate::chunk_hash::ChunkHash;
use crate::chunker;
use crate::config::{ChunkerParams, CONTAINER_CAPACITY};
use crate::error::{DedupError, Result};
use crate::index::{ChunkLocation, CorpusStats, DedupIndex};
use crate::recipe::{FileRecipe, RecipeBook};
use crate::storage::StorageBackend;

use self::container::{read_chunk, ContainerWriter};
use self::format::{decode_object, encode_object, ObjectType};

/// Storage key of the dedup index snapshot.
pub const INDEX_KEY: &str = "metadata/index";
/// Storage key of the recipe book snapshot.
pub const RECIPES_KEY: &str = "metadata/recipes";

/// An open store session.
///
/// The index and recipe book are loaded whole by [`Repository::open`],
/// mutated in memory, and written back whole by [`Repository::save`].
/// Dropping a session without saving leaves the persisted metadata untouched.
pub struct Repository {
    storage: Box<dyn StorageBackend>,
    index: DedupIndex,
    recipes: RecipeBook,
    writer: ContainerWriter,
}

impl Repository {
    /// Load the metadata snapshots, starting empty where none exist yet.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let index: DedupIndex = match storage.get(INDEX_KEY)? {
            Some(data) => decode_object(&data, ObjectType::DedupIndex)?,
            None => {
                debug!("no index snapshot found, starting empty");
                DedupIndex::new()
            }
        };
        let recipes: RecipeBook = match storage.get(RECIPES_KEY)? {
            Some(data) => decode_object(&data, ObjectType::RecipeBook)?,
            None => {
                debug!("no recipe snapshot found, starting empty");
                RecipeBook::new()
            }
        };
        debug!(
            "opened store: {} chunks, {} recipes, {} containers",
            index.len(),
            recipes.len(),
            index.stats().container_count
        );
        Ok(Self {
            storage,
            index,
            recipes,
            writer: ContainerWriter::new(CONTAINER_CAPACITY),
        })
    }

    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn stats(&self) -> &CorpusStats {
        self.index.stats()
    }

    /// Find or store one chunk.
    ///
    /// A known hash returns its existing location without writing anything.
    /// A new chunk is appended whole to the open container; when it does not
    /// fit, the open container is sealed and the next one is started.
    pub fn admit(&mut self, chunk: &[u8], hash: ChunkHash) -> Result<ChunkLocation> {
        if let Some(location) = self.index.get(&hash) {
            debug!("dedup hit {hash:?} -> container {}", location.container_id);
            return Ok(*location);
        }
        if chunk.len() > self.writer.capacity() {
            return Err(DedupError::ChunkTooLarge {
                length: chunk.len(),
                capacity: self.writer.capacity(),
            });
        }
        if !self.writer.fits(chunk.len()) {
            self.writer.seal(self.storage.as_ref())?;
            let container_id = self.index.next_container_id();
            self.writer.open(container_id)?;
        }
        let location = self.writer.append(chunk)?;
        Ok(self.index.insert(hash, location))
    }

    /// Seal the open container, if any.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.seal(self.storage.as_ref())?;
        Ok(())
    }

    /// Chunk `data`, store its unique chunks and record its recipe under `name`.
    ///
    /// The open container is sealed before returning, so every location the
    /// recipe references is durable. A previous recipe with the same name is
    /// replaced.
    pub fn store_file(
        &mut self,
        name: &str,
        data: &[u8],
        params: &ChunkerParams,
    ) -> Result<&FileRecipe> {
        let extents = chunker::chunk_data(data, params)?;
        let unique_before = self.index.stats().unique_chunk_count;

        let mut recipe = FileRecipe::new(name);
        for (offset, length) in extents {
            let chunk = &data[offset..offset + length];
            let hash = ChunkHash::compute(chunk);
            self.admit(chunk, hash)?;
            self.index.record_logical_chunk(length);
            recipe.push(hash, length);
        }
        self.flush()?;
        self.index.record_file();

        info!(
            "stored '{name}': {} bytes in {} chunks ({} new)",
            recipe.size,
            recipe.chunks.len(),
            self.index.stats().unique_chunk_count - unique_before
        );
        if let Some(previous) = self.recipes.insert(recipe) {
            debug!("replaced recipe for '{}'", previous.name);
        }
        self.recipes
            .get(name)
            .ok_or_else(|| DedupError::RecipeNotFound(name.to_string()))
    }

    /// Persist the index and recipe snapshots.
    ///
    /// Any open container is sealed first; the snapshots are only written
    /// once every container they reference is in storage.
    pub fn save(&mut self) -> Result<()> {
        self.flush()?;
        let index_bytes = encode_object(ObjectType::DedupIndex, &self.index)?;
        let recipe_bytes = encode_object(ObjectType::RecipeBook, &self.recipes)?;
        self.storage.put(INDEX_KEY, &index_bytes)?;
        self.storage.put(RECIPES_KEY, &recipe_bytes)?;
        debug!(
            "saved metadata: index {} bytes, recipes {} bytes",
            index_bytes.len(),
            recipe_bytes.len()
        );
        Ok(())
    }

    pub fn read_chunk(&self, location: &ChunkLocation) -> Result<Vec<u8>> {
        read_chunk(self.storage.as_ref(), location)
    }

    /// Write the reconstructed contents of `name` to `out`.
    /// Returns the number of bytes written.
    pub fn restore_file<W: Write>(&self, name: &str, out: &mut W) -> Result<u64> {
        let recipe = self
            .recipes
            .get(name)
            .ok_or_else(|| DedupError::RecipeNotFound(name.to_string()))?;
        let locations = recipe.resolve(&self.index)?;

        let mut written = 0u64;
        for location in &locations {
            let chunk = self.read_chunk(location)?;
            out.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        if written != recipe.size {
            return Err(DedupError::InvalidFormat(format!(
                "reconstructed {written} bytes for '{name}', recipe records {}",
                recipe.size
            )));
        }
        debug!("restored '{name}': {written} bytes from {} chunks", locations.len());
        Ok(written)
    }
}
