use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chunk_hash::ChunkHash;
use crate::error::{DedupError, Result};
use crate::index::{ChunkLocation, DedupIndex};

/// Ordered chunk list that rebuilds one ingested file.
///
/// Chunks are referenced by hash; their locations live once in the
/// [`DedupIndex`] and are looked up at reconstruction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecipe {
    pub name: String,
    pub chunks: Vec<ChunkHash>,
    /// Total length of the original file.
    pub size: u64,
    pub created: DateTime<Utc>,
}

impl FileRecipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunks: Vec::new(),
            size: 0,
            created: Utc::now(),
        }
    }

    pub fn push(&mut self, hash: ChunkHash, length: usize) {
        self.chunks.push(hash);
        self.size += length as u64;
    }

    /// Look up the stored location of every chunk, in order.
    pub fn resolve(&self, index: &DedupIndex) -> Result<Vec<ChunkLocation>> {
        self.chunks
            .iter()
            .map(|hash| {
                index.get(hash).copied().ok_or_else(|| {
                    DedupError::InvalidFormat(format!(
                        "recipe '{}' references chunk {hash} missing from the index",
                        self.name
                    ))
                })
            })
            .collect()
    }
}

/// All recipes in the store, keyed by file name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeBook {
    recipes: HashMap<String, FileRecipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `recipe` under its name, returning the recipe it replaced.
    pub fn insert(&mut self, recipe: FileRecipe) -> Option<FileRecipe> {
        self.recipes.insert(recipe.name.clone(), recipe)
    }

    pub fn get(&self, name: &str) -> Option<&FileRecipe> {
        self.recipes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
