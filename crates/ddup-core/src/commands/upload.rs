use std::path::Path;

use tracing::info;

use crate::config::{ChunkerParams, StoreConfig};
use crate::error::{DedupError, Result};
use crate::index::CorpusStats;
use crate::repo::Repository;
use crate::storage;

/// Outcome of one `upload`.
#[derive(Debug, Clone)]
pub struct UploadStats {
    pub name: String,
    pub file_size: u64,
    pub chunk_count: usize,
    pub corpus: CorpusStats,
}

/// Run `ddup upload`.
///
/// Parameters are validated before any file or store access. The store's
/// metadata is only replaced after every container write has succeeded.
pub fn run(config: &StoreConfig, source: &str, params: &ChunkerParams) -> Result<UploadStats> {
    params.validate()?;

    let data = read_source(Path::new(source))?;
    let backend = storage::backend_from_config(config)?;
    let mut repo = Repository::open(backend)?;

    let recipe = repo.store_file(source, &data, params)?;
    let file_size = recipe.size;
    let chunk_count = recipe.chunks.len();
    repo.save()?;

    let corpus = *repo.stats();
    info!(
        "upload complete: {} files, {} unique of {} chunks, {} containers",
        corpus.file_count,
        corpus.unique_chunk_count,
        corpus.logical_chunk_count,
        corpus.container_count
    );
    Ok(UploadStats {
        name: source.to_string(),
        file_size,
        chunk_count,
        corpus,
    })
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DedupError::SourceNotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
