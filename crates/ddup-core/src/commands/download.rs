use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::config::StoreConfig;
use crate::error::{DedupError, Result};
use crate::repo::Repository;
use crate::storage;

/// Run `ddup download`: rebuild `name` into `dest`.
///
/// Output goes to a temporary file beside `dest` that is renamed into place
/// once complete, so a failed download never leaves a truncated file behind.
/// Returns the number of bytes written.
pub fn run(config: &StoreConfig, name: &str, dest: &Path) -> Result<u64> {
    let backend = storage::backend_from_config(config)?;
    let repo = Repository::open(backend)?;
    if !repo.recipes().contains(name) {
        return Err(DedupError::RecipeNotFound(name.to_string()));
    }

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = output_tempfile(parent)?;
    let mut out = BufWriter::new(tmp);
    let written = repo.restore_file(name, &mut out)?;
    out.flush()?;
    let tmp = out.into_inner().map_err(|e| e.into_error())?;
    tmp.persist(dest).map_err(|e| e.error)?;

    info!("downloaded '{name}' to {} ({written} bytes)", dest.display());
    Ok(written)
}

/// Temporary output file in `dir`. On unix it is created with mode 0666 so
/// the process umask decides the final permissions, as for a plain create.
fn output_tempfile(dir: &Path) -> Result<tempfile::NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".ddup-download-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    Ok(builder.tempfile_in(dir)?)
}
