use std::path::Path;

use ddup_core::commands;
use ddup_core::config::StoreConfig;

use crate::format::format_bytes;

pub(crate) fn run_download(
    config: &StoreConfig,
    file_name: &str,
    dest: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let written = commands::download::run(config, file_name, dest)?;
    println!(
        "Restored '{file_name}' to {} ({})",
        dest.display(),
        format_bytes(written)
    );
    Ok(())
}
