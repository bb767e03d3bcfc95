use ddup_core::config::StoreConfig;

use crate::cli::Commands;
use crate::cmd;

pub(crate) fn dispatch_command(
    command: &Commands,
    config: &StoreConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("running {}", command.name());
    match command {
        Commands::Upload {
            min_chunk,
            avg_chunk_modulus,
            max_chunk,
            multiplier,
            source,
        } => cmd::upload::run_upload(
            config,
            *min_chunk,
            *avg_chunk_modulus,
            *max_chunk,
            *multiplier,
            source,
        ),
        Commands::Download { file_name, dest } => {
            cmd::download::run_download(config, file_name, dest)
        }
    }
}
