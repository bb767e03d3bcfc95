use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ddup_core::config::STORE_ROOT_ENV;

#[derive(Parser)]
#[command(
    name = "ddup",
    version,
    about = "Content-defined chunking and deduplicating file store",
    after_help = "\
Store layout (under --repo):
  metadata/index     chunk index and corpus statistics
  metadata/recipes   per-file chunk recipes
  data/<id>          containers of unique chunk bytes

Environment variables:
  DDUP_REPO         Store root directory (overridden by --repo)"
)]
pub(crate) struct Cli {
    /// Store root directory
    #[arg(short = 'R', long = "repo", env = STORE_ROOT_ENV, default_value = ".", global = true)]
    pub repo: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Chunk a file and store its unique chunks
    #[command(allow_negative_numbers = true)]
    Upload {
        /// Minimum chunk size, also the rolling window width
        min_chunk: i32,

        /// Boundary modulus; must be a power of two
        avg_chunk_modulus: i32,

        /// Chunk length at which a boundary is forced
        max_chunk: i32,

        /// Rolling hash multiplier
        multiplier: i32,

        /// File to ingest; its path is the name used for download
        source: String,
    },

    /// Rebuild a previously uploaded file
    Download {
        /// Name the file was uploaded under
        file_name: String,

        /// Where to write the reconstructed file
        dest: PathBuf,
    },
}

impl Commands {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Upload { .. } => "upload",
            Commands::Download { .. } => "download",
        }
    }
}
