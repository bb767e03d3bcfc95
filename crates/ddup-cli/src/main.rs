mod cli;
mod cmd;
mod dispatch;
mod format;
mod table;

use clap::Parser;

use ddup_core::config::StoreConfig;

use cli::Cli;
use dispatch::dispatch_command;

fn main() {
    // Usage errors exit with 1; --help and --version still exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig::new(&cli.repo);
    tracing::debug!("using store at {}", config.root().display());

    if let Err(e) = dispatch_command(&cli.command, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
