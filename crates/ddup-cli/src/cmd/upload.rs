use ddup_core::commands;
use ddup_core::config::{ChunkerParams, StoreConfig};

use crate::format::{format_ratio, format_size_with_bytes};
use crate::table::{add_kv_row, CliTableTheme};

pub(crate) fn run_upload(
    config: &StoreConfig,
    min_chunk: i32,
    modulus: i32,
    max_chunk: i32,
    multiplier: i32,
    source: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = ChunkerParams::new(min_chunk, modulus, max_chunk, multiplier)?;
    let stats = commands::upload::run(config, source, &params)?;
    let corpus = &stats.corpus;

    let theme = CliTableTheme::detect();
    let mut table = theme.new_kv_table();
    add_kv_row(&mut table, theme, "Files stored", corpus.file_count);
    add_kv_row(
        &mut table,
        theme,
        "Pre-deduplicated chunks",
        corpus.logical_chunk_count,
    );
    add_kv_row(&mut table, theme, "Unique chunks", corpus.unique_chunk_count);
    add_kv_row(
        &mut table,
        theme,
        "Pre-deduplicated bytes",
        format_size_with_bytes(corpus.logical_byte_count),
    );
    add_kv_row(
        &mut table,
        theme,
        "Unique bytes",
        format_size_with_bytes(corpus.unique_byte_count),
    );
    add_kv_row(&mut table, theme, "Containers", corpus.container_count);
    add_kv_row(
        &mut table,
        theme,
        "Deduplication ratio",
        format_ratio(corpus.dedup_ratio()),
    );

    println!(
        "Stored '{}': {} in {} chunks",
        stats.name,
        format_size_with_bytes(stats.file_size),
        stats.chunk_count
    );
    println!("{table}");
    Ok(())
}
