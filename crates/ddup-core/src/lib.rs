pub mod chunk_hash;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod recipe;
pub mod repo;
pub mod storage;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod testutil;
