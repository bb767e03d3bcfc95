use thiserror::Error;

pub type Result<T> = std::result::Result<T, DedupError>;

#[derive(Debug, Error)]
pub enum DedupError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("source file not found: '{0}'")]
    SourceNotFound(String),

    #[error("\"{0}\" does not exist")]
    RecipeNotFound(String),

    #[error("container not found: {0}")]
    ContainerNotFound(u32),

    #[error("short read on container {container_id} at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        container_id: u32,
        offset: u64,
        expected: u32,
        actual: usize,
    },

    #[error("chunk of {length} bytes does not fit in a container of {capacity} bytes")]
    ChunkTooLarge { length: usize, capacity: usize },

    #[error("invalid store format: {0}")]
    InvalidFormat(String),

    #[error("unknown object type tag: {0}")]
    UnknownObjectType(u8),

    #[error("unsupported store version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
