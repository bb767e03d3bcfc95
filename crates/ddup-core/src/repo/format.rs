use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DedupError, Result};

/// Magic bytes at the start of every metadata snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"DDUP";
/// Snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;
/// Size of the snapshot header (magic + version + type tag).
pub const SNAPSHOT_HEADER_SIZE: usize = 6;

/// Object type tags for the snapshot envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectType {
    DedupIndex = 1,
    RecipeBook = 2,
}

impl ObjectType {
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            1 => Ok(Self::DedupIndex),
            2 => Ok(Self::RecipeBook),
            _ => Err(DedupError::UnknownObjectType(v)),
        }
    }
}

/// Serialize a whole snapshot.
///
/// Wire format: `[4-byte magic][1-byte version][1-byte type_tag][msgpack]`
pub fn encode_object<T: Serialize>(obj_type: ObjectType, value: &T) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec(value)?;
    let mut out = Vec::with_capacity(SNAPSHOT_HEADER_SIZE + payload.len());
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.push(obj_type as u8);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parse a snapshot produced by [`encode_object`], checking its type tag.
pub fn decode_object<T: DeserializeOwned>(data: &[u8], expected: ObjectType) -> Result<T> {
    if data.len() < SNAPSHOT_HEADER_SIZE {
        return Err(DedupError::InvalidFormat("snapshot too small".into()));
    }
    if &data[..4] != SNAPSHOT_MAGIC {
        return Err(DedupError::InvalidFormat("bad snapshot magic".into()));
    }
    if data[4] != SNAPSHOT_VERSION {
        return Err(DedupError::UnsupportedVersion(data[4]));
    }
    let obj_type = ObjectType::from_u8(data[5])?;
    if obj_type != expected {
        return Err(DedupError::InvalidFormat(format!(
            "expected {expected:?} snapshot, found {obj_type:?}"
        )));
    }
    Ok(rmp_serde::from_slice(&data[SNAPSHOT_HEADER_SIZE..])?)
}
