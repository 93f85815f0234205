use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Opaque, per-block payload. The engine never inspects the contents except
/// to shallow-merge partial updates; the schema belongs to the block kind's
/// definition (see [`crate::blocks::BlockDefinition`]).
pub type BlockData = serde_json::Map<String, serde_json::Value>;

/// Id-indexed block storage. Ordering lives separately in the document's
/// id sequence, so reordering never rewrites block bodies.
pub type BlockMap = HashMap<BlockId, Block>;

/// Stable identifier for one block, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One addressable unit of document content.
///
/// `kind` selects which registered [`crate::blocks::BlockDefinition`] owns the
/// behavior of this block; `data` is that definition's payload. Serializes to
/// the document export shape `{ "id", "type", "data" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: BlockData,
}

impl Block {
    /// Creates a block with a fresh id.
    pub fn new(kind: impl Into<String>, data: BlockData) -> Self {
        Self {
            id: BlockId::new(),
            kind: kind.into(),
            data,
        }
    }
}
