use crate::editing::{Block, BlockData};

/// A partial block update for the mutation gateway's merge path.
///
/// Fields left unset are untouched. `data` keys are merged into the existing
/// payload one level deep, so a caller can send `{ data: { items } }` without
/// clobbering sibling fields it didn't mention.
#[derive(Debug, Clone, Default)]
pub struct BlockPatch {
    pub kind: Option<String>,
    pub data: BlockData,
}

impl BlockPatch {
    /// A patch that only touches payload fields.
    pub fn data(data: BlockData) -> Self {
        Self {
            kind: None,
            data,
        }
    }

    /// Convenience for single-field payload patches.
    pub fn data_field(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut data = BlockData::new();
        data.insert(key.into(), value);
        Self::data(data)
    }
}

/// One per-block write accepted by the mutation gateway.
#[derive(Debug, Clone)]
pub enum BlockUpdate {
    /// Replace the whole record.
    Replace(Block),
    /// Two-level merge of a partial update (see [`merge_block`]).
    Merge(BlockPatch),
}

/// Merges a partial update into an existing block record.
///
/// Top-level fields are shallow-merged, and `data` is additionally
/// shallow-merged key by key. This is the load-bearing rule that lets a block
/// renderer update a single payload field without re-sending the whole block.
/// The merge is shallow at the top level of `data` only: a mentioned key
/// replaces the old value outright, nested objects are not merged further.
pub fn merge_block(current: &Block, patch: &BlockPatch) -> Block {
    let mut merged = current.clone();
    if let Some(kind) = &patch.kind {
        merged.kind = kind.clone();
    }
    for (key, value) in &patch.data {
        merged.data.insert(key.clone(), value.clone());
    }
    merged
}
