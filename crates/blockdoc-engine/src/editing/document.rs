use std::collections::HashMap;

use crate::editing::{Block, BlockId, BlockMap};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),
}

/// The document: an ordered sequence of block ids plus the id-indexed block
/// records.
///
/// The two representations are kept in lockstep by the [`crate::Editor`]'s
/// structural operations: every id in `order` has exactly one entry in
/// `blocks` and vice versa. Reordering is an O(1)-per-id swap of the sequence
/// without touching block bodies; lookup by id stays O(1).
///
/// The raw setters replace one store wholesale and bypass history recording.
/// They exist for history replay and for the editor's commit path; they
/// perform no validation, so anything that computes a new sequence or map is
/// responsible for keeping the two stores consistent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    order: Vec<BlockId>,
    blocks: BlockMap,
    /// Incremented on every write (including replay), for change detection.
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from blocks in order, rejecting duplicate ids.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, DocumentError> {
        let mut order = Vec::with_capacity(blocks.len());
        let mut map = HashMap::with_capacity(blocks.len());
        for block in blocks {
            if map.contains_key(&block.id) {
                return Err(DocumentError::DuplicateId(block.id));
            }
            order.push(block.id);
            map.insert(block.id, block);
        }
        Ok(Self {
            order,
            blocks: map,
            version: 0,
        })
    }

    /// The ordered id sequence.
    pub fn order(&self) -> &[BlockId] {
        &self.order
    }

    /// The id-indexed block records.
    pub fn blocks(&self) -> &BlockMap {
        &self.blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Blocks in document order, the natural export shape.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the id set of the ordering sequence equals exactly the key
    /// set of the block map, with no duplicates in the sequence.
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.blocks.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::with_capacity(self.order.len());
        self.order
            .iter()
            .all(|id| seen.insert(*id) && self.blocks.contains_key(id))
    }

    pub(crate) fn set_order_raw(&mut self, order: Vec<BlockId>) {
        self.order = order;
        self.version += 1;
    }

    pub(crate) fn set_blocks_raw(&mut self, blocks: BlockMap) {
        self.blocks = blocks;
        self.version += 1;
    }
}
