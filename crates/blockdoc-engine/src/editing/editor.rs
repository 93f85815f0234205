use std::time::{Duration, Instant};

use crate::blocks::BlockRegistry;
use crate::editing::history::{DEFAULT_HISTORY_CAP, DEFAULT_QUIET_PERIOD};
use crate::editing::{
    Block, BlockData, BlockId, BlockMap, BlockPatch, BlockUpdate, DocState, Document, History,
    merge_block,
};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("No block kind registered for {0:?}")]
    UnknownBlockKind(String),
    #[error("No document loaded")]
    NotLoaded,
}

/// Construction-time knobs for an [`Editor`].
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Maximum retained undo entries (FIFO eviction beyond this).
    pub history_cap: usize,
    /// Quiet period before a burst of data writes flushes to one undo step.
    pub quiet_period: Duration,
    /// Block kind inserted when no kind is specified.
    pub default_kind: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            quiet_period: DEFAULT_QUIET_PERIOD,
            default_kind: "paragraph".to_string(),
        }
    }
}

/// One editor instance: the document stores, the block-kind registry, and the
/// undo history, behind a single mutation gateway.
///
/// All reads and writes of block data or ordering go through this type. Each
/// committed write is recorded with an urgency matching its class:
///
/// - ordering replacement ([`set_order`](Self::set_order)): one immediate
///   entry — reorders are discrete, low-frequency events where coalescing
///   would be wrong;
/// - per-block data writes ([`update_block`](Self::update_block),
///   [`update_blocks_with`](Self::update_blocks_with)): debounced, so a burst
///   of keystrokes coalesces into one undo step;
/// - structural insert/remove: one immediate entry capturing both stores, so
///   the order/map invariant holds at every history boundary.
///
/// Writes before a document has been loaded are silently ignored, tolerating
/// render-order races during mount. Updates targeting an unknown id are a
/// caller bug and are skipped rather than surfaced.
pub struct Editor {
    doc: Document,
    registry: BlockRegistry,
    history: History,
    options: EditorOptions,
    loaded: bool,
}

impl Editor {
    /// An editor with no document loaded yet. Reads see an empty document;
    /// writes are no-ops until [`load`](Self::load).
    pub fn new(registry: BlockRegistry) -> Self {
        Self::with_options(registry, EditorOptions::default())
    }

    pub fn with_options(registry: BlockRegistry, options: EditorOptions) -> Self {
        Self {
            doc: Document::new(),
            registry,
            history: History::new(options.history_cap, options.quiet_period),
            options,
            loaded: false,
        }
    }

    /// Loads a document, resetting history.
    pub fn load(&mut self, doc: Document) {
        self.doc = doc;
        self.history = History::new(self.options.history_cap, self.options.quiet_period);
        self.loaded = true;
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn order(&self) -> &[BlockId] {
        self.doc.order()
    }

    pub fn blocks(&self) -> &BlockMap {
        self.doc.blocks()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.doc.get(id)
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn default_kind(&self) -> &str {
        &self.options.default_kind
    }

    /// Replaces the full ordering sequence. Callers compute the complete new
    /// sequence; no partial insert/remove primitive exists at this layer and
    /// no validation is performed here — the structural helpers are the path
    /// that maintains the order/map invariant.
    pub fn set_order(&mut self, new_order: Vec<BlockId>) {
        if !self.loaded {
            return;
        }
        let before = self.doc.order().to_vec();
        if before == new_order {
            return;
        }
        self.doc.set_order_raw(new_order.clone());
        self.history.record_order("reorder blocks", before, new_order);
    }

    /// Writes one block through the gateway. See [`BlockUpdate`] for the
    /// replace/merge cases; commits are debounced into coalesced history.
    pub fn update_block(&mut self, id: BlockId, update: BlockUpdate) {
        self.update_block_at(id, update, Instant::now());
    }

    /// [`update_block`](Self::update_block) with an injected clock, for hosts
    /// that drive time themselves (and for tests).
    pub fn update_block_at(&mut self, id: BlockId, update: BlockUpdate, now: Instant) {
        if !self.loaded || !self.doc.blocks().contains_key(&id) {
            return;
        }
        let before = self.doc.blocks().clone();
        let mut blocks = before.clone();
        match update {
            BlockUpdate::Replace(mut block) => {
                // The record lives under the gateway's id regardless of what
                // the caller put in the replacement value.
                block.id = id;
                blocks.insert(id, block);
            }
            BlockUpdate::Merge(patch) => {
                let merged = merge_block(&blocks[&id], &patch);
                blocks.insert(id, merged);
            }
        }
        self.doc.set_blocks_raw(blocks);
        self.commit_blocks(format!("update block {id}"), before, now);
    }

    /// Functional whole-map update: the closure sees the current map and
    /// returns the next one. This is the stale-read-safe path when several
    /// updates are queued in the same tick. The closure is responsible for
    /// keeping the key set aligned with the ordering sequence.
    pub fn update_blocks_with<F>(&mut self, f: F)
    where
        F: FnOnce(&BlockMap) -> BlockMap,
    {
        self.update_blocks_with_at(f, Instant::now());
    }

    pub fn update_blocks_with_at<F>(&mut self, f: F, now: Instant)
    where
        F: FnOnce(&BlockMap) -> BlockMap,
    {
        if !self.loaded {
            return;
        }
        let before = self.doc.blocks().clone();
        let after = f(&before);
        self.doc.set_blocks_raw(after);
        self.commit_blocks("update blocks".to_string(), before, now);
    }

    /// Inserts a new block of the given kind at `index` (clamped), using the
    /// kind's registered default payload. Both stores are updated atomically
    /// under one immediate history entry.
    pub fn insert_block(&mut self, index: usize, kind: &str) -> Result<BlockId, EditorError> {
        let data = self
            .registry
            .get(kind)
            .ok_or_else(|| EditorError::UnknownBlockKind(kind.to_string()))?
            .default_value();
        self.insert_block_with(index, kind, data)
    }

    /// Inserts a new block with an explicit payload.
    pub fn insert_block_with(
        &mut self,
        index: usize,
        kind: &str,
        data: BlockData,
    ) -> Result<BlockId, EditorError> {
        if !self.loaded {
            return Err(EditorError::NotLoaded);
        }
        if !self.registry.contains(kind) {
            return Err(EditorError::UnknownBlockKind(kind.to_string()));
        }
        let before = DocState::capture(&self.doc);

        let block = Block::new(kind, data);
        let id = block.id;
        let mut order = self.doc.order().to_vec();
        let index = index.min(order.len());
        order.insert(index, id);
        let mut blocks = self.doc.blocks().clone();
        blocks.insert(id, block);

        self.doc.set_order_raw(order);
        self.doc.set_blocks_raw(blocks);
        self.history.record_structure(
            format!("insert {kind} block"),
            before,
            DocState::capture(&self.doc),
        );
        Ok(id)
    }

    /// Inserts a block of the configured default kind.
    pub fn insert_default_block(&mut self, index: usize) -> Result<BlockId, EditorError> {
        let kind = self.options.default_kind.clone();
        self.insert_block(index, &kind)
    }

    /// Removes a block from both stores atomically under one immediate
    /// history entry. Returns false (no-op) when the id is absent.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        if !self.loaded || !self.doc.blocks().contains_key(&id) {
            return false;
        }
        let before = DocState::capture(&self.doc);

        let order = self
            .doc
            .order()
            .iter()
            .copied()
            .filter(|other| *other != id)
            .collect();
        let mut blocks = self.doc.blocks().clone();
        blocks.remove(&id);

        self.doc.set_order_raw(order);
        self.doc.set_blocks_raw(blocks);
        self.history
            .record_structure(format!("remove block {id}"), before, DocState::capture(&self.doc));
        true
    }

    /// Consults the block kind's registered `is_empty` predicate. `None` when
    /// the id or its kind is unknown.
    pub fn is_empty_block(&self, id: BlockId) -> Option<bool> {
        let block = self.doc.get(id)?;
        let def = self.registry.get(&block.kind)?;
        Some(def.is_empty(&block.data))
    }

    /// Applies a registered tune action (by name) to the block's payload.
    /// Returns false when the block, its kind, or the tune is unknown.
    pub fn apply_tune(&mut self, id: BlockId, tune_name: &str) -> bool {
        let Some(block) = self.doc.get(id) else {
            return false;
        };
        let Some(def) = self.registry.get(&block.kind) else {
            return false;
        };
        let Some(tune) = def.tunes().into_iter().find(|t| t.name == tune_name) else {
            return false;
        };
        let data = (tune.apply)(&block.data);
        self.update_block(id, BlockUpdate::Merge(BlockPatch::data(data)));
        true
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.doc)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.doc)
    }

    /// Flushes a due coalesced history entry. Hosts call this from their
    /// event/frame loop.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    /// Forces out any accumulating history entry (e.g. on blur or unmount).
    pub fn flush_history(&mut self) {
        self.history.flush();
    }

    fn commit_blocks(&mut self, label: String, before: BlockMap, now: Instant) {
        let after = self.doc.blocks().clone();
        if before == after {
            return;
        }
        self.history.record_blocks(label, &before, &after, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editor_with_doc(blocks: Vec<Block>) -> Editor {
        let mut editor = Editor::new(BlockRegistry::with_defaults());
        editor.load(Document::from_blocks(blocks).unwrap());
        editor
    }

    fn paragraph(text: &str) -> Block {
        let mut data = BlockData::new();
        data.insert("text".to_string(), json!(text));
        Block::new("paragraph", data)
    }

    #[test]
    fn writes_before_load_are_ignored() {
        let mut editor = Editor::new(BlockRegistry::with_defaults());
        let id = BlockId::new();

        editor.set_order(vec![id]);
        editor.update_block(id, BlockUpdate::Merge(BlockPatch::default()));
        editor.update_blocks_with(|map| map.clone());
        assert!(editor.order().is_empty());
        assert!(!editor.remove_block(id));
        assert!(matches!(
            editor.insert_block(0, "paragraph"),
            Err(EditorError::NotLoaded)
        ));
        assert_eq!(editor.history().undo_depth(), 0);
    }

    #[test]
    fn insert_and_remove_keep_stores_consistent() {
        let mut editor = editor_with_doc(vec![paragraph("a"), paragraph("b")]);

        let id = editor.insert_block(1, "list").unwrap();
        assert_eq!(editor.order()[1], id);
        assert_eq!(editor.order().len(), 3);
        assert!(editor.document().is_consistent());

        assert!(editor.remove_block(id));
        assert_eq!(editor.order().len(), 2);
        assert!(editor.document().is_consistent());

        // Structural undo restores both stores in one step.
        assert!(editor.undo());
        assert_eq!(editor.order().len(), 3);
        assert!(editor.document().is_consistent());
    }

    #[test]
    fn insert_of_unknown_kind_is_an_error() {
        let mut editor = editor_with_doc(vec![]);
        assert!(matches!(
            editor.insert_block(0, "table"),
            Err(EditorError::UnknownBlockKind(_))
        ));
    }

    #[test]
    fn insert_index_is_clamped() {
        let mut editor = editor_with_doc(vec![paragraph("a")]);
        let id = editor.insert_block(99, "paragraph").unwrap();
        assert_eq!(*editor.order().last().unwrap(), id);
    }

    #[test]
    fn update_of_unknown_id_is_skipped() {
        let mut editor = editor_with_doc(vec![paragraph("a")]);
        let v = editor.document().version();
        editor.update_block(
            BlockId::new(),
            BlockUpdate::Merge(BlockPatch::data_field("text", json!("x"))),
        );
        assert_eq!(editor.document().version(), v);
        assert_eq!(editor.history().undo_depth(), 0);
        assert!(!editor.history().is_accumulating());
    }

    #[test]
    fn replace_keeps_the_gateway_id() {
        let block = paragraph("a");
        let id = block.id;
        let mut editor = editor_with_doc(vec![block]);

        editor.update_block(id, BlockUpdate::Replace(paragraph("b")));
        let replaced = editor.block(id).unwrap();
        assert_eq!(replaced.id, id);
        assert_eq!(replaced.data["text"], json!("b"));
        assert!(editor.document().is_consistent());
    }

    #[test]
    fn functional_update_sees_latest_state() {
        let block = paragraph("a");
        let id = block.id;
        let mut editor = editor_with_doc(vec![block]);

        editor.update_block(id, BlockUpdate::Merge(BlockPatch::data_field("text", json!("b"))));
        editor.update_blocks_with(|map| {
            let mut next = map.clone();
            let text = next[&id].data["text"].as_str().unwrap().to_string();
            next.get_mut(&id).unwrap().data["text"] = json!(format!("{text}c"));
            next
        });
        assert_eq!(editor.block(id).unwrap().data["text"], json!("bc"));
    }

    #[test]
    fn set_order_records_immediately() {
        let a = paragraph("a");
        let b = paragraph("b");
        let (id_a, id_b) = (a.id, b.id);
        let mut editor = editor_with_doc(vec![a, b]);

        editor.set_order(vec![id_b, id_a]);
        assert_eq!(editor.history().undo_depth(), 1);

        assert!(editor.undo());
        assert_eq!(editor.order(), &[id_a, id_b]);
    }

    #[test]
    fn tune_toggles_list_style() {
        let mut editor = editor_with_doc(vec![]);
        let id = editor.insert_block(0, "list").unwrap();
        assert_eq!(editor.block(id).unwrap().data["style"], json!("unordered"));

        assert!(editor.apply_tune(id, "Number"));
        assert_eq!(editor.block(id).unwrap().data["style"], json!("ordered"));
        // Sibling field untouched by the tune's merge.
        assert_eq!(editor.block(id).unwrap().data["items"], json!([""]));

        assert!(!editor.apply_tune(id, "Checklist"));
    }
}
