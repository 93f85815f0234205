use serde_json::json;

use crate::blocks::items::{insert_at, remove_at, replace_at};
use crate::blocks::{BlockDefinition, Tune};
use crate::editing::{BlockData, BlockId, BlockPatch, BlockUpdate, Editor};
use crate::selection::extract_fragments;

pub const KIND: &str = "list";

pub const STYLE_ORDERED: &str = "ordered";
pub const STYLE_UNORDERED: &str = "unordered";

/// A list block: `{ items: [markup strings], style: "ordered"|"unordered" }`.
pub struct ListDefinition;

impl BlockDefinition for ListDefinition {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn default_value(&self) -> BlockData {
        let mut data = BlockData::new();
        data.insert("items".to_string(), json!([""]));
        data.insert("style".to_string(), json!(STYLE_UNORDERED));
        data
    }

    fn is_empty(&self, data: &BlockData) -> bool {
        items(data).is_empty()
    }

    fn tunes(&self) -> Vec<Tune> {
        vec![
            Tune {
                name: "Bullet",
                is_active: |data| style(data) == STYLE_UNORDERED,
                apply: |data| {
                    let mut next = data.clone();
                    next.insert("style".to_string(), json!(STYLE_UNORDERED));
                    next
                },
            },
            Tune {
                name: "Number",
                is_active: |data| style(data) == STYLE_ORDERED,
                apply: |data| {
                    let mut next = data.clone();
                    next.insert("style".to_string(), json!(STYLE_ORDERED));
                    next
                },
            },
        ]
    }
}

/// The list payload's items, as owned strings.
pub fn items(data: &BlockData) -> Vec<String> {
    data.get("items")
        .and_then(|v| v.as_array())
        .map(|array| {
            array
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn style(data: &BlockData) -> &str {
    data.get("style")
        .and_then(|v| v.as_str())
        .unwrap_or(STYLE_UNORDERED)
}

/// Keyboard input the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Enter { shift: bool },
    Backspace,
}

/// A request to move focus into an item's editable region.
///
/// Emitted after any item-count change. The DOM/widget node for a newly
/// inserted item does not exist until the commit is reflected in the render
/// tree, so hosts honor this on the next frame, placing the caret at the end
/// of the item's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub block: BlockId,
    pub item: usize,
}

/// Key-handling state machine for one focused list block.
///
/// The reference consumer of the mutation gateway: every edit it makes goes
/// through a single `{ data: { items } }` merge, leaving sibling payload
/// fields (like `style`) untouched.
#[derive(Debug)]
pub struct ListController {
    block: BlockId,
    active_item: usize,
}

impl ListController {
    pub fn new(block: BlockId) -> Self {
        Self {
            block,
            active_item: 0,
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn active_item(&self) -> usize {
        self.active_item
    }

    /// Called when an item's editable region gains focus.
    pub fn focus_item(&mut self, index: usize) {
        self.active_item = index;
    }

    /// Replaces one item's content (the editable's change handler).
    pub fn change_item(&self, editor: &mut Editor, index: usize, value: &str) {
        let Some(block) = editor.block(self.block) else {
            return;
        };
        let next = replace_at(&items(&block.data), index, value.to_string());
        self.commit_items(editor, next);
    }

    /// Handles a key event on the active item. `caret` is the caret's
    /// visible-character offset within the item, if a selection exists.
    ///
    /// Returns a [`FocusRequest`] whenever the item count changed.
    pub fn handle_key(
        &mut self,
        editor: &mut Editor,
        key: ListKey,
        caret: Option<usize>,
    ) -> Option<FocusRequest> {
        match key {
            ListKey::Enter { shift: false } => self.split_active_item(editor, caret),
            ListKey::Enter { shift: true } => None,
            ListKey::Backspace => self.remove_active_if_empty(editor),
        }
    }

    /// Enter on a non-empty item: split its content at the caret, keep the
    /// "before" half in place and insert the "after" half as a new item.
    fn split_active_item(
        &mut self,
        editor: &mut Editor,
        caret: Option<usize>,
    ) -> Option<FocusRequest> {
        let block = editor.block(self.block)?;
        let current_items = items(&block.data);
        let item = current_items.get(self.active_item)?;
        if item.is_empty() {
            return None;
        }

        // No active range, or the caret is outside the item: do not split.
        let fragments = extract_fragments(item, caret?)?;

        let next = replace_at(&current_items, self.active_item, fragments.current);
        let next = insert_at(&next, self.active_item + 1, fragments.next);
        self.commit_items(editor, next);

        self.active_item += 1;
        Some(FocusRequest {
            block: self.block,
            item: self.active_item,
        })
    }

    /// Backspace on an empty item removes it. Once the last item is gone the
    /// block-level `is_empty` predicate turns true, which lets upstream
    /// logic delete the whole block.
    fn remove_active_if_empty(&mut self, editor: &mut Editor) -> Option<FocusRequest> {
        let block = editor.block(self.block)?;
        let current_items = items(&block.data);
        let item = current_items.get(self.active_item)?;
        if !item.is_empty() {
            return None;
        }

        let next = remove_at(&current_items, self.active_item);
        let remaining = next.len();
        self.commit_items(editor, next);

        if remaining == 0 {
            return None;
        }
        self.active_item = self.active_item.min(remaining - 1);
        Some(FocusRequest {
            block: self.block,
            item: self.active_item,
        })
    }

    fn commit_items(&self, editor: &mut Editor, next: Vec<String>) {
        editor.update_block(
            self.block,
            BlockUpdate::Merge(BlockPatch::data_field("items", json!(next))),
        );
    }
}
