use std::collections::HashSet;

use crate::editing::BlockId;

/// Transient per-editor selection state: which block is active, hovered, or
/// part of a multi-select, plus drag/sort UI flags.
///
/// Purely ephemeral — rebuilt from user interaction, never recorded in undo
/// history.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// The block whose editable region currently has focus.
    pub active: Option<BlockId>,
    /// The block under the pointer.
    pub hovered: Option<BlockId>,
    /// Current drop target while dragging.
    pub drop_target: Option<BlockId>,
    /// Multi-selected block ids.
    pub selected: HashSet<BlockId>,
    /// Whole-document select-all flag.
    pub select_all: bool,
    pub dragging: bool,
    pub sorting: bool,
    /// The block being moved while `sorting`.
    pub sorting_item: Option<BlockId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, id: Option<BlockId>) {
        self.active = id;
    }

    pub fn is_active(&self, id: BlockId) -> bool {
        self.active == Some(id)
    }

    pub fn hover(&mut self, id: Option<BlockId>) {
        self.hovered = id;
    }

    pub fn is_hovering(&self, id: BlockId) -> bool {
        self.hovered == Some(id)
    }

    pub fn toggle_selected(&mut self, id: BlockId) {
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.select_all = false;
    }

    /// Drops every reference to a block that no longer exists.
    pub fn forget(&mut self, id: BlockId) {
        if self.active == Some(id) {
            self.active = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.drop_target == Some(id) {
            self.drop_target = None;
        }
        if self.sorting_item == Some(id) {
            self.sorting_item = None;
        }
        self.selected.remove(&id);
    }
}
