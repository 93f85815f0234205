//! Block-kind registration: the capability tables the core consumes without
//! ever special-casing a concrete kind.

pub mod items;
pub mod list;
pub mod paragraph;

use std::collections::HashMap;

use crate::editing::BlockData;

pub use list::{FocusRequest, ListController, ListKey};

/// A tune: a named action in a block's tune menu that transforms its payload
/// (e.g. switching a list between bullet and numbered style).
pub struct Tune {
    pub name: &'static str,
    /// Whether the tune's menu entry renders as active for this payload.
    pub is_active: fn(&BlockData) -> bool,
    /// Returns the transformed payload; committed through the gateway merge.
    pub apply: fn(&BlockData) -> BlockData,
}

/// The registration contract for one block kind.
///
/// The core treats implementations as opaque capability tables keyed by the
/// kind string: it calls `default_value` when inserting, `is_empty` when
/// upstream logic asks whether a block can be dropped, and `tunes` for the
/// tune menu. The payload schema belongs entirely to the definition.
pub trait BlockDefinition {
    fn kind(&self) -> &'static str;
    fn default_value(&self) -> BlockData;
    fn is_empty(&self, data: &BlockData) -> bool;
    fn tunes(&self) -> Vec<Tune> {
        Vec::new()
    }
}

/// Block definitions keyed by kind string.
#[derive(Default)]
pub struct BlockRegistry {
    definitions: HashMap<&'static str, Box<dyn BlockDefinition>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in paragraph and list kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(paragraph::ParagraphDefinition));
        registry.register(Box::new(list::ListDefinition));
        registry
    }

    /// Registers a definition, replacing any previous one for the same kind.
    pub fn register(&mut self, definition: Box<dyn BlockDefinition>) {
        self.definitions.insert(definition.kind(), definition);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn BlockDefinition> {
        self.definitions.get(kind).map(|b| b.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.definitions.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.keys().copied()
    }
}
