pub mod blocks;
pub mod editing;
pub mod io;
pub mod selection;

// Re-export key types for easier usage
pub use blocks::{BlockDefinition, BlockRegistry, Tune};
pub use editing::{
    Block, BlockData, BlockId, BlockPatch, BlockUpdate, Document, DocumentError, Editor,
    EditorError, EditorOptions, History, HistoryEntry, Transition,
};
pub use selection::{SelectionState, SplitFragments, extract_fragments};
