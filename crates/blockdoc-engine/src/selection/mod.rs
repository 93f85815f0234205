//! Caret-position content splitting and transient selection state.
//!
//! Blocks keep their editable content as inline-markup strings; splitting a
//! block on Enter needs the "before caret" and "after caret" halves of that
//! markup with formatting boundaries intact. The tokenizer and splitter here
//! do that without a DOM: caret positions are visible-character offsets into
//! the rendered text.

pub mod markup;
pub mod split;
pub mod state;

pub use markup::{is_blank, visible_len};
pub use split::{SplitFragments, extract_fragments};
pub use state::SelectionState;
