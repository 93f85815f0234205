/*!
 * # Document-State Core
 *
 * The editing system keeps one document in two parallel representations —
 * an ordered sequence of block ids and an id→record map — and guarantees
 * they stay consistent while supporting arbitrary per-block data shapes.
 *
 * ## Architecture
 *
 * - **[`Document`]**: the two stores plus a version counter. Raw setters
 *   replace one store wholesale and are reserved for the commit path and
 *   history replay.
 * - **[`Editor`]**: the single mutation gateway. Every read or write of
 *   block data or ordering goes through it; partial updates are merged
 *   two levels deep (record fields, then `data` keys) so callers can
 *   update one field without re-sending the whole payload.
 * - **[`History`]**: observes every committed mutation and records an
 *   inverse as full before/after snapshots. Ordering and structural
 *   changes record immediately; data-write bursts coalesce through a
 *   quiet-period state machine into single undo steps.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockdoc_engine::blocks::BlockRegistry;
 * use blockdoc_engine::editing::{BlockPatch, BlockUpdate, Document, Editor};
 *
 * let mut editor = Editor::new(BlockRegistry::with_defaults());
 * editor.load(Document::new());
 *
 * let id = editor.insert_block(0, "paragraph").unwrap();
 * editor.update_block(
 *     id,
 *     BlockUpdate::Merge(BlockPatch::data_field("text", "hello".into())),
 * );
 *
 * assert!(editor.undo()); // reverts the text edit
 * assert!(editor.undo()); // reverts the insert
 * assert!(editor.document().is_empty());
 * ```
 */

pub mod block;
pub mod document;
pub mod editor;
pub mod history;
pub mod update;

pub use block::{Block, BlockData, BlockId, BlockMap};
pub use document::{Document, DocumentError};
pub use editor::{Editor, EditorError, EditorOptions};
pub use history::{DocState, History, HistoryEntry, Transition};
pub use update::{BlockPatch, BlockUpdate, merge_block};
