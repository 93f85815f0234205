//! End-to-end tests of the editor's commit/undo pipeline: the round-trip
//! law, store consistency across arbitrary operation sequences, and the
//! interaction of coalesced and immediate history entries.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;

use blockdoc_engine::blocks::BlockRegistry;
use blockdoc_engine::editing::{
    BlockData, BlockPatch, BlockUpdate, Document, Editor, EditorOptions,
};

fn editor() -> Editor {
    let mut editor = Editor::new(BlockRegistry::with_defaults());
    editor.load(Document::new());
    editor
}

#[test]
fn undo_n_then_redo_n_restores_every_state() {
    let mut editor = editor();

    // A mixed sequence of committed mutations, flushed so each is distinct.
    let a = editor.insert_block(0, "paragraph").unwrap();
    let b = editor.insert_block(1, "list").unwrap();
    editor.update_block(a, BlockUpdate::Merge(BlockPatch::data_field("text", json!("one"))));
    editor.flush_history();
    editor.set_order(vec![b, a]);
    editor.update_block(a, BlockUpdate::Merge(BlockPatch::data_field("text", json!("two"))));
    editor.flush_history();
    assert!(editor.remove_block(b));

    let n = editor.history().undo_depth();
    assert_eq!(n, 6);
    let final_state = editor.document().clone();

    let mut undone = 0;
    while editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, n);
    assert!(editor.document().is_empty());

    let mut redone = 0;
    while editor.redo() {
        redone += 1;
    }
    assert_eq!(redone, n);

    // Bit-identical apart from the version counter's replay increments.
    assert_eq!(editor.order(), final_state.order());
    assert_eq!(editor.blocks(), final_state.blocks());
}

#[test]
fn stores_stay_consistent_across_operation_sequences() {
    let mut editor = editor();

    let a = editor.insert_block(0, "paragraph").unwrap();
    let b = editor.insert_block(0, "list").unwrap();
    let c = editor.insert_block(1, "paragraph").unwrap();
    editor.set_order(vec![c, a, b]);
    editor.update_block(c, BlockUpdate::Merge(BlockPatch::data_field("text", json!("x"))));
    editor.remove_block(a);
    assert!(editor.document().is_consistent());

    let order_ids: Vec<_> = editor.order().to_vec();
    let mut map_ids: Vec<_> = editor.blocks().keys().copied().collect();
    let mut sorted_order = order_ids.clone();
    sorted_order.sort_by_key(|id| id.to_string());
    map_ids.sort_by_key(|id| id.to_string());
    assert_eq!(sorted_order, map_ids);

    editor.undo();
    editor.undo();
    assert!(editor.document().is_consistent());
}

#[test]
fn partial_merge_keeps_sibling_fields() {
    let mut editor = editor();
    let mut data = BlockData::new();
    data.insert("items".to_string(), json!(["a", "b"]));
    data.insert("style".to_string(), json!("unordered"));
    let id = editor.insert_block_with(0, "list", data).unwrap();

    editor.update_block(id, BlockUpdate::Merge(BlockPatch::data_field("items", json!(["a", "x"]))));

    let block = editor.block(id).unwrap();
    assert_eq!(block.data["items"], json!(["a", "x"]));
    assert_eq!(block.data["style"], json!("unordered"));
}

#[test]
fn history_cap_retains_the_most_recent_hundred() {
    let mut editor = editor();
    let a = editor.insert_block(0, "paragraph").unwrap();
    let b = editor.insert_block(1, "paragraph").unwrap();

    // 150 distinct, non-coalesced commits on top of the two inserts.
    for i in 0..150 {
        let order = if i % 2 == 0 { vec![b, a] } else { vec![a, b] };
        editor.set_order(order);
    }

    assert_eq!(editor.history().undo_depth(), 100);

    let mut undone = 0;
    while editor.undo() {
        undone += 1;
    }
    assert_eq!(undone, 100);
    // Entry 49's after-state survives: the two inserts were evicted, so undo
    // bottoms out at the oldest retained snapshot rather than the empty doc.
    assert_eq!(editor.order(), [a, b]);
}

#[test]
fn rapid_updates_coalesce_into_one_undo_step() {
    let mut editor = editor();
    let id = editor.insert_block(0, "paragraph").unwrap();
    let depth_after_insert = editor.history().undo_depth();

    let t0 = Instant::now();
    for (i, text) in ["h", "he", "hel", "hell", "hello"].iter().enumerate() {
        editor.update_block_at(
            id,
            BlockUpdate::Merge(BlockPatch::data_field("text", json!(text))),
            t0 + Duration::from_millis(10 * i as u64),
        );
    }
    assert_eq!(editor.history().undo_depth(), depth_after_insert);

    assert!(editor.tick(t0 + Duration::from_millis(300)));
    assert_eq!(editor.history().undo_depth(), depth_after_insert + 1);

    // One undo restores the pre-burst value.
    assert!(editor.undo());
    assert_eq!(editor.block(id).unwrap().data["text"], json!(""));
}

#[test]
fn redo_is_invalidated_by_a_fresh_commit() {
    let mut editor = editor();
    let a = editor.insert_block(0, "paragraph").unwrap();

    editor.undo();
    assert!(editor.block(a).is_none());
    assert_eq!(editor.history().redo_depth(), 1);

    // A fresh commit after the undo makes the redoable insert stale.
    let b = editor.insert_block(0, "list").unwrap();
    assert_eq!(editor.history().redo_depth(), 0);
    assert!(!editor.redo());
    assert_eq!(editor.order(), [b]);
}

#[test]
fn custom_options_apply_to_history() {
    let mut editor = Editor::with_options(
        BlockRegistry::with_defaults(),
        EditorOptions {
            history_cap: 2,
            quiet_period: Duration::from_millis(50),
            default_kind: "list".to_string(),
        },
    );
    editor.load(Document::new());

    let id = editor.insert_default_block(0).unwrap();
    assert_eq!(editor.block(id).unwrap().kind, "list");

    for i in 0..5 {
        editor.set_order(if i % 2 == 0 { vec![] } else { vec![id] });
    }
    assert_eq!(editor.history().undo_depth(), 2);
}
