use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::editing::{BlockId, BlockMap, Document};

/// Maximum retained undo entries before the oldest are evicted.
pub const DEFAULT_HISTORY_CAP: usize = 100;

/// Quiet period after which a burst of data-store writes is flushed into a
/// single coalesced history entry.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Full-value capture of both stores, used by structural transitions so one
/// undo step restores the ordering sequence and the block map together.
#[derive(Debug, Clone, PartialEq)]
pub struct DocState {
    pub order: Vec<BlockId>,
    pub blocks: BlockMap,
}

impl DocState {
    pub fn capture(doc: &Document) -> Self {
        Self {
            order: doc.order().to_vec(),
            blocks: doc.blocks().clone(),
        }
    }
}

/// One committed state transition, captured as full before/after snapshots.
///
/// Snapshots rather than diffs keep replay independent of any later
/// mutations: applying `before` (undo) then `after` (redo) restores
/// bit-identical state regardless of what happened in between, trading memory
/// for correctness under the retention cap.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Ordering-sequence replacement (reorder only; block bodies untouched).
    Order {
        before: Vec<BlockId>,
        after: Vec<BlockId>,
    },
    /// Block-map replacement (data edits; ordering untouched).
    Blocks { before: BlockMap, after: BlockMap },
    /// Atomic insert/remove touching both stores.
    Structure { before: DocState, after: DocState },
}

impl Transition {
    fn apply_before(&self, doc: &mut Document) {
        match self {
            Transition::Order { before, .. } => doc.set_order_raw(before.clone()),
            Transition::Blocks { before, .. } => doc.set_blocks_raw(before.clone()),
            Transition::Structure { before, .. } => {
                doc.set_order_raw(before.order.clone());
                doc.set_blocks_raw(before.blocks.clone());
            }
        }
    }

    fn apply_after(&self, doc: &mut Document) {
        match self {
            Transition::Order { after, .. } => doc.set_order_raw(after.clone()),
            Transition::Blocks { after, .. } => doc.set_blocks_raw(after.clone()),
            Transition::Structure { after, .. } => {
                doc.set_order_raw(after.order.clone());
                doc.set_blocks_raw(after.blocks.clone());
            }
        }
    }
}

/// A reversible record of one committed transition.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: String,
    pub transition: Transition,
}

/// The coalescing accumulator for data-store write bursts.
///
/// `before` is the first pre-mutation snapshot seen since the last flush and
/// is never replaced while accumulating; `after` and the deadline move with
/// every further write. Flushing pushes one entry spanning the whole burst.
#[derive(Debug)]
struct Accumulating {
    label: String,
    before: BlockMap,
    after: BlockMap,
    deadline: Instant,
}

/// Undo/redo engine for one editor instance.
///
/// Owned by the [`crate::Editor`] and torn down with it; nothing here is
/// process-global. Replay goes through the document's raw setters, bypassing
/// commit recording, so undoing never records a fresh entry.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    cap: usize,
    quiet_period: Duration,
    pending: Option<Accumulating>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP, DEFAULT_QUIET_PERIOD)
    }
}

impl History {
    pub fn new(cap: usize, quiet_period: Duration) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            cap,
            quiet_period,
            pending: None,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// True while a write burst is accumulating towards a flush.
    pub fn is_accumulating(&self) -> bool {
        self.pending.is_some()
    }

    /// Labels of undoable entries, oldest first. For UI display.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().map(|e| e.label.as_str())
    }

    /// Records an immediate (non-coalesced) ordering replacement.
    pub fn record_order(
        &mut self,
        label: impl Into<String>,
        before: Vec<BlockId>,
        after: Vec<BlockId>,
    ) {
        self.flush();
        self.push(HistoryEntry {
            label: label.into(),
            transition: Transition::Order { before, after },
        });
    }

    /// Records an immediate structural change spanning both stores.
    pub fn record_structure(&mut self, label: impl Into<String>, before: DocState, after: DocState) {
        self.flush();
        self.push(HistoryEntry {
            label: label.into(),
            transition: Transition::Structure { before, after },
        });
    }

    /// Records a data-store write into the coalescing accumulator.
    ///
    /// The first write of a burst captures `before`; subsequent writes only
    /// advance `after` and restart the quiet-period deadline, so the flushed
    /// entry's undo restores the state as of before the whole burst.
    pub fn record_blocks(
        &mut self,
        label: impl Into<String>,
        before: &BlockMap,
        after: &BlockMap,
        now: Instant,
    ) {
        let deadline = now + self.quiet_period;
        match &mut self.pending {
            Some(pending) => {
                pending.label = label.into();
                pending.after = after.clone();
                pending.deadline = deadline;
            }
            None => {
                self.pending = Some(Accumulating {
                    label: label.into(),
                    before: before.clone(),
                    after: after.clone(),
                    deadline,
                });
            }
        }
    }

    /// Flushes the accumulating entry if its quiet period has elapsed.
    /// Returns true when an entry was pushed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Forces the accumulating entry out, regardless of the deadline.
    pub fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.push(HistoryEntry {
                label: pending.label,
                transition: Transition::Blocks {
                    before: pending.before,
                    after: pending.after,
                },
            });
        }
    }

    /// Reverts the most recent committed transition. No-op on an empty stack.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        // A burst still accumulating is the most recent edit; flush it so the
        // undo covers it rather than an older entry.
        self.flush();
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        entry.transition.apply_before(doc);
        self.redo_stack.push(entry);
        true
    }

    /// Replays the most recently undone transition. No-op on an empty stack.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        entry.transition.apply_after(doc);
        self.undo_stack.push_back(entry);
        true
    }

    fn push(&mut self, entry: HistoryEntry) {
        // A fresh commit makes previously undone entries stale; replaying
        // them against the diverged state would corrupt the document.
        self.redo_stack.clear();
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.cap {
            self.undo_stack.pop_front();
        }
    }
}
