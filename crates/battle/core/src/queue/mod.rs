//! Priority-ordered, type-segregated action scheduling.
//!
//! Each combatant owns one [`ActionQueue`]. The queue arbitrates, across all
//! pending intents of all kinds, which single intent is eligible to run this
//! frame. Entries live in one insertion-ordered container per kind; a
//! separate list of [`IndexRecord`]s is the single sort-key source of truth,
//! so a full sort reorders the index list and never the typed storage.

mod intent;

pub use intent::{
    BusterIntent, CardIntent, CleanupMode, DiscardPolicy, ExecutionPhase, Intent, IntentHandler,
    IntentKind, MoveIntent, PeekIntent, PriorityClass, SpecialIntent,
};

use std::collections::BTreeMap;
use std::fmt;

/// Errors surfaced by queue registration and insertion.
///
/// An unregistered-kind `add` is the only recoverable error in this
/// component; every other operation is an invariant-preserving
/// transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("intent kind {0} is already registered")]
    KindAlreadyRegistered(IntentKind),

    #[error("intent kind {0} has no registered handler")]
    KindNotRegistered(IntentKind),
}

/// Sort-key record for one live queue entry, decoupled from its storage slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRecord {
    pub kind: IntentKind,
    /// Priority class the entry was added with.
    pub priority: PriorityClass,
    /// Priority after the filter table remap, refreshed by [`ActionQueue::sort`].
    pub effective_priority: PriorityClass,
    pub discard_policy: DiscardPolicy,
    /// Offset into the kind's typed queue. Corrected in the same operation
    /// that removes any earlier entry of the same kind.
    pub position: usize,
    /// Set once the owning entity has begun executing this entry.
    pub processing: bool,
}

/// Typed storage plus the registered handler for one intent kind.
struct KindSlot {
    entries: Vec<Intent>,
    handler: Box<dyn IntentHandler>,
}

/// Per-entity intent scheduler.
///
/// Lifecycle of an entry: `add` → (head after `sort`) → handler `Reserve` →
/// handler `Process` each frame while head → `pop`, or eviction through the
/// discard rules / `clear`.
#[derive(Default)]
pub struct ActionQueue {
    slots: BTreeMap<IntentKind, KindSlot>,
    indices: Vec<IndexRecord>,
    priority_filters: BTreeMap<PriorityClass, PriorityClass>,
    discard_filters: BTreeMap<IntentKind, DiscardPolicy>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an intent kind to its handler and creates the typed queue.
    ///
    /// Re-registering a kind is rejected: silently overwriting would lose an
    /// executor binding with no indication.
    pub fn register(
        &mut self,
        kind: IntentKind,
        handler: impl IntentHandler + 'static,
    ) -> Result<(), QueueError> {
        if self.slots.contains_key(&kind) {
            return Err(QueueError::KindAlreadyRegistered(kind));
        }

        self.slots.insert(
            kind,
            KindSlot {
                entries: Vec::new(),
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    /// Appends an intent to its kind's queue and indexes it at the tail.
    ///
    /// Fails without touching any storage when the kind was never
    /// registered; the intended action is dropped and the caller decides how
    /// loudly to report it. Triggers [`sort`](Self::sort) on success.
    pub fn add(
        &mut self,
        intent: impl Into<Intent>,
        priority: PriorityClass,
        discard: DiscardPolicy,
    ) -> Result<(), QueueError> {
        let intent = intent.into();
        let kind = intent.kind();
        let slot = self
            .slots
            .get_mut(&kind)
            .ok_or(QueueError::KindNotRegistered(kind))?;

        slot.entries.push(intent);
        self.indices.push(IndexRecord {
            kind,
            priority,
            effective_priority: priority,
            discard_policy: discard,
            position: slot.entries.len() - 1,
            processing: false,
        });
        self.sort();
        Ok(())
    }

    /// Stable-sorts the index records by filtered priority, then runs the
    /// aggressive discard pass.
    ///
    /// Ties keep their prior relative order, so runs with identical input
    /// order resolve identically. The discard pass evicts every non-head
    /// record whose kind the discard filter table remaps to
    /// [`DiscardPolicy::UntilEndOfFrame`]; it runs before any `process` of
    /// the same frame.
    pub fn sort(&mut self) {
        for record in &mut self.indices {
            record.effective_priority = *self
                .priority_filters
                .get(&record.priority)
                .unwrap_or(&record.priority);
        }

        self.indices.sort_by_key(|record| record.effective_priority);

        let mut i = self.indices.len();
        while i > 1 {
            i -= 1;
            let kind = self.indices[i].kind;
            if self.discard_filters.get(&kind) == Some(&DiscardPolicy::UntilEndOfFrame) {
                self.remove_record(i, false);
            }
        }
    }

    /// Runs the head entry through its handler.
    ///
    /// The first time an entry is seen at the head it receives
    /// [`ExecutionPhase::Reserve`] and is marked processing; every call while
    /// it stays head then delivers [`ExecutionPhase::Process`]. Only the head
    /// may run.
    pub fn process(&mut self) {
        let Some(head) = self.indices.first() else {
            return;
        };
        let kind = head.kind;
        let position = head.position;
        let first_run = !head.processing;

        if first_run {
            self.indices[0].processing = true;
        }

        let Some(slot) = self.slots.get_mut(&kind) else {
            debug_assert!(false, "index record references unregistered kind {kind}");
            return;
        };
        debug_assert!(
            position < slot.entries.len(),
            "stale index record: {kind} position {position} past queue end"
        );

        let entry = slot.entries[position];
        if first_run {
            slot.handler.execute(&entry, ExecutionPhase::Reserve);
        }
        slot.handler.execute(&entry, ExecutionPhase::Process);
    }

    /// Removes the head record and its backing entry via the kind's remover.
    ///
    /// Remaining same-kind records at greater positions shift down by one.
    /// No re-sort: removing the head leaves the remainder's order intact by
    /// construction.
    pub fn pop(&mut self) {
        if self.indices.is_empty() {
            return;
        }
        self.remove_record(0, false);
    }

    /// End-of-frame discard: evicts every non-head record whose effective
    /// discard policy (filter remap, else its own) is
    /// [`DiscardPolicy::UntilEndOfFrame`].
    ///
    /// Owners call this after the frame's `process` and before the next
    /// frame's `add` calls.
    pub fn end_frame(&mut self) {
        let mut i = self.indices.len();
        while i > 1 {
            i -= 1;
            let record = &self.indices[i];
            let effective = self
                .discard_filters
                .get(&record.kind)
                .copied()
                .unwrap_or(record.discard_policy);
            if effective == DiscardPolicy::UntilEndOfFrame {
                self.remove_record(i, false);
            }
        }
    }

    /// Tears the queue down according to `mode`. Used on entity deletion and
    /// state exit.
    pub fn clear(&mut self, mode: CleanupMode) {
        match mode {
            CleanupMode::AllowInterrupts => self.clear_all(),
            CleanupMode::NoInterrupts => {
                let mut i = self.indices.len();
                while i > 0 {
                    i -= 1;
                    if !self.indices[i].processing {
                        self.remove_record(i, false);
                    }
                }
            }
            CleanupMode::ClearAndReset => {
                self.clear_all();
                self.priority_filters.clear();
                self.discard_filters.clear();
            }
        }
    }

    /// Installs or replaces a priority remap entry. Applied at sort time;
    /// stored entries keep their nominal class.
    pub fn create_priority_filter(&mut self, class: PriorityClass, remap: PriorityClass) {
        self.priority_filters.insert(class, remap);
    }

    /// Installs or replaces a discard remap entry, marking the kind for
    /// aggressive clearing during the sort's discard pass.
    pub fn create_discard_filter(&mut self, kind: IntentKind, remap: DiscardPolicy) {
        self.discard_filters.insert(kind, remap);
    }

    /// Empties both filter tables and re-sorts.
    pub fn clear_filters(&mut self) {
        self.priority_filters.clear();
        self.discard_filters.clear();
        self.sort();
    }

    /// Kind of the entry currently owning execution rights, if any.
    pub fn top_kind(&self) -> Option<IntentKind> {
        self.indices.first().map(|record| record.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Index records in resolution order. The record list is the sort-key
    /// source of truth; exposed read-only for diagnostics and tests.
    pub fn records(&self) -> &[IndexRecord] {
        &self.indices
    }

    /// Removes one index record and its backing entry, fixing positions of
    /// later same-kind records in the same operation.
    fn remove_record(&mut self, record_idx: usize, interrupt: bool) {
        let record = self.indices.remove(record_idx);
        let Some(slot) = self.slots.get_mut(&record.kind) else {
            debug_assert!(
                false,
                "index record references unregistered kind {}",
                record.kind
            );
            return;
        };
        debug_assert!(
            record.position < slot.entries.len(),
            "stale index record: {} position {} past queue end",
            record.kind,
            record.position
        );

        let KindSlot { entries, handler } = slot;
        let entry = entries[record.position];
        if interrupt && record.processing {
            handler.execute(&entry, ExecutionPhase::Interrupt);
        }
        handler.remove(&entry);
        entries.remove(record.position);

        for index in &mut self.indices {
            if index.kind == record.kind && index.position > record.position {
                index.position -= 1;
            }
        }
    }

    fn clear_all(&mut self) {
        while !self.indices.is_empty() {
            let last = self.indices.len() - 1;
            self.remove_record(last, true);
        }
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for record in &self.indices {
            write!(f, "({}, {}), ", record.kind, record.position)?;
        }
        write!(f, "]")
    }
}
