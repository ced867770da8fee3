//! Closed intent taxonomy for the per-entity action queue.
//!
//! Every queueable action belongs to exactly one [`IntentKind`]. The payload
//! lives in the matching [`Intent`] variant, so kind dispatch is a tag match
//! rather than a runtime type lookup.

use crate::signals::{CardId, Direction};

/// Category of a queued action. Each kind owns one typed queue at runtime.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentKind {
    Movement,
    CardUse,
    SpecialAbility,
    BusterShot,
    PeekCard,
}

/// Default resolution order among pending intents. Lower resolves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityClass {
    Immediate,
    Combo,
    Trap,
    Involuntary,
    Voluntary,
}

/// How long an unresolved intent survives before forced eviction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscardPolicy {
    /// Stays queued until processed or popped.
    UntilResolved,
    /// Evicted at end of frame if it never became the head.
    UntilEndOfFrame,
}

/// Lifecycle stage passed to a kind's handler when the queue runs an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExecutionPhase {
    /// The entry has become the head and now owns execution rights.
    Reserve,
    /// The head entry should advance this frame.
    Process,
    /// The entry is being torn down mid-flight.
    Interrupt,
}

/// Teardown behavior for [`ActionQueue::clear`](super::ActionQueue::clear).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleanupMode {
    /// Remove everything, interrupting in-flight entries.
    AllowInterrupts,
    /// Remove everything except entries already being processed.
    NoInterrupts,
    /// Remove everything, interrupt in-flight entries, and drop all filters.
    ClearAndReset,
}

/// Movement request toward an adjacent tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveIntent {
    pub direction: Direction,
}

/// Use of a selected card, stamped with the originating frame's wall time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardIntent {
    pub card: CardId,
    pub timestamp: u64,
}

/// Activation of the combatant's special ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialIntent;

/// Basic ranged attack, possibly charged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusterIntent {
    pub charged: bool,
}

/// Preview of the next card without committing to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeekIntent;

/// Tagged payload for one queued action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Movement(MoveIntent),
    CardUse(CardIntent),
    SpecialAbility(SpecialIntent),
    BusterShot(BusterIntent),
    PeekCard(PeekIntent),
}

impl Intent {
    /// Returns the kind tag of this payload.
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Movement(_) => IntentKind::Movement,
            Intent::CardUse(_) => IntentKind::CardUse,
            Intent::SpecialAbility(_) => IntentKind::SpecialAbility,
            Intent::BusterShot(_) => IntentKind::BusterShot,
            Intent::PeekCard(_) => IntentKind::PeekCard,
        }
    }
}

impl From<MoveIntent> for Intent {
    fn from(value: MoveIntent) -> Self {
        Intent::Movement(value)
    }
}

impl From<CardIntent> for Intent {
    fn from(value: CardIntent) -> Self {
        Intent::CardUse(value)
    }
}

impl From<SpecialIntent> for Intent {
    fn from(value: SpecialIntent) -> Self {
        Intent::SpecialAbility(value)
    }
}

impl From<BusterIntent> for Intent {
    fn from(value: BusterIntent) -> Self {
        Intent::BusterShot(value)
    }
}

impl From<PeekIntent> for Intent {
    fn from(value: PeekIntent) -> Self {
        Intent::PeekCard(value)
    }
}

/// Executes and cleans up entries of one registered kind.
///
/// `execute` runs the entry through its lifecycle phases; `remove` is the
/// cleanup side effect for a discarded entry and defaults to a no-op.
pub trait IntentHandler {
    fn execute(&mut self, intent: &Intent, phase: ExecutionPhase);

    fn remove(&mut self, _intent: &Intent) {}
}

/// Closures work as handlers when no cleanup side effect is needed.
impl<F> IntentHandler for F
where
    F: FnMut(&Intent, ExecutionPhase),
{
    fn execute(&mut self, intent: &Intent, phase: ExecutionPhase) {
        self(intent, phase)
    }
}
