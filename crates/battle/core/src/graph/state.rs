//! Battle scene state interface.

use crate::context::{BattleContext, DrawSink};

/// Stateless identity of a battle phase. Used for the sub-combat membership
/// check and for start/end bookkeeping; never for downcasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseKind {
    Connect,
    CardSelect,
    Combo,
    Combat,
    TimeFreeze,
    Reward,
    Defeat,
}

/// One mutually exclusive phase of a battle.
///
/// Constructed once at battle setup and re-entered many times; phase-local
/// data (timers, latches) is owned by the implementation. Observable exit
/// conditions are published into the [`BattleContext`] so the graph's
/// predicates stay pure.
pub trait BattleState {
    fn kind(&self) -> PhaseKind;

    /// Entered. `previous` is `None` only when the graph starts here.
    fn on_start(&mut self, _ctx: &mut BattleContext, _previous: Option<PhaseKind>) {}

    fn on_update(&mut self, ctx: &mut BattleContext, dt: f64);

    fn on_draw(&self, _ctx: &BattleContext, _sink: &mut dyn DrawSink) {}

    /// Exited in favor of `next`.
    fn on_end(&mut self, _ctx: &mut BattleContext, _next: PhaseKind) {}

    /// Terminal phases park the graph; the hosting scene is expected to pop
    /// or transition away.
    fn is_terminal(&self) -> bool {
        false
    }
}
