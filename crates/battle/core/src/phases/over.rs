//! Battle-over phases.
//!
//! There is no terminal node in the graph: these phases park it and raise
//! `battle_over`, and the hosting scene pops or transitions away.

use crate::context::BattleContext;
use crate::graph::{BattleState, PhaseKind};

/// Victory screen placeholder: rewards themselves are presentation.
#[derive(Debug, Default)]
pub struct RewardPhase;

impl RewardPhase {
    pub fn new() -> Self {
        Self
    }
}

impl BattleState for RewardPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Reward
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        ctx.battle_over = true;
    }

    fn on_update(&mut self, _ctx: &mut BattleContext, _dt: f64) {}

    fn is_terminal(&self) -> bool {
        true
    }
}

/// Defeat fade-out.
#[derive(Debug, Default)]
pub struct DefeatPhase;

impl DefeatPhase {
    pub fn new() -> Self {
        Self
    }
}

impl BattleState for DefeatPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Defeat
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        ctx.battle_over = true;
    }

    fn on_update(&mut self, _ctx: &mut BattleContext, _dt: f64) {}

    fn is_terminal(&self) -> bool {
        true
    }
}
