//! Card selection phase.

use crate::context::{BattleContext, InputFlags};
use crate::graph::{BattleState, PhaseKind};

/// Waits for the local player to confirm a hand. The widget itself is UI;
/// this phase owns only the confirmation latch and the re-ready bookkeeping
/// on exit.
#[derive(Debug, Default)]
pub struct CardSelectPhase;

impl CardSelectPhase {
    pub fn new() -> Self {
        Self
    }
}

impl BattleState for CardSelectPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::CardSelect
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        ctx.cards_confirmed = false;
        ctx.card_select_requested = false;
    }

    fn on_update(&mut self, ctx: &mut BattleContext, _dt: f64) {
        if ctx.input.contains(InputFlags::CONFIRM) {
            ctx.cards_confirmed = true;
        }
    }

    fn on_end(&mut self, ctx: &mut BattleContext, next: PhaseKind) {
        if next == PhaseKind::Combo {
            // Force both sides to resync right after cards are selected.
            ctx.local_ready = false;
            ctx.remote.ready = false;
            ctx.resync = true;
        }
    }
}
