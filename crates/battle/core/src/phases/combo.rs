//! Combo resolution phase.

use crate::config::BattleConfig;
use crate::context::BattleContext;
use crate::graph::{BattleState, PhaseKind};
use crate::queue::PriorityClass;

/// Resolves the selected hand into a program advance over a fixed window.
///
/// While the window is open, every combatant's queue carries a priority
/// filter promoting combo-class intents above everything but immediates;
/// the filters are dropped on exit without touching stored entries.
#[derive(Debug)]
pub struct ComboPhase {
    duration: f64,
    elapsed: f64,
}

impl ComboPhase {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            duration: config.combo_duration,
            elapsed: 0.0,
        }
    }
}

impl BattleState for ComboPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Combo
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        self.elapsed = 0.0;
        ctx.combo_done = false;

        for combatant in ctx.field.iter_mut() {
            combatant
                .queue
                .create_priority_filter(PriorityClass::Combo, PriorityClass::Immediate);
        }
    }

    fn on_update(&mut self, ctx: &mut BattleContext, dt: f64) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            ctx.combo_done = true;
        }
    }

    fn on_end(&mut self, ctx: &mut BattleContext, _next: PhaseKind) {
        for combatant in ctx.field.iter_mut() {
            combatant.queue.clear_filters();
        }
    }
}
