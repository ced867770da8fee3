//! Time-freeze phase, nested inside combat.

use crate::config::BattleConfig;
use crate::context::BattleContext;
use crate::graph::{BattleState, PhaseKind};

/// Runs a frozen card action while the rest of the field holds still.
///
/// Registered as a sub-combat phase: entering and leaving it never resets
/// the combat phase's round timer or gauge.
#[derive(Debug)]
pub struct TimeFreezePhase {
    duration: f64,
    elapsed: f64,
}

impl TimeFreezePhase {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            duration: config.freeze_duration,
            elapsed: 0.0,
        }
    }
}

impl BattleState for TimeFreezePhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::TimeFreeze
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        self.elapsed = 0.0;
        ctx.freeze_over = false;
    }

    fn on_update(&mut self, ctx: &mut BattleContext, dt: f64) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            ctx.freeze_over = true;
        }
    }

    fn on_end(&mut self, ctx: &mut BattleContext, _next: PhaseKind) {
        ctx.time_freeze = false;
        ctx.freeze_over = false;
    }
}
