//! The combat phase: round timing, pausing, and win/loss detection.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::context::{BattleContext, BattleEvent, DrawCommand, DrawSink, InputFlags};
use crate::graph::{BattleState, PhaseKind};
use crate::queue::CleanupMode;

/// The most complex battle phase. Owns the custom gauge and pause state and
/// drives each combatant's action queue; round-end conditions are published
/// as pure context queries for the graph's edges.
///
/// Nested sub-combat phases (time freeze) are registered here so that
/// control passing between them and combat never resets the round timer.
pub struct CombatPhase {
    duration: f64,
    progress: f64,
    timer_running: bool,
    paused: bool,
    can_pause: bool,
    gauge_full: bool,
    stop_broadcast: bool,
    subcombat: ArrayVec<PhaseKind, { BattleConfig::MAX_SUBCOMBAT }>,
}

impl CombatPhase {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            duration: config.custom_duration,
            progress: 0.0,
            timer_running: false,
            paused: false,
            can_pause: config.pausing_enabled,
            gauge_full: false,
            stop_broadcast: false,
            subcombat: ArrayVec::new(),
        }
    }

    /// Marks a phase as part of the combat routine: entering or leaving it
    /// keeps the round timer and gauge intact.
    pub fn register_subcombat(&mut self, kind: PhaseKind) {
        if !self.subcombat.contains(&kind) {
            self.subcombat.push(kind);
        }
    }

    pub fn enable_pausing(&mut self, enable: bool) {
        self.can_pause = enable;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn gauge_ratio(&self) -> f64 {
        (self.progress / self.duration).clamp(0.0, 1.0)
    }

    fn is_sub_combat(&self, kind: PhaseKind) -> bool {
        self.subcombat.contains(&kind)
    }

    /// A fresh round begins unless control is passing to/from a registered
    /// sub-combat phase.
    fn is_fresh_round(&self, neighbor: Option<PhaseKind>) -> bool {
        neighbor.is_none_or(|kind| !self.is_sub_combat(kind))
    }
}

impl BattleState for CombatPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Combat
    }

    fn on_start(&mut self, ctx: &mut BattleContext, previous: Option<PhaseKind>) {
        if ctx.primary_alive() && self.is_fresh_round(previous) {
            self.timer_running = true;
            self.progress = 0.0;
            self.gauge_full = false;
            ctx.gauge_full = false;
            ctx.time_freeze = false;
            // The round is underway; stop re-establishing handshakes.
            ctx.resync = false;
        }
        ctx.paused = self.paused;
    }

    fn on_end(&mut self, ctx: &mut BattleContext, next: PhaseKind) {
        if self.is_fresh_round(Some(next)) {
            self.timer_running = false;
            self.progress = 0.0;
            self.gauge_full = false;
            ctx.gauge_full = false;
        }
        ctx.time_freeze = false;
    }

    fn on_update(&mut self, ctx: &mut BattleContext, dt: f64) {
        let cleared = ctx.round_cleared();

        // Round-end is detected exactly once; every combatant's queue gets a
        // stop that spares in-flight actions.
        if (cleared || !ctx.primary_alive()) && !self.stop_broadcast {
            for combatant in ctx.field.iter_mut() {
                combatant.queue.clear(CleanupMode::NoInterrupts);
            }
            ctx.events.push(BattleEvent::BattleStopped);
            self.stop_broadcast = true;
        }

        if self.can_pause && ctx.input.contains(InputFlags::PAUSE) && !cleared {
            self.paused = !self.paused;
            self.timer_running = !self.paused;
            ctx.paused = self.paused;
        }

        if self.paused {
            // No gauge advancement and no field update while paused.
            ctx.card_select_requested = ctx.resync;
            return;
        }

        if self.timer_running {
            self.progress += dt;
        }

        // Field update: each combatant runs its queue head, then expires
        // end-of-frame intents before the next frame's additions.
        for combatant in ctx.field.iter_mut() {
            combatant.queue.process();
            combatant.queue.end_frame();
        }

        if self.progress >= self.duration && !self.gauge_full {
            self.gauge_full = true;
            ctx.gauge_full = true;
            ctx.events.push(BattleEvent::GaugeFull);
        }

        ctx.card_select_requested = (self.gauge_full
            && !cleared
            && ctx.input.contains(InputFlags::CUST_MENU))
            || ctx.resync;
    }

    fn on_draw(&self, ctx: &BattleContext, sink: &mut dyn DrawSink) {
        if ctx.countered {
            sink.submit(DrawCommand::CounterHit);
        } else if ctx.combo_delete_count == 2 {
            sink.submit(DrawCommand::DoubleDelete);
        } else if ctx.combo_delete_count > 2 {
            sink.submit(DrawCommand::TripleDelete);
        }

        if !ctx.round_cleared() {
            sink.submit(DrawCommand::CustomGauge(self.gauge_ratio()));
        }

        if self.paused {
            sink.submit(DrawCommand::PauseOverlay);
        }
    }
}
