//! Connection/resync phase: both sides must announce themselves before the
//! first card selection.

use crate::context::BattleContext;
use crate::graph::{BattleState, PhaseKind};

/// Holds the battle at its entry until the remote is connected and both
/// sides reported ready. The actual handshake traffic is the transport
/// layer's business; this phase only watches the flags it deposits.
#[derive(Debug, Default)]
pub struct ConnectPhase;

impl ConnectPhase {
    pub fn new() -> Self {
        Self
    }
}

impl BattleState for ConnectPhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Connect
    }

    fn on_start(&mut self, ctx: &mut BattleContext, _previous: Option<PhaseKind>) {
        // Keep re-establishing the handshake until the exit edge fires.
        ctx.resync = true;
    }

    fn on_update(&mut self, _ctx: &mut BattleContext, _dt: f64) {}

    fn on_end(&mut self, ctx: &mut BattleContext, _next: PhaseKind) {
        ctx.resync = false;
    }
}

/// Exit condition for the connect phase, usable as an edge predicate.
pub fn connection_established(ctx: &BattleContext) -> bool {
    ctx.remote.connected && ctx.remote.ready && ctx.local_ready
}
