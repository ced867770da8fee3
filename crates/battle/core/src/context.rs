//! Shared battle data read by phases and transition predicates.
//!
//! Phases publish their observable exit conditions here instead of exposing
//! themselves to downcasts: a predicate is a pure function over this context
//! and nothing else. The context is owned exclusively by the hosting session
//! and mutated only between/during frame steps, never concurrently.

use bitflags::bitflags;

use crate::field::{CombatantId, Field};
use crate::signals::{Direction, NaviId};

bitflags! {
    /// Snapshot of the buttons relevant to battle flow, taken once per frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct InputFlags: u8 {
        const PAUSE     = 1 << 0;
        const CONFIRM   = 1 << 1;
        const CANCEL    = 1 << 2;
        const CUST_MENU = 1 << 3;
    }
}

/// Remote player state, mutated only by applying validated signals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemoteFlags {
    pub connected: bool,
    pub ready: bool,
    pub navi: Option<NaviId>,
    pub health: i32,
    pub direction: Direction,
    pub selected_form: Option<i32>,
    pub lost: bool,
}

/// One-shot notifications raised by phases for the hosting scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    /// The custom gauge reached its configured duration.
    GaugeFull,
    /// Round-end detected; every combatant's queue received a stop.
    BattleStopped,
}

/// Presentation-agnostic draw request. The core never touches a render
/// surface; phases submit commands and the host interprets them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Gauge fill ratio in `[0, 1]`.
    CustomGauge(f64),
    PauseOverlay,
    DoubleDelete,
    TripleDelete,
    CounterHit,
}

/// Opaque sink the graph's draw pass writes into.
pub trait DrawSink {
    fn submit(&mut self, command: DrawCommand);
}

impl DrawSink for Vec<DrawCommand> {
    fn submit(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

/// Everything the battle phases share: the field, the per-frame input
/// snapshot, remote state, and the flags phases publish for the graph's
/// edges.
#[derive(Debug)]
pub struct BattleContext {
    pub field: Field,
    /// The client player's combatant.
    pub primary: CombatantId,
    pub input: InputFlags,
    pub remote: RemoteFlags,

    /// Enemies deleted within the combo window, pending resolution.
    pub combo_delete_count: u32,
    /// A counter hit landed this round.
    pub countered: bool,

    /// Local side finished setup and announced readiness.
    pub local_ready: bool,
    /// Handshake must be re-established before combat resumes.
    pub resync: bool,

    // ===== flags published by phases for edge predicates =====
    pub cards_confirmed: bool,
    pub combo_done: bool,
    pub gauge_full: bool,
    pub card_select_requested: bool,
    pub paused: bool,
    pub time_freeze: bool,
    pub freeze_over: bool,
    pub battle_over: bool,

    /// One-shot events for the hosting scene, drained each frame.
    pub events: Vec<BattleEvent>,
}

impl BattleContext {
    /// Builds a context around a field that already contains the primary
    /// combatant.
    pub fn new(field: Field, primary: CombatantId) -> Self {
        debug_assert!(
            field.combatant(primary).is_some(),
            "primary combatant must be on the field"
        );
        Self {
            field,
            primary,
            input: InputFlags::empty(),
            remote: RemoteFlags::default(),
            combo_delete_count: 0,
            countered: false,
            local_ready: false,
            resync: true,
            cards_confirmed: false,
            combo_done: false,
            gauge_full: false,
            card_select_requested: false,
            paused: false,
            time_freeze: false,
            freeze_over: false,
            battle_over: false,
            events: Vec::new(),
        }
    }

    pub fn primary_alive(&self) -> bool {
        self.field
            .combatant(self.primary)
            .is_some_and(|combatant| combatant.is_alive())
    }

    pub fn primary_health(&self) -> i32 {
        self.field
            .combatant(self.primary)
            .map_or(0, |combatant| combatant.health)
    }

    /// All hostile fighters removed from the field.
    pub fn round_cleared(&self) -> bool {
        let team = self
            .field
            .combatant(self.primary)
            .map_or(crate::field::Team::Red, |combatant| combatant.team);
        self.field.fighters_remaining(team.opponent()) == 0
    }

    /// Won: alive, field cleared of hostiles, and no combo deletions still
    /// resolving. Pure query, re-evaluated by the graph's edges every frame.
    pub fn player_won(&self) -> bool {
        !self.player_lost() && self.round_cleared() && self.combo_delete_count == 0
    }

    /// Lost: the primary combatant's health reached zero.
    pub fn player_lost(&self) -> bool {
        !self.primary_alive()
    }

    /// A time-freeze card fired and combat is not paused.
    pub fn has_time_freeze(&self) -> bool {
        self.time_freeze && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{CombatRole, Team};

    fn context_with_enemy() -> (BattleContext, CombatantId) {
        let mut field = Field::new();
        let primary = field.spawn(Team::Red, CombatRole::Fighter, 100);
        let enemy = field.spawn(Team::Blue, CombatRole::Fighter, 40);
        (BattleContext::new(field, primary), enemy)
    }

    #[test]
    fn win_requires_cleared_field_and_settled_combos() {
        let (mut ctx, enemy) = context_with_enemy();
        assert!(!ctx.player_won());

        ctx.field.remove(enemy);
        ctx.combo_delete_count = 1;
        assert!(!ctx.player_won());

        ctx.combo_delete_count = 0;
        assert!(ctx.player_won());
    }

    #[test]
    fn loss_is_primary_health_reaching_zero() {
        let (mut ctx, _) = context_with_enemy();
        let primary = ctx.primary;
        ctx.field.combatant_mut(primary).unwrap().health = 0;

        assert!(ctx.player_lost());
        assert!(!ctx.player_won());
    }

    #[test]
    fn lingering_obstacle_does_not_block_the_win() {
        let mut field = Field::new();
        let primary = field.spawn(Team::Red, CombatRole::Fighter, 100);
        field.spawn(Team::Blue, CombatRole::Obstacle, 200);
        let ctx = BattleContext::new(field, primary);

        assert!(ctx.player_won());
    }

    #[test]
    fn time_freeze_is_masked_while_paused() {
        let (mut ctx, _) = context_with_enemy();
        ctx.time_freeze = true;
        assert!(ctx.has_time_freeze());

        ctx.paused = true;
        assert!(!ctx.has_time_freeze());
    }
}
