//! Deterministic turn-resolution core for tile-based action combat.
//!
//! `battle-core` decides, frame by frame, which queued intents may execute
//! and when control passes between battle phases. The two load-bearing
//! pieces are the per-entity [`queue::ActionQueue`] (priority arbitration
//! with filter overrides) and the [`graph::BattleStateGraph`] (guarded phase
//! transitions evaluated once per frame). Everything here is single-threaded
//! and synchronous; rendering, audio, UI, and the network transport are
//! external collaborators reached only through abstract signals and draw
//! commands.
pub mod config;
pub mod context;
pub mod field;
pub mod graph;
pub mod phases;
pub mod queue;
pub mod signals;
pub use config::BattleConfig;
pub use context::{BattleContext, BattleEvent, DrawCommand, DrawSink, InputFlags, RemoteFlags};
pub use field::{CombatRole, Combatant, CombatantId, Field, Team};
pub use graph::{BattleState, BattleStateGraph, PhaseKind, StateId};
pub use phases::{
    CardSelectPhase, CombatPhase, ComboPhase, ConnectPhase, DefeatPhase, RewardPhase,
    TimeFreezePhase, connection_established,
};
pub use queue::{
    ActionQueue, BusterIntent, CardIntent, CleanupMode, DiscardPolicy, ExecutionPhase, Intent,
    IndexRecord, IntentHandler, IntentKind, MoveIntent, PeekIntent, PriorityClass, QueueError,
    SpecialIntent,
};
pub use signals::{CardId, Direction, NaviId, NetSignal};
