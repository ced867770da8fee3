//! Concrete battle phases.
//!
//! Each phase implements [`crate::graph::BattleState`] and owns its own
//! timers and latches. The standard PVP wiring between them lives in the
//! `session` crate; the phases themselves never know the graph topology.

mod card_select;
mod combat;
mod combo;
mod connect;
mod over;
mod time_freeze;

pub use card_select::CardSelectPhase;
pub use combat::CombatPhase;
pub use combo::ComboPhase;
pub use connect::{ConnectPhase, connection_established};
pub use over::{DefeatPhase, RewardPhase};
pub use time_freeze::TimeFreezePhase;
