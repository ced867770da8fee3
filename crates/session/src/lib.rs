//! Imperative shell around [`battle_core`].
//!
//! A [`BattleSession`] owns one networked battle: it wires the standard PVP
//! phase graph, translates validated network signals into remote-state and
//! queue mutations, steps the graph exactly once per frame, and exposes the
//! read-only [`OutboundReport`] a synchronization layer polls to decide what
//! to transmit. Transport, rendering, and audio never appear here.
mod error;
mod session;

pub use error::SessionError;
pub use session::{BattleSession, ExecutedIntent, OutboundReport, SessionConfig};
