//! Abstract signals delivered by the synchronization layer.
//!
//! The raw transport (framing, reliability, payload serialization) lives
//! outside this core. By the time a [`NetSignal`] arrives here it has been
//! deserialized and validated; the core only mutates remote-state flags and
//! combatant queues in response. Delivery is at most once per wire message,
//! ordered per signal type but not globally across types.

/// Identity of a selected navi (playable character archetype).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaviId(pub u32);

/// Identity of a card in the shared catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub u32);

/// Tile-grid facing/movement direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// One validated message from the remote player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetSignal {
    /// Remote finished its setup and is ready to begin the round.
    RemoteReady,
    /// Remote announced which navi it brought.
    RemoteConnected(NaviId),
    /// Remote's authoritative health report.
    RemoteHealth(i32),
    /// Remote movement replication.
    RemoteDirection(Direction),
    /// Remote picked a transformation form (-1 clears it).
    RemoteFormSelect(i32),
    /// Remote used a card at the given wall-clock timestamp.
    RemoteCardUse { card: CardId, timestamp: u64 },
    /// Remote reports its own defeat.
    RemoteLoser,
}
