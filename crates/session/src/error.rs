use battle_core::QueueError;

/// Errors surfaced by the session's local-intent API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("battle is already over")]
    BattleOver,
}
