use crate::domain::{CallAction, InteractionState, Presence};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        action: CallAction,
        from: InteractionState,
    },
    #[error("a hold interval is already open")]
    HoldAlreadyOpen,
    #[error("no hold interval is open")]
    DoubleHoldClose,
    #[error("call clock is not running")]
    ClockNotRunning,
    #[error("call not found: {0}")]
    CallNotFound(String),
    #[error("presence is {0}, agent is not accepting calls")]
    NotAccepting(Presence),
    #[error("invalid dial string: {0}")]
    InvalidDialString(String),
    #[error("presence label is required")]
    InvalidPresence,
}

impl CoreError {
    /// Rejections that leave the call exactly as it was.
    pub fn is_rejected_action(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTransition { .. }
                | CoreError::HoldAlreadyOpen
                | CoreError::DoubleHoldClose
                | CoreError::ClockNotRunning
        )
    }
}
