use thiserror::Error;

use crate::enums::SessionMode;

/// Rejections from the session's direct API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0:?} mode is locked")]
    ModeLocked(SessionMode),
    #[error("no active session")]
    NotActive,
    #[error("player is not dead")]
    NotDead,
    #[error("a revival request is already pending")]
    RevivalPending,
    #[error("no revival request is pending")]
    NoRevivalPending,
}
