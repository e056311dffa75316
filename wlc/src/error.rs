//! Error types for the WLC module.

use crate::types::{Status, WlcMode};
use nfa_core::registry::RegistryError;
use nfa_runtime::StoreError;
use thiserror::Error;

/// A request parameter failed syntactic validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParam {
    /// The mode is known but not supported
    #[error("WLC mode {0:?} is not supported")]
    UnsupportedMode(WlcMode),

    /// The mode byte does not name any mode
    #[error("unknown WLC mode {0:#04x}")]
    UnknownMode(u8),

    /// The power adjust request is neither an increase nor a decrease
    #[error("power adjust request {0:#04x} is out of range")]
    PowerAdjust(u8),

    /// The WPT wait time interval is out of range or has reserved bits set
    #[error("WPT wait time interval {0:#04x} is out of range")]
    WaitTimeInterval(u8),
}

/// Errors returned synchronously by the WLC API
///
/// A returned error means nothing was queued and no event will follow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WlcError {
    /// A parameter failed validation
    #[error("invalid parameter: {0}")]
    InvalidParam(#[from] InvalidParam),

    /// The result sink's receiver is gone
    #[error("result sink is closed")]
    SinkClosed,

    /// The module queue is full
    #[error("WLC queue is full")]
    ResourceExhausted,

    /// The module is shutting down
    #[error("WLC module is shutting down")]
    ShutdownInProgress,

    /// Registration with the system manager failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl WlcError {
    /// NFA status equivalent of this error
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::InvalidParam(_) => Status::InvalidParam,
            Self::SinkClosed
            | Self::ResourceExhausted
            | Self::ShutdownInProgress
            | Self::Registry(_) => Status::Failed,
        }
    }
}

impl From<StoreError> for WlcError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::QueueFull(_) => Self::ResourceExhausted,
            StoreError::ShutdownInProgress
            | StoreError::ShutdownTimeout(_)
            | StoreError::ChannelClosed => Self::ShutdownInProgress,
        }
    }
}
