//! Messages processed by the WLC worker.

use crate::notifier::ResultSink;
use crate::types::{Status, WlcMode};
use nfa_macros::Action;

/// Everything the WLC reducer can receive
///
/// Requests come from [`crate::WlcApi`], notifications from the device
/// manager through [`crate::WlcNotifier`].
#[derive(Action, Clone, Debug)]
pub enum WlcAction {
    /// Register the caller's result sink
    #[request]
    Enable {
        /// Sink for this and all later events
        sink: ResultSink,
    },

    /// Start a WLC session
    #[request]
    Start {
        /// Requested mode
        mode: WlcMode,
    },

    /// Start a WPT cycle
    #[request]
    StartWpt {
        /// Power adjust request byte
        power_adjust: u8,
        /// WPT wait time interval code
        wait_time_interval: u8,
    },

    /// The controller answered a WPT start
    #[notification]
    WptStartResult {
        /// Controller status
        status: Status,
    },

    /// The controller reports the end of a WPT cycle
    #[notification]
    ChargingResult {
        /// Reason the cycle ended
        end_condition: u8,
    },

    /// Reset the control block; the module is being disabled
    Disable,
}

impl WlcAction {
    /// Where the action came from, for logs and metric labels
    #[must_use]
    pub const fn origin(&self) -> &'static str {
        if self.is_request() {
            "api"
        } else if self.is_notification() {
            "controller"
        } else {
            "system"
        }
    }
}
