//! Public entry points of the WLC module.
//!
//! Every call validates its parameters on the caller's thread and hands a
//! request to the WLC worker without blocking. `Ok(())` means the request was
//! queued; the outcome arrives later on the result sink. An `Err` means
//! nothing was queued and no event will follow.

use crate::actions::WlcAction;
use crate::error::{InvalidParam, WlcError};
use crate::notifier::ResultSink;
use crate::state::WlcState;
use crate::types::{Status, WlcMode};
use crate::validation::{validate_mode, validate_power_adjust, validate_wait_interval};
use nfa_runtime::Store;

/// Store hosting the WLC reducer
pub type WlcStore = Store<WlcState, WlcAction>;

/// Request dispatcher
///
/// Cheap to clone and safe to use from any thread.
#[derive(Debug, Clone)]
pub struct WlcApi {
    store: WlcStore,
}

impl WlcApi {
    pub(crate) const fn new(store: WlcStore) -> Self {
        Self { store }
    }

    /// Register `sink` for WLC events
    ///
    /// The outcome is always delivered to `sink` as `EnableResult`.
    ///
    /// # Errors
    ///
    /// - [`WlcError::SinkClosed`] if the sink's receiver has been dropped
    /// - [`WlcError::ResourceExhausted`] if the queue is full
    pub fn enable(&self, sink: ResultSink) -> Result<(), WlcError> {
        if sink.is_closed() {
            return Err(reject(WlcError::SinkClosed));
        }
        self.dispatch(WlcAction::Enable { sink })
    }

    /// Start a WLC session in `mode`
    ///
    /// # Errors
    ///
    /// - [`WlcError::InvalidParam`] for any mode other than non-autonomous
    /// - [`WlcError::ResourceExhausted`] if the queue is full
    pub fn start(&self, mode: WlcMode) -> Result<(), WlcError> {
        if !validate_mode(mode) {
            return Err(reject(InvalidParam::UnsupportedMode(mode).into()));
        }
        self.dispatch(WlcAction::Start { mode })
    }

    /// [`WlcApi::start`] with the mode given as its protocol byte
    ///
    /// # Errors
    ///
    /// As [`WlcApi::start`], plus [`WlcError::InvalidParam`] for unknown bytes.
    pub fn start_raw(&self, mode: u8) -> Result<(), WlcError> {
        let mode = WlcMode::try_from(mode).map_err(|e| reject(e.into()))?;
        self.start(mode)
    }

    /// Start a WPT cycle
    ///
    /// # Errors
    ///
    /// - [`WlcError::InvalidParam`] if either parameter is out of range
    /// - [`WlcError::ResourceExhausted`] if the queue is full
    pub fn start_wpt(&self, power_adjust: u8, wait_time_interval: u8) -> Result<(), WlcError> {
        if !validate_power_adjust(power_adjust) {
            return Err(reject(InvalidParam::PowerAdjust(power_adjust).into()));
        }
        if !validate_wait_interval(wait_time_interval) {
            return Err(reject(
                InvalidParam::WaitTimeInterval(wait_time_interval).into(),
            ));
        }
        self.dispatch(WlcAction::StartWpt {
            power_adjust,
            wait_time_interval,
        })
    }

    fn dispatch(&self, action: WlcAction) -> Result<(), WlcError> {
        let name = action.name();
        self.store.enqueue(action).map_err(|e| {
            tracing::warn!(action = name, error = %e, "WLC request not queued");
            reject(e.into())
        })
    }
}

/// Handle for the device manager to report WPT progress
///
/// Notifications go through the same queue as requests, so they are handled
/// in order with them.
#[derive(Debug, Clone)]
pub struct WlcNotifier {
    store: WlcStore,
}

impl WlcNotifier {
    pub(crate) const fn new(store: WlcStore) -> Self {
        Self { store }
    }

    /// The controller answered a WPT start
    ///
    /// # Errors
    ///
    /// [`WlcError::ResourceExhausted`] if the queue is full.
    pub fn wpt_start_result(&self, status: Status) -> Result<(), WlcError> {
        Ok(self.store.enqueue(WlcAction::WptStartResult { status })?)
    }

    /// The controller reports the end of a WPT cycle
    ///
    /// # Errors
    ///
    /// [`WlcError::ResourceExhausted`] if the queue is full.
    pub fn charging_result(&self, end_condition: u8) -> Result<(), WlcError> {
        Ok(self.store.enqueue(WlcAction::ChargingResult { end_condition })?)
    }
}

fn reject(error: WlcError) -> WlcError {
    tracing::warn!(%error, status = %error.status(), "WLC request rejected");
    metrics::counter!("wlc.requests.rejected").increment(1);
    error
}
