//! WLC action handlers.
//!
//! Every handler runs on the store worker with exclusive access to the control
//! block. Requests have already passed syntactic validation on the caller's
//! thread; the handlers re-check them against the live state of the other
//! modules before changing anything.

use crate::actions::WlcAction;
use crate::environment::{DiscoveryFlags, DiscoveryState, RfProtocol, WlcEnvironment};
use crate::notifier::{notify, ResultSink};
use crate::state::{DisableSignal, WlcFlags, WlcState};
use crate::types::{Status, WlcEvent, WlcMode};
use nfa_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;
use thiserror::Error;

/// Why a Start request was refused on the worker
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRefusal {
    /// The requested mode is not the non-autonomous mode
    #[error("WLC mode {0:?} not supported")]
    UnsupportedMode(WlcMode),

    /// A non-autonomous session is already running
    #[error("WLC-P non-autonomous extension not in stopped state")]
    AlreadyStarted,

    /// Discovery is not in poll-active state
    #[error("NFCC not in RFST_POLL_ACTIVE state (in {0:?})")]
    NotPollActive(DiscoveryState),

    /// No activated protocol, or one that cannot carry WLC
    #[error("invalid RF protocol activated ({0:?})")]
    UnsupportedProtocol(Option<RfProtocol>),

    /// The reader/writer has an operation in flight
    #[error("RW API already busy")]
    ReaderWriterBusy,

    /// Discovery is waiting on the controller, stopping or disabling
    #[error("discovery busy (flags {0})")]
    DiscoveryBusy(DiscoveryFlags),
}

impl StartRefusal {
    /// Short guard name, used as a metric label
    #[must_use]
    pub const fn guard(&self) -> &'static str {
        match self {
            Self::UnsupportedMode(_) => "mode",
            Self::AlreadyStarted => "already_started",
            Self::NotPollActive(_) => "discovery_state",
            Self::UnsupportedProtocol(_) => "protocol",
            Self::ReaderWriterBusy => "rw_busy",
            Self::DiscoveryBusy(_) => "discovery_flags",
        }
    }

    /// Refusals caused by another module's state, as opposed to the request
    /// or the WLC session itself
    #[must_use]
    pub const fn is_cross_module(&self) -> bool {
        !matches!(self, Self::UnsupportedMode(_) | Self::AlreadyStarted)
    }
}

/// The WLC reducer
#[derive(Debug, Clone, Default)]
pub struct WlcReducer {
    report_start_failures: bool,
    disable_signal: DisableSignal,
}

impl WlcReducer {
    /// Reducer with the default, silent, Start failure policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify `StartResult(Failed)` when a cross-module guard refuses Start
    #[must_use]
    pub fn with_start_failure_reports(mut self, enabled: bool) -> Self {
        self.report_start_failures = enabled;
        self
    }

    /// Reset the control block as soon as `signal` is raised
    #[must_use]
    pub fn with_disable_signal(mut self, signal: DisableSignal) -> Self {
        self.disable_signal = signal;
        self
    }

    fn handle_enable(
        state: &mut WlcState,
        sink: ResultSink,
        env: &WlcEnvironment,
    ) -> SmallVec<[Effect; 4]> {
        let dm = &env.device_manager;
        let ready = dm.is_system_active() && !(dm.is_enable_pending() || dm.is_disabling());

        let status = if ready {
            state.sink = Some(sink.clone());
            Status::Ok
        } else {
            tracing::debug!(
                active = dm.is_system_active(),
                enable_pending = dm.is_enable_pending(),
                disabling = dm.is_disabling(),
                "DM not active or enable event pending or DM disabling NFC"
            );
            Status::Failed
        };

        // The result always goes to the requesting sink, stored or not
        smallvec![notify(Some(sink), WlcEvent::EnableResult(status))]
    }

    fn check_start(
        state: &WlcState,
        mode: WlcMode,
        env: &WlcEnvironment,
    ) -> Result<(), StartRefusal> {
        if mode != WlcMode::NonAutonomous {
            return Err(StartRefusal::UnsupportedMode(mode));
        }

        if state.is_non_auto_mode_enabled() {
            return Err(StartRefusal::AlreadyStarted);
        }

        let discovery_state = env.device_manager.discovery_state();
        if discovery_state != DiscoveryState::PollActive {
            return Err(StartRefusal::NotPollActive(discovery_state));
        }

        let protocol = env.reader_writer.activated_protocol();
        if !protocol.is_some_and(RfProtocol::supports_wlc) {
            return Err(StartRefusal::UnsupportedProtocol(protocol));
        }

        if env.reader_writer.is_api_busy() {
            return Err(StartRefusal::ReaderWriterBusy);
        }

        let flags = env.device_manager.discovery_flags();
        if flags.intersects(DiscoveryFlags::BUSY) {
            return Err(StartRefusal::DiscoveryBusy(flags));
        }

        Ok(())
    }

    fn handle_start(
        &self,
        state: &mut WlcState,
        mode: WlcMode,
        env: &WlcEnvironment,
    ) -> SmallVec<[Effect; 4]> {
        if let Err(refusal) = Self::check_start(state, mode, env) {
            tracing::error!(guard = refusal.guard(), "{refusal}");
            metrics::counter!("wlc.start.guard_failed", "guard" => refusal.guard()).increment(1);

            if self.report_start_failures && refusal.is_cross_module() {
                return smallvec![notify(
                    state.sink.clone(),
                    WlcEvent::StartResult(Status::Failed)
                )];
            }
            return smallvec![Effect::None];
        }

        state.mode = mode;
        state.flags.insert(WlcFlags::NON_AUTO_MODE_ENABLED);

        let dm = Arc::clone(&env.device_manager);
        smallvec![
            Effect::call(move || dm.activate_rf_interface_extension()),
            notify(state.sink.clone(), WlcEvent::StartResult(Status::Ok)),
        ]
    }

    fn handle_start_wpt(
        power_adjust: u8,
        wait_time_interval: u8,
        env: &WlcEnvironment,
    ) -> SmallVec<[Effect; 4]> {
        let dm = Arc::clone(&env.device_manager);
        smallvec![Effect::call(move || {
            tracing::trace!(power_adjust, wait_time_interval, "Forwarding WPT start");
            dm.start_wireless_power_transfer(power_adjust, wait_time_interval);
        })]
    }

    fn handle_wpt_start_result(
        state: &mut WlcState,
        status: Status,
    ) -> SmallVec<[Effect; 4]> {
        if status.is_ok() {
            if state.is_non_auto_mode_enabled() {
                state.flags.insert(WlcFlags::WPT_NOTIFICATION_PENDING);
            } else {
                tracing::warn!("WPT started without a non-autonomous session");
            }
        }

        smallvec![notify(state.sink.clone(), WlcEvent::StartWptResult(status))]
    }

    fn handle_charging_result(
        state: &mut WlcState,
        end_condition: u8,
    ) -> SmallVec<[Effect; 4]> {
        state.flags.remove(WlcFlags::WPT_NOTIFICATION_PENDING);

        smallvec![notify(
            state.sink.clone(),
            WlcEvent::ChargingResult(end_condition)
        )]
    }
}

impl Reducer for WlcReducer {
    type State = WlcState;
    type Action = WlcAction;
    type Environment = WlcEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect; 4]> {
        tracing::debug!(
            action = action.name(),
            origin = action.origin(),
            flags = state.flags.bits(),
            "WLC action"
        );

        if !state.disabled && self.disable_signal.is_raised() {
            tracing::debug!("WLC disable requested, resetting control block");
            state.reset();
        }

        if state.disabled {
            if !matches!(action, WlcAction::Disable) {
                tracing::warn!(action = action.name(), "WLC disabled, action dropped");
                metrics::counter!("wlc.requests.dropped", "origin" => action.origin())
                    .increment(1);
            }
            return smallvec![Effect::None];
        }

        match action {
            WlcAction::Enable { sink } => Self::handle_enable(state, sink, env),
            WlcAction::Start { mode } => self.handle_start(state, mode, env),
            WlcAction::StartWpt {
                power_adjust,
                wait_time_interval,
            } => Self::handle_start_wpt(power_adjust, wait_time_interval, env),
            WlcAction::WptStartResult { status } => Self::handle_wpt_start_result(state, status),
            WlcAction::ChargingResult { end_condition } => {
                Self::handle_charging_result(state, end_condition)
            },
            WlcAction::Disable => {
                state.reset();
                smallvec![Effect::None]
            },
        }
    }
}
