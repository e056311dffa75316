//! In-memory stand-ins for the device manager and reader/writer modules.
//!
//! Both start out in the state a successful Start needs: system active, poll
//! active with no pending discovery transaction, an ISO-DEP endpoint activated
//! and the reader/writer idle. Tests flip individual conditions with the
//! setters and read back what the WLC module asked for.

use crate::environment::{DeviceManager, DiscoveryFlags, DiscoveryState, ReaderWriter, RfProtocol};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct DeviceManagerState {
    system_active: bool,
    enable_pending: bool,
    disabling: bool,
    discovery_state: DiscoveryState,
    discovery_flags: DiscoveryFlags,
    extension_activations: usize,
    wpt_requests: Vec<(u8, u8)>,
}

/// Settable device manager that records the commands it receives
#[derive(Debug)]
pub struct MockDeviceManager {
    state: Mutex<DeviceManagerState>,
}

impl MockDeviceManager {
    /// Device manager ready for a WLC session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(DeviceManagerState {
                system_active: true,
                enable_pending: false,
                disabling: false,
                discovery_state: DiscoveryState::PollActive,
                discovery_flags: DiscoveryFlags::empty(),
                extension_activations: 0,
                wpt_requests: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set whether the device manager has completed enable
    pub fn set_system_active(&self, active: bool) {
        self.lock().system_active = active;
    }

    /// Set whether an enable is in progress
    pub fn set_enable_pending(&self, pending: bool) {
        self.lock().enable_pending = pending;
    }

    /// Set whether NFC is being disabled
    pub fn set_disabling(&self, disabling: bool) {
        self.lock().disabling = disabling;
    }

    /// Set the discovery state
    pub fn set_discovery_state(&self, state: DiscoveryState) {
        self.lock().discovery_state = state;
    }

    /// Set the discovery flags
    pub fn set_discovery_flags(&self, flags: DiscoveryFlags) {
        self.lock().discovery_flags = flags;
    }

    /// Number of RF interface extension activations requested
    #[must_use]
    pub fn extension_activations(&self) -> usize {
        self.lock().extension_activations
    }

    /// Every WPT start forwarded, as `(power_adjust, wait_time_interval)`
    #[must_use]
    pub fn wpt_requests(&self) -> Vec<(u8, u8)> {
        self.lock().wpt_requests.clone()
    }
}

impl Default for MockDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceManager for MockDeviceManager {
    fn is_system_active(&self) -> bool {
        self.lock().system_active
    }

    fn is_enable_pending(&self) -> bool {
        self.lock().enable_pending
    }

    fn is_disabling(&self) -> bool {
        self.lock().disabling
    }

    fn discovery_state(&self) -> DiscoveryState {
        self.lock().discovery_state
    }

    fn discovery_flags(&self) -> DiscoveryFlags {
        self.lock().discovery_flags
    }

    fn activate_rf_interface_extension(&self) {
        self.lock().extension_activations += 1;
    }

    fn start_wireless_power_transfer(&self, power_adjust: u8, wait_time_interval: u8) {
        self.lock().wpt_requests.push((power_adjust, wait_time_interval));
    }
}

#[derive(Debug)]
struct ReaderWriterState {
    protocol: Option<RfProtocol>,
    api_busy: bool,
}

/// Settable reader/writer module
#[derive(Debug)]
pub struct MockReaderWriter {
    state: Mutex<ReaderWriterState>,
}

impl MockReaderWriter {
    /// Idle reader/writer with an ISO-DEP endpoint activated
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(ReaderWriterState {
                protocol: Some(RfProtocol::IsoDep),
                api_busy: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReaderWriterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the activated protocol
    pub fn set_protocol(&self, protocol: Option<RfProtocol>) {
        self.lock().protocol = protocol;
    }

    /// Set whether a reader/writer API call is in progress
    pub fn set_api_busy(&self, busy: bool) {
        self.lock().api_busy = busy;
    }
}

impl Default for MockReaderWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderWriter for MockReaderWriter {
    fn activated_protocol(&self) -> Option<RfProtocol> {
        self.lock().protocol
    }

    fn is_api_busy(&self) -> bool {
        self.lock().api_busy
    }
}
