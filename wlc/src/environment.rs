//! Collaborating modules the WLC handlers consult and drive.
//!
//! The handlers never reach into other modules' control blocks; they query and
//! command them through these traits, injected via [`WlcEnvironment`].

use std::fmt;
use std::sync::Arc;

/// RF discovery state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryState {
    /// Discovery is stopped
    Idle,
    /// Polling and listening
    Discovery,
    /// Waiting for all discovery notifications
    W4AllDiscoveries,
    /// Waiting for the host to select a discovered endpoint
    W4HostSelect,
    /// A remote endpoint is selected and active in poll mode
    PollActive,
    /// Activated in listen mode
    ListenActive,
    /// Listen mode, remote endpoint asleep
    ListenSleep,
    /// Low power listen
    LpListen,
    /// Low power, endpoint active
    LpActive,
}

/// Flag bits of the discovery control block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DiscoveryFlags(u16);

impl DiscoveryFlags {
    /// Waiting for a response from the controller
    pub const W4_RSP: Self = Self(0x0002);
    /// Waiting for a notification from the controller
    pub const W4_NTF: Self = Self(0x0004);
    /// Stopping discovery is pending
    pub const STOPPING: Self = Self(0x0010);
    /// Disabling NFA is pending
    pub const DISABLING: Self = Self(0x0020);

    /// Flags that mean discovery is mid-transaction
    pub const BUSY: Self =
        Self(Self::W4_RSP.0 | Self::W4_NTF.0 | Self::STOPPING.0 | Self::DISABLING.0);

    /// No flags set
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bits
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns true if any flag of `other` is set in `self`
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two flag sets
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for DiscoveryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for DiscoveryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Protocol of the activated remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RfProtocol {
    /// Type 1 Tag
    T1T = 0x01,
    /// Type 2 Tag
    T2T = 0x02,
    /// Type 3 Tag
    T3T = 0x03,
    /// ISO-DEP (ISO 14443-4)
    IsoDep = 0x04,
    /// NFC-DEP (peer to peer)
    NfcDep = 0x05,
    /// Type 5 Tag
    T5T = 0x06,
}

impl RfProtocol {
    /// Returns true for protocols a WLC listener can be reached over
    #[must_use]
    pub const fn supports_wlc(self) -> bool {
        matches!(self, Self::T2T | Self::T3T | Self::T5T | Self::IsoDep)
    }
}

/// Device manager: system readiness, discovery and controller commands
pub trait DeviceManager: Send + Sync {
    /// The device manager has completed enable
    fn is_system_active(&self) -> bool;

    /// An enable is in progress and its completion event has not been sent
    fn is_enable_pending(&self) -> bool;

    /// The device manager is disabling NFC
    fn is_disabling(&self) -> bool;

    /// Current RF discovery state
    fn discovery_state(&self) -> DiscoveryState;

    /// Current discovery flag bits
    fn discovery_flags(&self) -> DiscoveryFlags;

    /// Request activation of the WLC-P non-autonomous RF interface extension
    fn activate_rf_interface_extension(&self);

    /// Send a WPT start to the controller
    ///
    /// The result comes back later as a notification.
    fn start_wireless_power_transfer(&self, power_adjust: u8, wait_time_interval: u8);
}

/// Reader/writer module state the Start guards look at
pub trait ReaderWriter: Send + Sync {
    /// Protocol of the activated endpoint, if any
    fn activated_protocol(&self) -> Option<RfProtocol>;

    /// A reader/writer API call is in progress
    fn is_api_busy(&self) -> bool;
}

/// WLC environment
#[derive(Clone)]
pub struct WlcEnvironment {
    /// Device manager
    pub device_manager: Arc<dyn DeviceManager>,
    /// Reader/writer module
    pub reader_writer: Arc<dyn ReaderWriter>,
}

impl WlcEnvironment {
    /// Creates a new `WlcEnvironment`
    #[must_use]
    pub fn new(device_manager: Arc<dyn DeviceManager>, reader_writer: Arc<dyn ReaderWriter>) -> Self {
        Self {
            device_manager,
            reader_writer,
        }
    }
}

impl fmt::Debug for WlcEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WlcEnvironment").finish_non_exhaustive()
    }
}
