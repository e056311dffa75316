//! WLC control block.

use crate::notifier::ResultSink;
use crate::types::WlcMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// WLC control block flag bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WlcFlags(u8);

impl WlcFlags {
    /// A session was started in non-autonomous mode and not yet stopped
    pub const NON_AUTO_MODE_ENABLED: Self = Self(0x01);
    /// A WPT cycle is in flight; its completion notification is expected
    pub const WPT_NOTIFICATION_PENDING: Self = Self(0x02);

    /// No flags set
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every flag of `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no flag is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set the flags of `other`
    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the flags of `other`
    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

/// WLC control block, owned by the store worker
///
/// `Default` is the control block right after module init.
#[derive(Debug, Clone, Default)]
pub struct WlcState {
    /// Session flags
    pub flags: WlcFlags,
    /// Last accepted mode; meaningful only while
    /// [`WlcFlags::NON_AUTO_MODE_ENABLED`] is set
    pub mode: WlcMode,
    /// Where events go; set by a successful Enable
    pub sink: Option<ResultSink>,
    /// The module has been disabled; requests are dropped
    pub disabled: bool,
}

impl WlcState {
    /// Non-autonomous session running
    #[must_use]
    pub const fn is_non_auto_mode_enabled(&self) -> bool {
        self.flags.contains(WlcFlags::NON_AUTO_MODE_ENABLED)
    }

    /// WPT completion notification expected
    #[must_use]
    pub const fn is_wpt_notification_pending(&self) -> bool {
        self.flags.contains(WlcFlags::WPT_NOTIFICATION_PENDING)
    }

    /// A result sink is stored
    #[must_use]
    pub const fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Back to the uninitialized control block
    pub fn reset(&mut self) {
        *self = Self {
            disabled: true,
            ..Self::default()
        };
    }
}

/// Disable request shared between the module handles and the worker
///
/// Raising it never waits on the queue. The worker checks it before every
/// action and resets the control block the first time it sees it raised, so a
/// disable takes effect even when its `Disable` message could not be queued.
#[derive(Debug, Clone, Default)]
pub struct DisableSignal(Arc<AtomicBool>);

impl DisableSignal {
    /// A signal that has not been raised
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the disable. Idempotent.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once [`DisableSignal::raise`] has been called on any clone
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
