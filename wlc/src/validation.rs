//! Parameter ranges mandated by the WLC protocol.
//!
//! These checks run on the caller's thread before anything is queued.

use crate::types::WlcMode;

/// Largest power adjust request that asks for an increase
pub const POWER_ADJ_REQ_INC_MAX: u8 = 0x14;

/// Smallest power adjust request that asks for a decrease
pub const POWER_ADJ_REQ_DEC_MIN: u8 = 0xF6;

/// Largest WPT duration interval code
pub const WPT_DURATION_INT_MAX: u8 = 0x13;

/// Bits that must be clear in a WPT duration interval code
pub const WPT_DURATION_INT_MASK: u8 = 0xC0;

/// Returns true if `value` is an increase (`0x00..=0x14`) or a decrease
/// (`0xF6..=0xFF`) request
#[must_use]
pub const fn validate_power_adjust(value: u8) -> bool {
    value <= POWER_ADJ_REQ_INC_MAX || value >= POWER_ADJ_REQ_DEC_MIN
}

/// Returns true if `value` is a usable WPT wait time interval
///
/// Both rules are checked: the code must not exceed the maximum and the two
/// reserved high bits must be clear.
#[must_use]
pub const fn validate_wait_interval(value: u8) -> bool {
    value <= WPT_DURATION_INT_MAX && value & WPT_DURATION_INT_MASK == 0
}

/// Returns true for the only supported mode, [`WlcMode::NonAutonomous`]
#[must_use]
pub const fn validate_mode(mode: WlcMode) -> bool {
    matches!(mode, WlcMode::NonAutonomous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn power_adjust_boundaries() {
        assert!(validate_power_adjust(0x00));
        assert!(validate_power_adjust(0x14));
        assert!(!validate_power_adjust(0x15));
        assert!(!validate_power_adjust(0xF5));
        assert!(validate_power_adjust(0xF6));
        assert!(validate_power_adjust(0xFF));
    }

    #[test]
    fn wait_interval_boundaries() {
        assert!(validate_wait_interval(0x00));
        assert!(validate_wait_interval(0x13));
        assert!(!validate_wait_interval(0x14));
        assert!(!validate_wait_interval(0x40));
        assert!(!validate_wait_interval(0x80));
    }

    #[test]
    fn only_non_autonomous_mode_is_valid() {
        assert!(validate_mode(WlcMode::NonAutonomous));
        assert!(!validate_mode(WlcMode::SemiAutonomous));
        assert!(!validate_mode(WlcMode::Autonomous));
    }

    proptest! {
        #[test]
        fn power_adjust_accepts_increase_range(v in 0x00u8..=0x14) {
            prop_assert!(validate_power_adjust(v));
        }

        #[test]
        fn power_adjust_accepts_decrease_range(v in 0xF6u8..=0xFF) {
            prop_assert!(validate_power_adjust(v));
        }

        #[test]
        fn power_adjust_rejects_gap(v in 0x15u8..=0xF5) {
            prop_assert!(!validate_power_adjust(v));
        }

        #[test]
        fn wait_interval_accepts_low_codes(v in 0x00u8..=0x13) {
            prop_assert!(validate_wait_interval(v));
        }

        #[test]
        fn wait_interval_rejects_high_codes(v in 0x14u8..=0xFF) {
            prop_assert!(!validate_wait_interval(v));
        }

        #[test]
        fn wait_interval_rejects_reserved_bits(v in any::<u8>()) {
            if v & WPT_DURATION_INT_MASK != 0 {
                prop_assert!(!validate_wait_interval(v));
            }
        }
    }
}
