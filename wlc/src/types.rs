//! Modes, status codes and the events delivered to a result sink.

use crate::error::InvalidParam;
use std::fmt;

/// WLC operating mode
///
/// Only [`WlcMode::NonAutonomous`] is accepted by the module; the other modes
/// exist so callers can name them and be told they are unsupported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WlcMode {
    /// The host drives every WLC protocol step
    #[default]
    NonAutonomous = 0,
    /// The controller runs part of the protocol on its own
    SemiAutonomous = 1,
    /// The controller runs the whole protocol on its own
    Autonomous = 2,
}

impl TryFrom<u8> for WlcMode {
    type Error = InvalidParam;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NonAutonomous),
            1 => Ok(Self::SemiAutonomous),
            2 => Ok(Self::Autonomous),
            other => Err(InvalidParam::UnknownMode(other)),
        }
    }
}

impl From<WlcMode> for u8 {
    fn from(mode: WlcMode) -> Self {
        mode as Self
    }
}

/// NFA status code carried by result events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Request succeeded
    Ok = 0x00,
    /// Request failed
    Failed = 0x03,
    /// A parameter was out of range
    InvalidParam = 0x09,
}

impl Status {
    /// Numeric NFA status value
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for [`Status::Ok`]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Failed => "FAILED",
            Self::InvalidParam => "INVALID_PARAM",
        };
        write!(f, "{name} ({:#04x})", self.code())
    }
}

/// Payload of a [`WlcEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventData {
    /// Result status of a request
    Status(Status),
    /// Reason a WPT cycle ended, as reported by the controller
    EndCondition(u8),
}

/// Events delivered to the caller's result sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WlcEvent {
    /// Outcome of an Enable request
    EnableResult(Status),
    /// Outcome of a Start request
    StartResult(Status),
    /// Outcome of starting a WPT cycle
    StartWptResult(Status),
    /// A WPT cycle has ended
    ChargingResult(u8),
}

impl WlcEvent {
    /// Event payload
    #[must_use]
    pub const fn data(&self) -> EventData {
        match *self {
            Self::EnableResult(status)
            | Self::StartResult(status)
            | Self::StartWptResult(status) => EventData::Status(status),
            Self::ChargingResult(end_condition) => EventData::EndCondition(end_condition),
        }
    }

    /// Event name, for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EnableResult(_) => "ENABLE_RESULT",
            Self::StartResult(_) => "START_RESULT",
            Self::StartWptResult(_) => "START_WPT_RESULT",
            Self::ChargingResult(_) => "CHARGING_RESULT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_bytes_parse() {
        assert_eq!(WlcMode::try_from(0), Ok(WlcMode::NonAutonomous));
        assert_eq!(WlcMode::try_from(2), Ok(WlcMode::Autonomous));
        assert_eq!(WlcMode::try_from(3), Err(InvalidParam::UnknownMode(3)));
        assert_eq!(u8::from(WlcMode::SemiAutonomous), 1);
    }

    #[test]
    fn status_codes_match_nfa_values() {
        assert_eq!(Status::Ok.code(), 0x00);
        assert_eq!(Status::Failed.code(), 0x03);
        assert_eq!(Status::InvalidParam.code(), 0x09);
        assert_eq!(Status::Failed.to_string(), "FAILED (0x03)");
    }

    #[test]
    fn charging_result_carries_end_condition() {
        assert_eq!(
            WlcEvent::ChargingResult(0x02).data(),
            EventData::EndCondition(0x02)
        );
        assert_eq!(
            WlcEvent::StartResult(Status::Ok).data(),
            EventData::Status(Status::Ok)
        );
    }
}
