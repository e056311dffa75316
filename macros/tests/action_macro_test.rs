//! Tests for #[derive(Action)] macro

use nfa_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum TagAction {
    #[request]
    Read { block: u8 },

    #[request]
    Halt,

    #[notification]
    ReadResult(Vec<u8>),

    #[notification]
    Removed,

    Reset,
}

#[test]
fn test_is_request() {
    let action = TagAction::Read { block: 4 };
    assert!(action.is_request());
    assert!(!action.is_notification());
    assert!(TagAction::Halt.is_request());
}

#[test]
fn test_is_notification() {
    let action = TagAction::ReadResult(vec![0x01, 0x02]);
    assert!(!action.is_request());
    assert!(action.is_notification());
    assert!(TagAction::Removed.is_notification());
}

#[test]
fn test_unmarked_variant_is_neither() {
    assert!(!TagAction::Reset.is_request());
    assert!(!TagAction::Reset.is_notification());
}

#[test]
fn test_name_covers_every_variant() {
    assert_eq!(TagAction::Read { block: 0 }.name(), "Read");
    assert_eq!(TagAction::Halt.name(), "Halt");
    assert_eq!(TagAction::ReadResult(Vec::new()).name(), "ReadResult");
    assert_eq!(TagAction::Removed.name(), "Removed");
    assert_eq!(TagAction::Reset.name(), "Reset");
}
