//! # NFA Wireless Charging
//!
//! Wireless Charging (WLC) control module of the NFC application layer.
//!
//! The module arbitrates requests to start a Wireless Power Transfer session
//! over an active NFC RF link. Requests are validated on the caller's thread,
//! queued to a single worker that owns the control block, re-checked there
//! against the state of the device manager and reader/writer modules, and
//! answered through a caller-supplied result sink.
//!
//! ## Example
//!
//! ```ignore
//! use nfa_wlc::{ResultSink, WlcConfig, WlcEnvironment, WlcMode, WlcModule};
//!
//! let module = WlcModule::init(env, registry, &WlcConfig::from_env())?;
//! let api = module.api();
//!
//! let (sink, mut events) = ResultSink::channel();
//! api.enable(sink)?;
//! api.start(WlcMode::NonAutonomous)?;
//! api.start_wpt(0x10, 0x05)?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! ```

pub mod actions;
pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod module;
pub mod notifier;
pub mod reducer;
pub mod state;
pub mod types;
pub mod validation;

pub use actions::WlcAction;
pub use api::{WlcApi, WlcNotifier};
pub use config::WlcConfig;
pub use environment::{DeviceManager, DiscoveryFlags, DiscoveryState, ReaderWriter, RfProtocol, WlcEnvironment};
pub use error::{InvalidParam, WlcError};
pub use module::WlcModule;
pub use notifier::ResultSink;
pub use reducer::WlcReducer;
pub use state::{DisableSignal, WlcFlags, WlcState};
pub use types::{EventData, Status, WlcEvent, WlcMode};
