//! WLC demo
//!
//! Runs one charging session against the in-memory device manager and
//! reader/writer: enable, start, one WPT cycle, then system-wide disable.
//!
//! ```sh
//! RUST_LOG=nfa_wlc=trace cargo run --bin wlc-demo
//! NFA_WLC_CONFIG=wlc.json cargo run --bin wlc-demo
//! ```

use anyhow::Context;
use nfa_runtime::ModuleRegistry;
use nfa_wlc::mocks::{MockDeviceManager, MockReaderWriter};
use nfa_wlc::{ResultSink, Status, WlcConfig, WlcEnvironment, WlcEvent, WlcMode, WlcModule};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nfa_wlc=debug,nfa_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    nfa_runtime::metrics::register_metrics();

    let config = load_config()?;
    tracing::info!(?config, "Starting WLC demo");

    let registry = Arc::new(ModuleRegistry::new());
    let device_manager = Arc::new(MockDeviceManager::new());
    let env = WlcEnvironment::new(device_manager.clone(), Arc::new(MockReaderWriter::new()));

    let module = WlcModule::init(env, registry.clone(), &config)?;
    let api = module.api();
    let notifier = module.notifier();

    let (sink, mut events) = ResultSink::channel();
    api.enable(sink)?;
    expect_event(&mut events, WlcEvent::EnableResult(Status::Ok)).await?;

    api.start(WlcMode::NonAutonomous)?;
    expect_event(&mut events, WlcEvent::StartResult(Status::Ok)).await?;

    // Out of range, refused before anything is queued
    if let Err(error) = api.start_wpt(0x50, 0x05) {
        tracing::info!(%error, status = %error.status(), "Refused as expected");
    }

    api.start_wpt(0x10, 0x05)?;
    let _ = module.inspect(|_| ()).await?;
    tracing::info!(requests = ?device_manager.wpt_requests(), "Controller received WPT start");

    // Play the controller's side of the cycle
    notifier.wpt_start_result(Status::Ok)?;
    expect_event(&mut events, WlcEvent::StartWptResult(Status::Ok)).await?;
    notifier.charging_result(0x00)?;
    expect_event(&mut events, WlcEvent::ChargingResult(0x00)).await?;

    registry.disable_all();
    let flags = module.inspect(|state| state.flags).await?;
    tracing::info!(flags = flags.bits(), "Control block after disable");

    module.shutdown().await?;
    tracing::info!("WLC demo complete");
    Ok(())
}

/// JSON file named by `NFA_WLC_CONFIG`, otherwise the environment
fn load_config() -> anyhow::Result<WlcConfig> {
    let Ok(path) = std::env::var("NFA_WLC_CONFIG") else {
        return Ok(WlcConfig::from_env());
    };

    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    WlcConfig::from_json(&json).with_context(|| format!("parsing {path}"))
}

async fn expect_event(
    events: &mut tokio::sync::mpsc::UnboundedReceiver<WlcEvent>,
    expected: WlcEvent,
) -> anyhow::Result<()> {
    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .with_context(|| format!("timed out waiting for {}", expected.name()))?
        .context("result sink closed")?;

    tracing::info!(event = event.name(), data = ?event.data(), "Event received");
    anyhow::ensure!(event == expected, "expected {expected:?}, got {event:?}");
    Ok(())
}
