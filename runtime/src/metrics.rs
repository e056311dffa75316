//! Metric descriptions for the runtime and the modules it hosts.
//!
//! Recording goes through the `metrics` facade; without an installed recorder
//! every counter is a no-op. Call [`register_metrics`] once after installing a
//! recorder so exporters can show units and help text.

use ::metrics::{describe_counter, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use ::metrics::{counter, gauge, histogram};

/// Register descriptions for every metric emitted by this workspace
pub fn register_metrics() {
    describe_counter!(
        "store.actions.total",
        Unit::Count,
        "Actions processed by store workers"
    );
    describe_counter!(
        "store.queue.rejected",
        Unit::Count,
        "Actions refused at enqueue (queue full or shutting down)"
    );
    describe_counter!(
        "store.effects.executed",
        Unit::Count,
        "Effects executed by store workers, by type"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        Unit::Seconds,
        "Time spent inside reducers"
    );
    describe_counter!(
        "wlc.requests.rejected",
        Unit::Count,
        "WLC API calls rejected before reaching the queue"
    );
    describe_counter!(
        "wlc.start.guard_failed",
        Unit::Count,
        "WLC start requests refused by a live-state guard"
    );
    describe_counter!(
        "wlc.requests.dropped",
        Unit::Count,
        "WLC actions dropped on the worker because the module is disabled"
    );
    describe_counter!(
        "wlc.disable.deferred",
        Unit::Count,
        "WLC disables that had to wait for a free queue slot"
    );
    describe_counter!(
        "wlc.events.delivered",
        Unit::Count,
        "WLC events handed to a result sink"
    );
}
