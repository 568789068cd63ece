//! Metrics instrumentation for the gateway session.
//!
//! Uses the `metrics` facade; installing an exporter is the
//! application's job.

use metrics::{counter, gauge};

/// Metric names.
pub mod names {
    pub const FRAMES_TOTAL: &str = "riptide_frames_total";
    pub const EVENTS_DISPATCHED_TOTAL: &str = "riptide_events_dispatched_total";
    pub const HANDLER_FAULTS_TOTAL: &str = "riptide_handler_faults_total";
    pub const HANDLERS_ACTIVE: &str = "riptide_handlers_active";
    pub const HEARTBEATS_TOTAL: &str = "riptide_heartbeats_total";
    pub const RECONNECTS_TOTAL: &str = "riptide_reconnects_total";
    pub const RATE_LIMITED_TOTAL: &str = "riptide_rate_limited_total";
    pub const FRAMES_DROPPED_TOTAL: &str = "riptide_frames_dropped_total";
}

/// Describe all metrics. Call once at startup if descriptions matter to
/// the installed exporter.
pub fn init_metrics() {
    metrics::describe_counter!(names::FRAMES_TOTAL, "Inbound frames read from the gateway");
    metrics::describe_counter!(
        names::EVENTS_DISPATCHED_TOTAL,
        "Payloads routed through the dispatcher"
    );
    metrics::describe_counter!(
        names::HANDLER_FAULTS_TOTAL,
        "Handler invocations recovered after a panic"
    );
    metrics::describe_gauge!(names::HANDLERS_ACTIVE, "Currently registered handlers");
    metrics::describe_counter!(names::HEARTBEATS_TOTAL, "Heartbeats sent");
    metrics::describe_counter!(names::RECONNECTS_TOTAL, "Successful reconnections");
    metrics::describe_counter!(
        names::RATE_LIMITED_TOTAL,
        "Outbound operations refused by a token gate"
    );
    metrics::describe_counter!(
        names::FRAMES_DROPPED_TOTAL,
        "Frames dropped as malformed or undecodable"
    );
}

/// Record an inbound frame.
pub fn record_frame() {
    counter!(names::FRAMES_TOTAL).increment(1);
}

/// Record a dispatched payload.
pub fn record_dispatch(kind: &str) {
    counter!(names::EVENTS_DISPATCHED_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Record a recovered handler fault.
pub fn record_handler_fault() {
    counter!(names::HANDLER_FAULTS_TOTAL).increment(1);
}

/// Update the registered-handler gauge.
pub fn set_active_handlers(count: usize) {
    gauge!(names::HANDLERS_ACTIVE).set(count as f64);
}

/// Record a sent heartbeat.
pub fn record_heartbeat() {
    counter!(names::HEARTBEATS_TOTAL).increment(1);
}

/// Record a successful reconnection.
pub fn record_reconnect() {
    counter!(names::RECONNECTS_TOTAL).increment(1);
}

/// Record a token-gate refusal.
pub fn record_rate_limited(bucket: &str) {
    counter!(names::RATE_LIMITED_TOTAL, "bucket" => bucket.to_string()).increment(1);
}

/// Record a dropped frame.
pub fn record_dropped_frame(reason: &'static str) {
    counter!(names::FRAMES_DROPPED_TOTAL, "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_does_not_panic_without_exporter() {
        init_metrics();
        record_frame();
        record_dispatch("MESSAGE_CREATE");
        record_handler_fault();
        set_active_handlers(3);
        record_heartbeat();
        record_reconnect();
        record_rate_limited("identify");
        record_dropped_frame("malformed");
    }
}
