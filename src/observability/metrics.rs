//! Metrics collection.
//!
//! # Metrics
//! - `console_requests_total` (counter): calls by method and outcome
//! - `console_request_duration_seconds` (histogram): end-to-end call latency, replay included
//! - `console_failures_total` (counter): classified failures by category
//! - `console_token_refresh_total` (counter): refresh attempts by outcome
//! - `console_notifications_total` (counter): toasts and modals, shown or suppressed

use std::time::Instant;

/// Record one finished call.
pub fn record_request(method: &str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "console_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("console_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_failure(category: &'static str) {
    metrics::counter!("console_failures_total", "category" => category).increment(1);
}

pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("console_token_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_notification(kind: &'static str, outcome: &'static str) {
    metrics::counter!(
        "console_notifications_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}
