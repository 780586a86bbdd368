//! Metrics collection.
//!
//! # Metrics
//! - `hostpool_idle_armed_total` (counter): idle timers armed
//! - `hostpool_idle_cancel_total` (counter): cancellations by outcome
//! - `hostpool_idle_expired_total` (counter): connections handed to the collector
//! - `hostpool_release_total` (counter): releases by outcome
//! - `hostpool_release_score` (histogram): scores forwarded to hosts
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application
//!   installs the exporter
//! - Without a recorder every call is a no-op

pub fn record_idle_armed() {
    metrics::counter!("hostpool_idle_armed_total").increment(1);
}

pub fn record_idle_cancel(outcome: &'static str) {
    metrics::counter!("hostpool_idle_cancel_total", "outcome" => outcome).increment(1);
}

pub fn record_idle_expired() {
    metrics::counter!("hostpool_idle_expired_total").increment(1);
}

pub fn record_release(outcome: &'static str, score: Option<f64>) {
    metrics::counter!("hostpool_release_total", "outcome" => outcome).increment(1);
    if let Some(score) = score {
        metrics::histogram!("hostpool_release_score").record(score);
    }
}
