//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec, Encoder,
    HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records a sign-in attempt with its outcome.
    fn record_sign_in_attempt(&self, result: &str);

    /// Records the duration of a sign-in request.
    fn record_sign_in_duration(&self, duration_secs: f64, result: &str);

    /// Records a gate decision.
    fn record_gate_decision(&self, decision: &str);

    /// Records a profile lookup with its outcome.
    fn record_profile_lookup(&self, result: &str);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    sign_in_attempts_total: CounterVec,
    sign_in_duration_seconds: HistogramVec,

    gate_decisions_total: CounterVec,
    profile_lookups_total: CounterVec,
}

impl Metrics {
    /// Creates a new metrics instance with a Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let sign_in_attempts_total = register_counter_vec_with_registry!(
            Opts::new("sign_in_attempts_total", "Total number of sign-in attempts"),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register sign_in_attempts_total");

        let sign_in_duration_seconds = register_histogram_vec_with_registry!(
            "sign_in_duration_seconds",
            "Sign-in request duration in seconds",
            &["result"],
            vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0
            ],
            registry.clone()
        )
        .expect("Failed to register sign_in_duration_seconds");

        let gate_decisions_total = register_counter_vec_with_registry!(
            Opts::new("gate_decisions_total", "Total gate decisions by outcome"),
            &["decision"],
            registry.clone()
        )
        .expect("Failed to register gate_decisions_total");

        let profile_lookups_total = register_counter_vec_with_registry!(
            Opts::new("profile_lookups_total", "Total profile lookups by outcome"),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register profile_lookups_total");

        Metrics {
            registry,
            sign_in_attempts_total,
            sign_in_duration_seconds,
            gate_decisions_total,
            profile_lookups_total,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("Failed to encode metrics");
        String::from_utf8(buffer).expect("Metrics encoding produced invalid UTF-8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_sign_in_attempt(&self, result: &str) {
        self.sign_in_attempts_total
            .with_label_values(&[result])
            .inc();
    }

    fn record_sign_in_duration(&self, duration_secs: f64, result: &str) {
        self.sign_in_duration_seconds
            .with_label_values(&[result])
            .observe(duration_secs);
    }

    fn record_gate_decision(&self, decision: &str) {
        self.gate_decisions_total
            .with_label_values(&[decision])
            .inc();
    }

    fn record_profile_lookup(&self, result: &str) {
        self.profile_lookups_total
            .with_label_values(&[result])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recorded metrics show up in the rendered exposition.
    #[test]
    fn test_recorded_metrics_render() {
        let metrics = Metrics::new();
        metrics.record_sign_in_attempt("success");
        metrics.record_gate_decision("render");
        metrics.record_profile_lookup("failure");

        let rendered = metrics.render();
        assert!(rendered.contains("sign_in_attempts_total"));
        assert!(rendered.contains("gate_decisions_total"));
        assert!(rendered.contains("profile_lookups_total"));
    }
}
