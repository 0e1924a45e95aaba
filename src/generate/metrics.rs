//! A [`Generator`] for host metric snapshots.
//!
//! See [`MetricsGenerator`] for more details.

use crate::generate::{pick, round2, timestamp_now, Generator};
use crate::record::LogRecord;
use rand::Rng;
use serde_json::{json, Map, Value};

/// Metric baselines and units; sampled values drift around the baseline.
const BASELINES: &[(&str, f64, &str)] = &[
    ("cpu_usage", 30.0, "%"),
    ("memory_usage", 45.0, "%"),
    ("disk_usage", 60.0, "%"),
    ("network_in", 1000.0, "Mbps"),
    ("network_out", 800.0, "Mbps"),
    ("response_time", 100.0, "ms"),
];

fn threshold(metric: &str) -> Option<i64> {
    match metric {
        "cpu_usage" => Some(80),
        "memory_usage" => Some(90),
        "disk_usage" => Some(85),
        "response_time" => Some(200),
        _ => None,
    }
}

/// Synthesizes per-host metric snapshots: gauge values that drift on a
/// sine wave around their baselines, threshold annotations for the
/// metrics that run hot, and an aggregated health summary.
pub struct MetricsGenerator {
    /// Advances once per sampled value, so consecutive snapshots drift
    /// smoothly instead of jumping.
    counter: u64,
}

impl MetricsGenerator {
    /// Construct a new [`MetricsGenerator`].
    pub const fn new() -> Self {
        MetricsGenerator { counter: 0 }
    }

    fn sample(&mut self, rng: &mut impl Rng, baseline: f64) -> f64 {
        self.counter += 1;

        let wave = (self.counter as f64 / 10.0).sin() * 10.0;
        let noise = rng.gen_range(-5.0..5.0);

        round2((baseline + wave + noise).max(0.0))
    }
}

impl Default for MetricsGenerator {
    fn default() -> Self {
        MetricsGenerator::new()
    }
}

impl Generator for MetricsGenerator {
    fn log_type(&self) -> &'static str {
        "metrics"
    }

    fn generate(&mut self) -> LogRecord {
        let mut rng = rand::thread_rng();

        let host = format!("host-{}", rng.gen_range(1..=3));
        let service = *pick(&mut rng, &["web-api", "auth-service", "database", "cache"]);

        let mut sampled = Vec::with_capacity(BASELINES.len());
        for &(metric, baseline, unit) in BASELINES {
            sampled.push((metric, self.sample(&mut rng, baseline), unit));
        }

        let mut metrics = Map::new();
        for &(metric, value, unit) in &sampled {
            let mut data = Map::new();
            data.insert("value".to_owned(), json!(value));
            data.insert("unit".to_owned(), json!(unit));

            if let Some(limit) = threshold(metric) {
                if value > limit as f64 {
                    data.insert("threshold_exceeded".to_owned(), json!(true));
                    data.insert("threshold".to_owned(), json!(limit));
                }
            }

            metrics.insert(metric.to_owned(), Value::Object(data));
        }

        let value_of = |metric: &str| {
            sampled
                .iter()
                .find(|&&(name, _, _)| name == metric)
                .map(|&(_, value, _)| value)
                .unwrap_or(0.0)
        };

        let health_score = round2(
            100.0
                - (value_of("cpu_usage") * 0.3
                    + value_of("memory_usage") * 0.3
                    + value_of("disk_usage") * 0.4),
        );

        let entry = json!({
            "timestamp": timestamp_now(),
            "type": "metric",
            "host": host,
            "service": service,
            "metrics": metrics,
            "summary": {
                "health_score": health_score,
                "total_network_throughput": value_of("network_in") + value_of("network_out"),
            },
        });

        LogRecord::Structured(entry)
    }
}
