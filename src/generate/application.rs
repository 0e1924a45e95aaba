//! A [`Generator`] for web API request logs.
//!
//! See [`ApplicationGenerator`] for more details.

use crate::generate::{pick, round2, timestamp_now, Generator};
use crate::record::LogRecord;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

const ENDPOINTS: &[&str] = &[
    "/api/users",
    "/api/products",
    "/api/orders",
    "/api/cart",
    "/api/auth/login",
    "/api/auth/logout",
    "/healthcheck",
];

/// HTTP methods and their relative weights.
const METHODS: &[(&str, u32)] = &[("GET", 6), ("POST", 3), ("PUT", 2), ("DELETE", 1)];

/// Status codes weighted toward success, the mix a healthy service shows.
const STATUS_CODES: &[(u16, u32)] = &[
    (200, 85),
    (201, 5),
    (400, 3),
    (401, 2),
    (403, 2),
    (404, 2),
    (500, 1),
];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_7_1 like Mac OS X) AppleWebKit/605.1.15",
    "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36",
];

/// Synthesizes request/response records for a fictional `web-api`
/// service: traced requests with weighted methods and status codes,
/// response timings, and error details for the 4xx/5xx tail.
pub struct ApplicationGenerator {
    methods: WeightedIndex<u32>,
    statuses: WeightedIndex<u32>,
}

impl ApplicationGenerator {
    /// Construct a new [`ApplicationGenerator`].
    pub fn new() -> Self {
        ApplicationGenerator {
            methods: WeightedIndex::new(METHODS.iter().map(|&(_, weight)| weight))
                .expect("method weights are positive"),
            statuses: WeightedIndex::new(STATUS_CODES.iter().map(|&(_, weight)| weight))
                .expect("status weights are positive"),
        }
    }
}

impl Default for ApplicationGenerator {
    fn default() -> Self {
        ApplicationGenerator::new()
    }
}

impl Generator for ApplicationGenerator {
    fn log_type(&self) -> &'static str {
        "application"
    }

    fn generate(&mut self) -> LogRecord {
        let mut rng = rand::thread_rng();

        let (method, _) = METHODS[self.methods.sample(&mut rng)];
        let (status, _) = STATUS_CODES[self.statuses.sample(&mut rng)];

        let mut entry = json!({
            "timestamp": timestamp_now(),
            "service": "web-api",
            "level": "INFO",
            "trace_id": Uuid::new_v4().to_string(),
            "request": {
                "method": method,
                "path": *pick(&mut rng, ENDPOINTS),
                "remote_addr": format!(
                    "192.168.{}.{}",
                    rng.gen_range(1..=255),
                    rng.gen_range(1..=255)
                ),
                "user_agent": *pick(&mut rng, USER_AGENTS),
            },
            "response": {
                "status_code": status,
                "response_time_ms": round2(rng.gen_range(10.0..500.0)),
            },
        });

        if status >= 400 {
            entry["level"] = json!("ERROR");
            entry["error"] = json!({
                "code": status.to_string(),
                "message": error_message(status),
            });
        }

        if method == "GET" {
            entry["response"]["size_bytes"] = json!(rng.gen_range(100..=10_000));
        }

        if method == "POST" || method == "PUT" {
            entry["request"]["body_size_bytes"] = json!(rng.gen_range(50..=1_000));
        }

        LogRecord::Structured(entry)
    }
}

fn error_message(status: u16) -> &'static str {
    match status {
        400 => "Bad Request - Invalid parameters",
        401 => "Unauthorized - Missing or invalid authentication",
        403 => "Forbidden - Insufficient permissions",
        404 => "Not Found - Resource does not exist",
        500 => "Internal Server Error - An unexpected error occurred",
        _ => "Unknown error",
    }
}
