//! A [`Generator`] for service error reports.
//!
//! See [`ErrorGenerator`] for more details.

use crate::generate::{pick, timestamp_now, Generator};
use crate::record::LogRecord;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

struct Scenario {
    name: &'static str,
    message: &'static str,
    module: &'static str,
    severity: &'static str,
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "DatabaseConnectionError",
        message: "Failed to connect to database",
        module: "database::connection",
        severity: "CRITICAL",
    },
    Scenario {
        name: "ValidationError",
        message: "Invalid input parameters",
        module: "api::validators",
        severity: "WARNING",
    },
    Scenario {
        name: "AuthenticationError",
        message: "Failed to authenticate user",
        module: "auth::service",
        severity: "ERROR",
    },
    Scenario {
        name: "RateLimitExceeded",
        message: "API rate limit exceeded",
        module: "api::middleware",
        severity: "WARNING",
    },
    Scenario {
        name: "InternalServerError",
        message: "Unexpected server error",
        module: "api::handlers",
        severity: "CRITICAL",
    },
];

/// Synthesizes error reports drawn from a catalog of failure scenarios,
/// each with scenario-specific details, a multi-line stack trace, and
/// deployment context.
pub struct ErrorGenerator {
    #[doc(hidden)]
    _priv: (),
}

impl ErrorGenerator {
    /// Construct a new [`ErrorGenerator`].
    pub const fn new() -> Self {
        ErrorGenerator { _priv: () }
    }
}

impl Default for ErrorGenerator {
    fn default() -> Self {
        ErrorGenerator::new()
    }
}

impl Generator for ErrorGenerator {
    fn log_type(&self) -> &'static str {
        "error"
    }

    fn generate(&mut self) -> LogRecord {
        let mut rng = rand::thread_rng();
        let scenario = pick(&mut rng, SCENARIOS);

        let entry = json!({
            "timestamp": timestamp_now(),
            "service": "web-api",
            "level": scenario.severity,
            "error_id": Uuid::new_v4().to_string(),
            "error": {
                "type": scenario.name,
                "message": scenario.message,
                "module": scenario.module,
                "details": details(&mut rng, scenario),
            },
            "stack_trace": stack_trace(&mut rng, scenario.module),
            "context": {
                "environment": *pick(&mut rng, &["production", "staging"]),
                "version": format!("1.{}.{}", rng.gen_range(0..=9), rng.gen_range(0..=9)),
                "server": format!("app-server-{}", rng.gen_range(1..=5)),
            },
        });

        LogRecord::Structured(entry)
    }
}

fn details(rng: &mut impl Rng, scenario: &Scenario) -> Value {
    match scenario.name {
        "DatabaseConnectionError" => json!({
            "host": "db-master-01",
            "port": 5432,
            "timeout": 30,
        }),
        "ValidationError" => json!({
            "field": *pick(rng, &["email", "phone", "address", "user_id"]),
            "reason": "Invalid format",
        }),
        "AuthenticationError" => json!({
            "mechanism": "JWT",
            "reason": "Token expired",
        }),
        "RateLimitExceeded" => json!({
            "limit": 100,
            "period": "1m",
        }),
        _ => json!({
            "server": format!("app-{}", rng.gen_range(1..=5)),
            "process_id": rng.gen_range(1000..=9999),
        }),
    }
}

/// A three-frame backtrace through the failing module, numbered the way
/// runtime backtraces print.
fn stack_trace(rng: &mut impl Rng, module: &str) -> String {
    let file = module.replace("::", "/");
    let frames = ["handle_request", "process_request", "validate_input"];

    let mut lines = Vec::with_capacity(frames.len() * 2);
    for (depth, frame) in frames.iter().enumerate() {
        lines.push(format!("{:4}: web_api::{}::{}", depth, module, frame));
        lines.push(format!(
            "          at src/{}.rs:{}",
            file,
            rng.gen_range(1..=500)
        ));
    }
    lines.join("\n")
}
