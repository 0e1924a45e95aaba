use chrono::{TimeZone, Utc};
use logsynth::formatter::{
    display_value, normalize_query, FormatError, Formatter, JsonFormatter, MultilineFormatter,
    TextFormatter,
};
use logsynth::record::{ExceptionInfo, LogEvent, LogRecord};
use serde_json::{json, Value};
use std::error::Error;
use tracing::Level;

fn fixed_event() -> LogEvent {
    LogEvent::new(Level::INFO, "web-api", "hello there")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
}

#[test]
fn test_minimal_fields_defaulted() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({ "service": "web-api" }));
    let line = JsonFormatter::new().format(&record)?;

    let parsed: Value = serde_json::from_str(&line)?;
    assert_eq!(parsed["timestamp"], Value::Null);
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["message"], "");
    assert_eq!(parsed["service"], "web-api");
    Ok(())
}

#[test]
fn test_guaranteed_fields_lead_output() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({ "service": "web-api" }));
    let line = JsonFormatter::new().format(&record)?;

    assert_eq!(
        line,
        r#"{"timestamp":null,"level":"INFO","message":"","service":"web-api"}"#,
    );
    Ok(())
}

#[test]
fn test_existing_fields_preserved() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "timestamp": "2024-01-15T10:30:00Z",
        "level": "WARN",
        "message": "careful now",
        "attempt": 3,
    }));
    let line = JsonFormatter::new().format(&record)?;

    let parsed: Value = serde_json::from_str(&line)?;
    assert_eq!(parsed["timestamp"], "2024-01-15T10:30:00Z");
    assert_eq!(parsed["level"], "WARN");
    assert_eq!(parsed["message"], "careful now");
    assert_eq!(parsed["attempt"], 3);
    assert_eq!(parsed.as_object().map(|entries| entries.len()), Some(4));
    Ok(())
}

#[test]
fn test_json_round_trip() -> Result<(), Box<dyn Error>> {
    let payload = json!({
        "timestamp": "2024-01-15T10:30:00Z",
        "level": "INFO",
        "message": "",
        "request": { "method": "GET", "path": "/api/users" },
        "response": { "status_code": 200, "response_time_ms": 42.1 },
        "tags": ["canary", "eu-west"],
    });
    let record = LogRecord::Structured(payload.clone());
    let line = JsonFormatter::new().format(&record)?;

    let parsed: Value = serde_json::from_str(&line)?;
    assert_eq!(parsed, payload);
    Ok(())
}

#[test]
fn test_non_mapping_payloads_rejected() {
    let formatters: [&dyn Formatter; 3] = [
        &JsonFormatter::new(),
        &TextFormatter::new(),
        &MultilineFormatter::new(),
    ];

    for formatter in formatters {
        for payload in [json!(["not", "a", "mapping"]), json!("plain"), json!(42)] {
            let result = formatter.format(&LogRecord::Structured(payload.clone()));
            assert!(matches!(
                result,
                Err(FormatError::UnsupportedRecord { .. })
            ));
        }
    }
}

#[test]
fn test_validate_accepts_both_shapes() {
    let formatter = JsonFormatter::new();

    let mapping = LogRecord::Structured(json!({ "level": "INFO" }));
    assert!(formatter.validate(&mapping).is_ok());

    let event = LogRecord::Event(fixed_event());
    assert!(formatter.validate(&event).is_ok());

    let sequence = LogRecord::Structured(json!([1, 2, 3]));
    assert!(formatter.validate(&sequence).is_err());
}

#[test]
fn test_json_event_canonical_fields() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Event(fixed_event());
    let line = JsonFormatter::new().format(&record)?;

    let parsed: Value = serde_json::from_str(&line)?;
    let entries = parsed.as_object().ok_or("expected a JSON object")?;

    let fields: Vec<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(fields, ["timestamp", "level", "name", "message"]);
    assert_eq!(parsed["timestamp"], "2024-01-15T10:30:00+00:00");
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["name"], "web-api");
    assert_eq!(parsed["message"], "hello there");
    Ok(())
}

#[test]
fn test_json_event_exception_and_stack() -> Result<(), Box<dyn Error>> {
    let exception = ExceptionInfo::new("ValueError", "bad input")
        .with_traceback("   0: web_api::validate\n          at src/validate.rs:10");
    let event = fixed_event()
        .with_exception(exception)
        .with_stack("frame one\nframe two");

    let line = JsonFormatter::new().format(&LogRecord::Event(event))?;
    let parsed: Value = serde_json::from_str(&line)?;

    assert_eq!(
        parsed["exception"],
        "   0: web_api::validate\n          at src/validate.rs:10\nValueError: bad input",
    );
    assert_eq!(parsed["stack_info"], "frame one\nframe two");
    Ok(())
}

#[test]
fn test_json_event_extras_override_canonical() -> Result<(), Box<dyn Error>> {
    let event = fixed_event()
        .with_extra("level", json!("AUDIT"))
        .with_extra("request_id", json!("req-1138"));

    let line = JsonFormatter::new().format(&LogRecord::Event(event))?;
    let parsed: Value = serde_json::from_str(&line)?;

    assert_eq!(parsed["level"], "AUDIT");
    assert_eq!(parsed["request_id"], "req-1138");
    assert_eq!(parsed.as_object().map(|entries| entries.len()), Some(5));
    Ok(())
}

#[test]
fn test_json_indent_matches_compact() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "level": "INFO",
        "request": { "method": "GET" },
    }));

    let compact = JsonFormatter::new().format(&record)?;
    let indented = JsonFormatter::new().with_indent(2).format(&record)?;

    assert!(!compact.contains('\n'));
    assert!(indented.contains("\n  \"level\""));

    let from_compact: Value = serde_json::from_str(&compact)?;
    let from_indented: Value = serde_json::from_str(&indented)?;
    assert_eq!(from_compact, from_indented);
    Ok(())
}

#[test]
fn test_json_escape_non_ascii() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({ "message": "héllo 🦀" }));

    let passthrough = JsonFormatter::new().format(&record)?;
    assert!(passthrough.contains("héllo 🦀"));

    let escaped = JsonFormatter::new().escape_non_ascii(true).format(&record)?;
    assert!(escaped.is_ascii());
    assert!(escaped.contains(r"h\u00e9llo"));
    // The crab is outside the basic plane and escapes to a surrogate pair.
    assert!(escaped.contains(r"\ud83e\udd80"));

    // Escaping is lossless once the document is parsed back.
    let parsed: Value = serde_json::from_str(&escaped)?;
    assert_eq!(parsed["message"], "héllo 🦀");
    Ok(())
}

#[test]
fn test_text_request_line() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "timestamp": "2024-01-15T10:30:00Z",
        "level": "INFO",
        "service": "web-api",
        "request": { "method": "GET", "path": "/api/users" },
        "response": { "status_code": 200, "response_time_ms": 42.1 },
    }));

    let output = TextFormatter::new().format(&record)?;
    assert_eq!(
        output,
        "[2024-01-15T10:30:00Z] | INFO | Service: web-api | \
         Request: GET /api/users | Status: 200 Time: 42.1ms",
    );
    Ok(())
}

#[test]
fn test_text_error_with_stack_trace() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "level": "ERROR",
        "error": { "type": "Boom", "message": "bad" },
        "stack_trace": "line1\nline2",
    }));

    let output = TextFormatter::new().format(&record)?;
    assert_eq!(
        output,
        "[null] | ERROR | Error: Boom - bad\n\nStack trace:\nline1\nline2",
    );

    // The summary stays on the first line; the trace hangs below it.
    let summary = output.lines().next().ok_or("expected output")?;
    assert!(summary.contains("ERROR | Error: Boom - bad"));
    assert!(output.ends_with("\nStack trace:\nline1\nline2"));
    Ok(())
}

#[test]
fn test_text_segment_order() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "timestamp": "t",
        "level": "ERROR",
        "service": "web-api",
        "request": { "method": "POST", "path": "/api/orders" },
        "response": { "status_code": 500, "response_time_ms": 77.0 },
        "error": { "type": "InternalServerError", "message": "boom" },
    }));

    let output = TextFormatter::new().format(&record)?;
    let service = output.find("Service:").ok_or("missing service")?;
    let request = output.find("Request:").ok_or("missing request")?;
    let status = output.find("Status:").ok_or("missing status")?;
    let error = output.find("Error:").ok_or("missing error")?;

    assert!(service < request);
    assert!(request < status);
    assert!(status < error);
    Ok(())
}

#[test]
fn test_text_metrics_block() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "timestamp": "t",
        "level": "INFO",
        "host": "host-1",
        "metrics": {
            "cpu_usage": {
                "value": 92.5,
                "unit": "%",
                "threshold_exceeded": true,
                "threshold": 80,
            },
            "network_in": { "value": 1000.0, "unit": "Mbps" },
        },
        "summary": { "health_score": 42.1 },
    }));

    let output = TextFormatter::new().format(&record)?;
    assert_eq!(
        output,
        "[t] | INFO | Host: host-1 | \
         Metrics: cpu_usage: 92.5% (Exceeded threshold: 80), network_in: 1000.0Mbps | \
         Summary: health_score: 42.1",
    );
    Ok(())
}

#[test]
fn test_text_graphql_block() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({
        "timestamp": "t",
        "level": "INFO",
        "service": "graphql-api",
        "operation_type": "query",
        "operation_name": "GetUser",
        "execution_time_ms": 123.45,
        "status": "SUCCESS",
        "query": "query GetUser {\n  id\n}",
    }));

    let output = TextFormatter::new().format(&record)?;
    assert_eq!(
        output,
        "[t] | INFO | Service: graphql-api | GraphQL query: GetUser | \
         Execution time: 123.45ms | Status: SUCCESS\n\
         \nQuery:\nquery GetUser {\n  id\n}",
    );
    Ok(())
}

#[test]
fn test_text_graphql_error_segments() -> Result<(), Box<dyn Error>> {
    // An error on a GraphQL record feeds both the generic error segment
    // and the GraphQL one.
    let record = LogRecord::Structured(json!({
        "operation_type": "query",
        "operation_name": "GetUser",
        "status": "EXECUTION_ERROR",
        "error": { "message": "Error during query", "code": "INTERNAL" },
    }));

    let output = TextFormatter::new().format(&record)?;
    assert!(output.contains("Error: Unknown - Error during query"));
    assert!(output.contains("| Error: Error during query"));
    Ok(())
}

#[test]
fn test_text_event_line() -> Result<(), Box<dyn Error>> {
    let output = TextFormatter::new().format(&LogRecord::Event(fixed_event()))?;
    assert_eq!(output, "[2024-01-15T10:30:00+00:00] INFO: hello there");
    Ok(())
}

#[test]
fn test_text_event_exception_and_stack() -> Result<(), Box<dyn Error>> {
    let event = fixed_event()
        .with_exception(ExceptionInfo::new("ValueError", "bad input"))
        .with_stack("frame one\nframe two");

    let output = TextFormatter::new().format(&LogRecord::Event(event))?;
    assert_eq!(
        output,
        "[2024-01-15T10:30:00+00:00] INFO: hello there\n\
         Exception: ValueError: bad input\n\
         Stack trace: frame one\nframe two",
    );
    Ok(())
}

#[test]
fn test_multiline_sentinels() -> Result<(), Box<dyn Error>> {
    let payload = json!({ "service": "web-api", "level": "INFO" });
    let record = LogRecord::Structured(payload.clone());

    let output = MultilineFormatter::new().format(&record)?;
    assert!(output.starts_with("BEGIN_LOG\n"));
    assert!(output.ends_with("\nEND_LOG"));

    let body = &output["BEGIN_LOG\n".len()..output.len() - "\nEND_LOG".len()];
    let parsed: Value = serde_json::from_str(body)?;

    // The mapping is fenced as-is: no defaults are injected.
    assert_eq!(parsed, payload);
    Ok(())
}

#[test]
fn test_multiline_query_normalized() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({ "query": "  line1  \n\n  line2  " }));

    let output = MultilineFormatter::new().format(&record)?;
    let body = &output["BEGIN_LOG\n".len()..output.len() - "\nEND_LOG".len()];
    let parsed: Value = serde_json::from_str(body)?;

    assert_eq!(parsed["query"], "line1\nline2");
    Ok(())
}

#[test]
fn test_multiline_indent_width() -> Result<(), Box<dyn Error>> {
    let record = LogRecord::Structured(json!({ "a": 1 }));

    let output = MultilineFormatter::new().with_indent(4).format(&record)?;
    assert_eq!(output, "BEGIN_LOG\n{\n    \"a\": 1\n}\nEND_LOG");
    Ok(())
}

#[test]
fn test_multiline_event_fallback() -> Result<(), Box<dyn Error>> {
    let output = MultilineFormatter::new().format(&LogRecord::Event(fixed_event()))?;

    assert!(!output.contains("BEGIN_LOG"));
    assert!(output.contains("LogEvent"));
    assert!(output.contains("hello there"));
    Ok(())
}

#[test]
fn test_normalize_query_idempotent() {
    let messy = "  query GetUser {  \n\n    id\n  }  \n";
    let once = normalize_query(messy);
    let twice = normalize_query(&once);

    assert_eq!(once, "query GetUser {\nid\n}");
    assert_eq!(once, twice);
}

#[test]
fn test_records_never_mutated() -> Result<(), Box<dyn Error>> {
    let payload = json!({ "query": "  a  \n\n  b  ", "level": "DEBUG" });
    let record = LogRecord::Structured(payload.clone());

    JsonFormatter::new().format(&record)?;
    TextFormatter::new().format(&record)?;
    MultilineFormatter::new().format(&record)?;

    assert_eq!(record.as_structured(), Some(&payload));
    Ok(())
}

#[test]
fn test_format_time_patterns() {
    let formatter = TextFormatter::new();
    let event = fixed_event();

    assert_eq!(
        formatter.format_time(&event, None),
        "2024-01-15T10:30:00+00:00",
    );
    assert_eq!(
        formatter.format_time(&event, Some("%Y-%m-%d %H:%M:%S")),
        "2024-01-15 10:30:00",
    );

    // A pattern chrono cannot parse falls back to RFC 3339.
    assert_eq!(
        formatter.format_time(&event, Some("%Q")),
        "2024-01-15T10:30:00+00:00",
    );
}

#[test]
fn test_all_strategies_use_time() {
    assert!(JsonFormatter::new().uses_time());
    assert!(TextFormatter::new().uses_time());
    assert!(MultilineFormatter::new().uses_time());
}

#[test]
fn test_absent_captures_render_empty() {
    let formatter = JsonFormatter::new();
    assert_eq!(formatter.format_exception(None), "");
    assert_eq!(formatter.format_stack(None), "");
}

#[test]
fn test_display_value() {
    assert_eq!(display_value(&json!(1_234_567)), "1,234,567");
    assert_eq!(display_value(&json!(-9_876_543)), "-9,876,543");
    assert_eq!(display_value(&json!(1234.5)), "1,234.5");
    assert_eq!(display_value(&json!(42)), "42");
    assert_eq!(display_value(&json!("plain text")), "plain text");
    assert_eq!(display_value(&json!({ "a": 1 })), r#"{"a":1}"#);
    assert_eq!(display_value(&json!(true)), "true");
}
