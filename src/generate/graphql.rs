//! A [`Generator`] for GraphQL execution logs.
//!
//! See [`GraphqlGenerator`] for more details.

use crate::generate::{pick, round2, timestamp_now, Generator};
use crate::record::LogRecord;
use rand::Rng;
use serde_json::{json, Value};

struct Operation {
    kind: &'static str,
    name: &'static str,
    query: &'static str,
}

// The query bodies keep their source indentation, so downstream
// normalization has real whitespace to chew on.
const OPERATIONS: &[Operation] = &[
    Operation {
        kind: "query",
        name: "GetUserProfile",
        query: r#"query GetUserProfile {
                user(id: "123") {
                    id
                    name
                    email
                    posts {
                        id
                        title
                    }
                }
            }"#,
    },
    Operation {
        kind: "mutation",
        name: "CreatePost",
        query: r#"mutation CreatePost($input: PostInput!) {
                createPost(input: $input) {
                    id
                    title
                    content
                    author {
                        id
                        name
                    }
                }
            }"#,
    },
];

/// Synthesizes GraphQL execution logs for a fictional `graphql-api`
/// service: a sampled operation with its multi-line query text, timing,
/// and an error entry when execution did not succeed.
pub struct GraphqlGenerator {
    #[doc(hidden)]
    _priv: (),
}

impl GraphqlGenerator {
    /// Construct a new [`GraphqlGenerator`].
    pub const fn new() -> Self {
        GraphqlGenerator { _priv: () }
    }
}

impl Default for GraphqlGenerator {
    fn default() -> Self {
        GraphqlGenerator::new()
    }
}

impl Generator for GraphqlGenerator {
    fn log_type(&self) -> &'static str {
        "graphql"
    }

    fn generate(&mut self) -> LogRecord {
        let mut rng = rand::thread_rng();

        let operation = pick(&mut rng, OPERATIONS);
        let execution_time = rng.gen_range(0.05..2.0);
        let status = *pick(&mut rng, &["SUCCESS", "VALIDATION_ERROR", "EXECUTION_ERROR"]);

        let mut entry = json!({
            "timestamp": timestamp_now(),
            "service": "graphql-api",
            "operation_type": operation.kind,
            "operation_name": operation.name,
            "query": operation.query,
            "execution_time_ms": round2(execution_time * 1000.0),
            "status": status,
        });

        if let Some(variables) = variables(operation) {
            entry["variables"] = variables;
        }

        if status != "SUCCESS" {
            entry["error"] = json!({
                "message": format!("Error during {}", operation.kind),
                "code": *pick(&mut rng, &["VALIDATION", "AUTHORIZATION", "INTERNAL"]),
            });
        }

        LogRecord::Structured(entry)
    }
}

fn variables(operation: &Operation) -> Option<Value> {
    match operation.name {
        "CreatePost" => Some(json!({
            "input": {
                "title": "New Post",
                "content": "Post content",
            },
        })),
        _ => None,
    }
}
