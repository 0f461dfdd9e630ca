//! Intent parsing — turns the model's JSON decision into a typed [`Intent`]
//!
//! The model is asked for `{"function": "<name>", "args": {...}}`. Nothing it
//! says is trusted: the shape, the function name and the arguments of that
//! function are all checked before anything runs.

use serde_json::{Map, Value};
use thiserror::Error;

pub const PING_TEST: &str = "ping_test";
pub const GATEWAY_PING_TEST: &str = "gateway_ping_test";

/// Instruction sent ahead of every user message
pub const SYSTEM_PROMPT: &str = "You're a system diagnostics assistant. \
Decide which function to run based on user input.\n\
Respond ONLY in JSON format: {\"function\": \"<function_name>\", \"args\": {\"arg1\": \"value\"}}\n\
Available functions:\n \
- ping_test(host: str): Check if a host is reachable.\n \
- gateway_ping_test(): Check if the system's default gateway is reachable.\n";

pub fn build_prompt(user_message: &str) -> String {
    format!("{SYSTEM_PROMPT}\nUser: {user_message}")
}

/// A diagnostic the model asked for, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    PingTest { host: String },
    GatewayPingTest,
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("model response is not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("model response is not a JSON object")]
    NotAnObject,
    #[error("model response is missing '{0}'")]
    MissingField(&'static str),
    #[error("'{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Function '{0}' is not implemented.")]
    UnknownFunction(String),
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments {
        function: &'static str,
        reason: String,
    },
}

impl Intent {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::PingTest { .. } => PING_TEST,
            Self::GatewayPingTest => GATEWAY_PING_TEST,
        }
    }

    /// Validate raw model text into an intent.
    pub fn parse(model_text: &str) -> Result<Self, IntentError> {
        let value = extract_json(model_text)?;
        let decision = value.as_object().ok_or(IntentError::NotAnObject)?;

        let function = decision
            .get("function")
            .ok_or(IntentError::MissingField("function"))?
            .as_str()
            .ok_or(IntentError::WrongType {
                field: "function",
                expected: "a string",
            })?;
        let args = decision
            .get("args")
            .ok_or(IntentError::MissingField("args"))?
            .as_object()
            .ok_or(IntentError::WrongType {
                field: "args",
                expected: "an object",
            })?;

        match function {
            PING_TEST => parse_ping_args(args),
            GATEWAY_PING_TEST => {
                reject_unexpected(GATEWAY_PING_TEST, args, &[])?;
                Ok(Self::GatewayPingTest)
            }
            other => Err(IntentError::UnknownFunction(other.to_string())),
        }
    }
}

fn parse_ping_args(args: &Map<String, Value>) -> Result<Intent, IntentError> {
    reject_unexpected(PING_TEST, args, &["host"])?;

    let host = match args.get("host") {
        Some(Value::String(host)) => host.trim(),
        Some(_) => return Err(invalid(PING_TEST, "'host' must be a string")),
        None => return Err(invalid(PING_TEST, "missing required argument 'host'")),
    };

    // A leading '-' would reach ping as an option
    if host.is_empty() || host.starts_with('-') || host.contains(char::is_whitespace) {
        return Err(invalid(
            PING_TEST,
            format!("'{host}' is not a host name or address"),
        ));
    }

    Ok(Intent::PingTest {
        host: host.to_string(),
    })
}

fn reject_unexpected(
    function: &'static str,
    args: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), IntentError> {
    match args.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid(function, format!("unexpected argument '{key}'"))),
        None => Ok(()),
    }
}

fn invalid(function: &'static str, reason: impl Into<String>) -> IntentError {
    IntentError::InvalidArguments {
        function,
        reason: reason.into(),
    }
}

/// Parse `text` as JSON, tolerating a markdown fence or prose around a
/// single object. Reports the direct parse error when nothing is found.
fn extract_json(text: &str) -> Result<Value, IntentError> {
    let trimmed = text.trim();
    let direct_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(fence_start) = trimmed.find("```") {
        let after_fence = &trimmed[fence_start + 3..];
        // skip an optional language tag such as ```json
        let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(fence_end) = content.find("```") {
            if let Ok(value) = serde_json::from_str::<Value>(content[..fence_end].trim()) {
                return Ok(value);
            }
        }
    }

    if let Some(object) = first_balanced_object(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(object) {
            return Ok(value);
        }
    }

    Err(IntentError::MalformedResponse(direct_err))
}

/// First `{ ... }` span with balanced braces, ignoring braces in strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ping_test() {
        let text = r#"{"function":"ping_test","args":{"host":"127.0.0.1"}}"#;
        let intent = Intent::parse(text).unwrap();
        assert_eq!(
            intent,
            Intent::PingTest {
                host: "127.0.0.1".into()
            }
        );
        assert_eq!(intent.function_name(), "ping_test");
    }

    #[test]
    fn test_parse_gateway_ping_test() {
        let intent = Intent::parse(r#"{"function": "gateway_ping_test", "args": {}}"#).unwrap();
        assert_eq!(intent, Intent::GatewayPingTest);
    }

    #[test]
    fn test_parse_trims_host() {
        let text = r#"{"function":"ping_test","args":{"host":" google.com "}}"#;
        let intent = Intent::parse(text).unwrap();
        assert_eq!(
            intent,
            Intent::PingTest {
                host: "google.com".into()
            }
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Sure! Here is the call:\n```json\n\
                    {\"function\": \"gateway_ping_test\", \"args\": {}}\n```";
        assert_eq!(Intent::parse(text).unwrap(), Intent::GatewayPingTest);
    }

    #[test]
    fn test_parse_json_in_prose() {
        let text = r#"I will run {"function": "ping_test", "args": {"host": "example.com"}} now."#;
        assert_eq!(
            Intent::parse(text).unwrap(),
            Intent::PingTest {
                host: "example.com".into()
            }
        );
    }

    #[test]
    fn test_unparsable_text() {
        let err = Intent::parse("I think you should ping google").unwrap_err();
        assert!(matches!(err, IntentError::MalformedResponse(_)));
        assert!(err.to_string().starts_with("model response is not valid JSON"));
    }

    #[test]
    fn test_not_an_object() {
        let err = Intent::parse(r#"["ping_test"]"#).unwrap_err();
        assert!(matches!(err, IntentError::NotAnObject));
    }

    #[test]
    fn test_missing_function() {
        let err = Intent::parse(r#"{"args": {}}"#).unwrap_err();
        assert!(matches!(err, IntentError::MissingField("function")));
    }

    #[test]
    fn test_missing_args() {
        let err = Intent::parse(r#"{"function": "gateway_ping_test"}"#).unwrap_err();
        assert!(matches!(err, IntentError::MissingField("args")));
        assert_eq!(err.to_string(), "model response is missing 'args'");
    }

    #[test]
    fn test_wrong_types() {
        let err = Intent::parse(r#"{"function": 7, "args": {}}"#).unwrap_err();
        assert!(matches!(err, IntentError::WrongType { field: "function", .. }));

        let err = Intent::parse(r#"{"function": "ping_test", "args": "google.com"}"#).unwrap_err();
        assert!(matches!(err, IntentError::WrongType { field: "args", .. }));
    }

    #[test]
    fn test_unknown_function() {
        let text = r#"{"function": "traceroute", "args": {"host": "a"}}"#;
        let err = Intent::parse(text).unwrap_err();
        assert!(matches!(err, IntentError::UnknownFunction(ref name) if name == "traceroute"));
        assert_eq!(err.to_string(), "Function 'traceroute' is not implemented.");
    }

    #[test]
    fn test_ping_argument_validation() {
        let cases = [
            (r#"{"function":"ping_test","args":{}}"#, "missing required argument 'host'"),
            (r#"{"function":"ping_test","args":{"host":42}}"#, "'host' must be a string"),
            (r#"{"function":"ping_test","args":{"host":""}}"#, "is not a host name or address"),
            (r#"{"function":"ping_test","args":{"host":"-f"}}"#, "is not a host name or address"),
            (r#"{"function":"ping_test","args":{"host":"a b"}}"#, "is not a host name or address"),
            (
                r#"{"function":"ping_test","args":{"host":"a","count":3}}"#,
                "unexpected argument 'count'",
            ),
        ];
        for (text, expected) in cases {
            let err = Intent::parse(text).unwrap_err();
            assert!(
                matches!(err, IntentError::InvalidArguments { function: "ping_test", .. }),
                "{text}"
            );
            assert!(err.to_string().contains(expected), "{text}: {err}");
        }
    }

    #[test]
    fn test_gateway_rejects_arguments() {
        let text = r#"{"function":"gateway_ping_test","args":{"host":"x"}}"#;
        let err = Intent::parse(text).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments for gateway_ping_test: unexpected argument 'host'"
        );
    }

    #[test]
    fn test_balanced_object_ignores_braces_in_strings() {
        let text = r#"note {"function": "ping_test", "args": {"host": "a}b"}} trailing }"#;
        assert_eq!(
            first_balanced_object(text),
            Some(r#"{"function": "ping_test", "args": {"host": "a}b"}}"#)
        );
        assert_eq!(first_balanced_object("no braces"), None);
        assert_eq!(first_balanced_object("{ unclosed"), None);
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("is google.com reachable?");
        assert!(prompt.starts_with("You're a system diagnostics assistant."));
        assert!(prompt.contains("ping_test(host: str)"));
        assert!(prompt.contains("gateway_ping_test()"));
        assert!(prompt.ends_with("\nUser: is google.com reachable?"));
    }
}
