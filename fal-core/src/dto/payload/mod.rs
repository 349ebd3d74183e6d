//! Model input payloads
//!
//! Every model defines its own input schema, so payloads are kept as an
//! untyped JSON object instead of a fixed struct.

use serde_json::{Map, Value};

/// JSON object sent as model input
pub type Payload = Map<String, Value>;

/// Error produced when user-supplied input is not a JSON object
#[derive(Debug)]
pub enum PayloadParseError {
    /// Input is not valid JSON
    Syntax(serde_json::Error),
    /// Input is valid JSON but not an object
    NotAnObject,
}

impl std::fmt::Display for PayloadParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadParseError::Syntax(e) => write!(f, "{}", e),
            PayloadParseError::NotAnObject => write!(f, "payload must be a JSON object"),
        }
    }
}

impl std::error::Error for PayloadParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadParseError::Syntax(e) => Some(e),
            PayloadParseError::NotAnObject => None,
        }
    }
}

/// Parse a JSON object from user input
pub fn parse_payload(input: &str) -> Result<Payload, PayloadParseError> {
    match serde_json::from_str::<Value>(input).map_err(PayloadParseError::Syntax)? {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadParseError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let payload = parse_payload(r#"{"prompt":"a cat","num_images":2}"#).unwrap();
        assert_eq!(payload["prompt"], "a cat");
        assert_eq!(payload["num_images"], 2);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            parse_payload("{prompt: a cat"),
            Err(PayloadParseError::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_payload(r#"["a", "b"]"#),
            Err(PayloadParseError::NotAnObject)
        ));
    }
}
