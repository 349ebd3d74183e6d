//! Model result rendering
//!
//! Turns the raw body of a model response into either machine-readable JSON
//! or a short human summary. Bodies that are not valid JSON are always
//! passed through untouched.

use serde_json::{Map, Value};
use std::fmt::Write;

/// Re-serialize a response body as JSON
///
/// Valid JSON is re-encoded (indented when `pretty`) with a trailing
/// newline. Anything else is returned byte for byte.
pub fn render_json(body: &[u8], pretty: bool) -> Vec<u8> {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return body.to_vec();
    };

    let encoded = if pretty {
        serde_json::to_vec_pretty(&value)
    } else {
        serde_json::to_vec(&value)
    };

    match encoded {
        Ok(mut out) => {
            out.push(b'\n');
            out
        }
        Err(_) => body.to_vec(),
    }
}

/// Summarize a response body for a terminal
///
/// Image URLs, the description and the seed are listed when present. When
/// the object has no `images` key the whole object is pretty-printed so any
/// model's output is visible. Bodies that are not JSON objects are returned
/// as text.
pub fn render_summary(body: &[u8]) -> String {
    match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(object) => summarize(&object),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn summarize(object: &Map<String, Value>) -> String {
    let mut out = String::new();

    if let Some(Value::Array(images)) = object.get("images") {
        let _ = writeln!(out, "Generated {} image(s):", images.len());
        for (i, image) in images.iter().enumerate() {
            if let Some(url) = image.get("url").and_then(Value::as_str) {
                let _ = writeln!(out, "  [{}] {}", i + 1, url);
            }
        }
    }

    if let Some(description) = object.get("description").and_then(Value::as_str) {
        if !description.is_empty() {
            let _ = writeln!(out, "Description: {}", description);
        }
    }

    match object.get("seed") {
        None | Some(Value::Null) => {}
        Some(Value::String(seed)) => {
            let _ = writeln!(out, "Seed: {}", seed);
        }
        Some(seed) => {
            let _ = writeln!(out, "Seed: {}", seed);
        }
    }

    if !object.contains_key("images") {
        if let Ok(pretty) = serde_json::to_string_pretty(object) {
            out.push_str(&pretty);
            out.push('\n');
        }
    }

    out
}
