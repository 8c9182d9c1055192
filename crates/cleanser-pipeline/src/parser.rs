//! Parse model output into per-contact verdicts

use cleanser_domain::AnalysisResult;
use serde_json::{Map, Value};
use tracing::warn;

/// Result of interpreting one model response
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A JSON array was found
    Parsed {
        /// Every element that could be interpreted
        results: Vec<AnalysisResult>,
        /// Emails of elements whose verdict could not be read
        malformed: Vec<String>,
    },

    /// No usable JSON array in the response
    Failed {
        /// Why parsing failed
        reason: String,
        /// The raw response, kept for diagnostics
        response: String,
    },
}

impl ParseOutcome {
    fn failed(reason: impl Into<String>, response: &str) -> Self {
        ParseOutcome::Failed {
            reason: reason.into(),
            response: response.to_string(),
        }
    }
}

/// Parse a model response into analysis results
///
/// The array is taken from the first `[` to the last `]` inclusive, so prose
/// or markdown fences around it are ignored. Elements that cannot be
/// interpreted are skipped with a warning; the rest are kept. Skipped
/// elements that still name an email are listed in `malformed`.
pub fn parse_llm_response(response: &str) -> ParseOutcome {
    let json_str = match extract_json_array(response) {
        Some(s) => s,
        None => return ParseOutcome::failed("no JSON array found in response", response),
    };

    let json: Value = match serde_json::from_str(json_str) {
        Ok(json) => json,
        Err(e) => return ParseOutcome::failed(format!("JSON parse error: {}", e), response),
    };

    let elements = match json.as_array() {
        Some(elements) => elements,
        None => return ParseOutcome::failed("expected a JSON array", response),
    };

    let mut results = Vec::with_capacity(elements.len());
    let mut malformed = Vec::new();
    for (idx, element) in elements.iter().enumerate() {
        match parse_result_json(element) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!("Skipping result {}: {}", idx, e);
                if let Some(email) = element.get("email").and_then(Value::as_str) {
                    malformed.push(email.to_string());
                }
            }
        }
    }

    ParseOutcome::Parsed { results, malformed }
}

/// Slice from the first `[` to the last `]`
fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// Parse a single result element
fn parse_result_json(json: &Value) -> Result<AnalysisResult, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "result is not a JSON object".to_string())?;

    let email = obj
        .get("email")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'email'".to_string())?;

    let is_real = parse_is_real(obj)?;

    let confidence_score = match obj.get("confidence_score") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let score = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match score {
                Some(score) if (0.0..=1.0).contains(&score) => Some(score),
                _ => {
                    warn!("Ignoring confidence_score {} for {}", value, email);
                    None
                }
            }
        }
    };

    let reason = match obj.get("reason") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    Ok(AnalysisResult {
        email: email.to_string(),
        is_real,
        confidence_score,
        reason,
    })
}

/// `is_real` wins over the legacy inverted `is_test` key; absent both means genuine
fn parse_is_real(obj: &Map<String, Value>) -> Result<bool, String> {
    if let Some(value) = obj.get("is_real") {
        return as_bool(value).ok_or_else(|| format!("invalid 'is_real': {}", value));
    }
    if let Some(value) = obj.get("is_test") {
        return as_bool(value)
            .map(|is_test| !is_test)
            .ok_or_else(|| format!("invalid 'is_test': {}", value));
    }
    Ok(true)
}

/// Booleans, 0/1 and the usual true/false, yes/no spellings
fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
