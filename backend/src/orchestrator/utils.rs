//! Orchestrator utility functions
//!
//! Common utilities for orchestrator operations including hashing, validation, and helpers.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a short hash for a location string
///
/// Returns an 8-character hexadecimal hash suitable for logging and tracing.
///
/// # Arguments
/// * `location` - The location string to hash
///
/// # Returns
/// * `String` - 8-character hexadecimal hash
pub fn hash_location(location: &str) -> String {
    let mut hasher = DefaultHasher::new();
    location.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

/// Validate a location query
///
/// # Returns
/// * `Ok(&str)` - The trimmed location
/// * `Err(AppError::InvalidInput)` - If nothing but whitespace was entered
pub fn validate_location(location: &str) -> Result<&str, AppError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("location cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Strip a Markdown code fence some models wrap JSON in
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse model output as JSON, mapping every failure to `MalformedResponse`
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T, AppError> {
    let payload = strip_code_fence(text);
    if payload.is_empty() {
        return Err(AppError::MalformedResponse("response text is empty".to_string()));
    }
    serde_json::from_str(payload).map_err(|e| {
        AppError::MalformedResponse(format!(
            "Failed to parse response as JSON: {} - Response: {}",
            e, payload
        ))
    })
}

/// Remove a `data:<mime>;base64,` prefix, leaving raw base64
pub fn strip_data_uri_prefix(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_hash_location_is_stable_and_short() {
        assert_eq!(hash_location("Kyoto"), hash_location("Kyoto"));
        assert_ne!(hash_location("Kyoto"), hash_location("Osaka"));
        assert_eq!(hash_location("Kyoto").len(), 8);
    }

    #[test]
    fn test_validate_location() {
        assert_eq!(validate_location("  Lisbon ").unwrap(), "Lisbon");
        let err = validate_location("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence(" {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json_response_errors_are_malformed() {
        let err = parse_json_response::<Vec<u8>>("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        let err = parse_json_response::<Vec<u8>>("  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_strip_data_uri_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
    }
}
