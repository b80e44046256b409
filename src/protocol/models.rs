//! License server response structs and result extraction.

use crate::BlockGateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw `validate` response body.
///
/// `valid` is kept as a raw JSON value: only the boolean `true` counts, so
/// `"true"`, `1` or `null` must not be coerced on the way in.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteValidateResponse {
    /// Validity flag as sent by the server.
    #[serde(default)]
    pub valid: Option<Value>,

    /// License key echoed back by the server.
    #[serde(default)]
    pub license_key: Option<String>,

    /// Email address of the license holder.
    #[serde(default)]
    pub email: Option<String>,
}

/// Normalized outcome of one remote validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseValidationResult {
    /// True only if the server sent `"valid": true`.
    pub valid: bool,

    /// Email address of the license holder, if reported.
    pub email: Option<String>,

    /// License key echoed by the server, if reported.
    pub license_key: Option<String>,
}

impl LicenseValidationResult {
    /// Extract the normalized result from a parsed response.
    ///
    /// # Errors
    /// `MalformedResponse` if the `valid` field is absent.
    pub fn from_remote(response: RemoteValidateResponse) -> Result<Self, BlockGateError> {
        let valid = match response.valid {
            Some(Value::Bool(true)) => true,
            Some(_) => false,
            None => {
                return Err(BlockGateError::MalformedResponse(
                    "missing `valid` field".to_string(),
                ))
            }
        };

        Ok(Self {
            valid,
            email: response.email,
            license_key: response.license_key,
        })
    }
}

/// Parse a raw response body into a validation result.
pub fn parse_validation_response(body: &[u8]) -> Result<LicenseValidationResult, BlockGateError> {
    let response: RemoteValidateResponse = serde_json::from_slice(body).map_err(|e| {
        BlockGateError::MalformedResponse(format!("Failed to parse license response: {}", e))
    })?;
    LicenseValidationResult::from_remote(response)
}
