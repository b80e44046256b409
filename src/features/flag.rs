//! The `licenseValid` flag handed from server render to client bootstrap.
//!
//! The server writes it into the page as a localized global,
//! `var wabProData = {"licenseValid":true};`, and the bootstrap reads it back
//! exactly once.

use crate::BlockGateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the page global carrying the flag.
pub const FLAG_GLOBAL: &str = "wabProData";

/// Server-computed feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlag {
    /// Whether the license validated when the page was rendered.
    pub license_valid: bool,
}

impl FeatureFlag {
    /// Flag with the given value.
    pub fn new(license_valid: bool) -> Self {
        Self { license_valid }
    }

    /// Render the inline script that defines the page global.
    pub fn render_script(&self) -> Result<String, BlockGateError> {
        let json = serde_json::to_string(self).map_err(|e| {
            BlockGateError::ConfigError(format!("Failed to serialize feature flag: {}", e))
        })?;
        Ok(format!("var {} = {};", FLAG_GLOBAL, json))
    }

    /// Read the flag back from an injected payload.
    ///
    /// `payload` may be the bare JSON object or the full script produced by
    /// [`FeatureFlag::render_script`]. Returns `None` when there is nothing to
    /// read or it does not parse, which is the case outside the host page.
    ///
    /// Localized globals can arrive string-typed (`"1"` / `""`), so the value
    /// is read with script truthiness rather than strict boolean matching.
    pub fn from_injected(payload: Option<&str>) -> Option<Self> {
        let payload = payload?.trim();
        let json = strip_assignment(payload);

        let value: Value = serde_json::from_str(json).ok()?;
        let flag = value.as_object()?.get("licenseValid")?;

        Some(Self::new(is_truthy(flag)))
    }
}

fn strip_assignment(payload: &str) -> &str {
    let body = payload
        .strip_prefix("var ")
        .and_then(|rest| rest.trim_start().strip_prefix(FLAG_GLOBAL))
        .and_then(|rest| rest.trim_start().strip_prefix('='))
        .unwrap_or(payload);
    body.trim().trim_end_matches(';').trim_end()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
