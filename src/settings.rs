//! Admin settings form: one `license_key` text field.

use crate::gate::{LicenseCheck, LicenseGate};
use crate::BlockGateError;
use std::collections::HashMap;

/// Name of the form field carrying the key.
pub const LICENSE_FIELD: &str = "license_key";

/// Settings page backed by a [`LicenseGate`].
pub struct SettingsPage<'a> {
    gate: &'a LicenseGate,
}

impl<'a> SettingsPage<'a> {
    /// Settings page for `gate`.
    pub fn new(gate: &'a LicenseGate) -> Self {
        Self { gate }
    }

    /// Handle a form POST: sanitize and persist the submitted key.
    ///
    /// Returns the stored (sanitized) key.
    ///
    /// # Errors
    /// - `MissingFormField` if the form has no `license_key`
    /// - `StoreIO` if the key could not be persisted
    pub fn submit(&self, form: &HashMap<String, String>) -> Result<String, BlockGateError> {
        let raw = form
            .get(LICENSE_FIELD)
            .ok_or_else(|| BlockGateError::MissingFormField(LICENSE_FIELD.to_string()))?;
        self.gate.set_license_key(raw)
    }

    /// Re-render data: the stored key and its current status.
    pub fn render(&self) -> SettingsView {
        let license_key = self.gate.license_key().ok().flatten().unwrap_or_default();
        let check = self.gate.check();
        SettingsView { license_key, check }
    }
}

/// What the settings page shows after a render.
#[derive(Debug, Clone)]
pub struct SettingsView {
    /// Value for the key input.
    pub license_key: String,
    /// Current check result.
    pub check: LicenseCheck,
}

impl SettingsView {
    /// "License Active" or "License Inactive".
    pub fn status_label(&self) -> &'static str {
        self.check.status.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::client::http::{LicenseTransport, RemoteResponse};
    use crate::clock::SystemClock;
    use crate::config::BlockGateConfig;
    use crate::store::MemoryKeyStore;
    use std::sync::Arc;

    struct AcceptAbc;

    impl LicenseTransport for AcceptAbc {
        fn post_form(&self, _url: &str, fields: &[(&str, &str)]) -> Result<RemoteResponse, BlockGateError> {
            let valid = fields.contains(&("license_key", "ABC123"));
            Ok(RemoteResponse {
                status: 200,
                body: format!(r#"{{"valid":{}}}"#, valid).into_bytes(),
            })
        }
    }

    fn gate() -> LicenseGate {
        LicenseGate::from_parts(
            BlockGateConfig::new("https://license.example.com/api.php", "shh", "example.com"),
            Arc::new(MemoryKeyStore::new()),
            Box::new(AcceptAbc),
            Arc::new(MemoryCache::new()),
            Arc::new(SystemClock),
        )
        .unwrap()
    }

    fn form(value: &str) -> HashMap<String, String> {
        HashMap::from([(LICENSE_FIELD.to_string(), value.to_string())])
    }

    #[test]
    fn submit_then_render_shows_sanitized_key() {
        let gate = gate();
        let page = SettingsPage::new(&gate);

        assert_eq!(page.submit(&form("  <b>ABC123</b>\n")).unwrap(), "ABC123");

        let view = page.render();
        assert_eq!(view.license_key, "ABC123");
        assert_eq!(view.status_label(), "License Active");
    }

    #[test]
    fn repeated_submission_is_idempotent() {
        let gate = gate();
        let page = SettingsPage::new(&gate);

        let first = page.submit(&form(" ABC123 ")).unwrap();
        let second = page.submit(&form(" ABC123 ")).unwrap();
        let resubmitted = page.submit(&form(&first)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, resubmitted);
        assert_eq!(gate.license_key().unwrap().as_deref(), Some("ABC123"));
    }

    #[test]
    fn wrong_key_renders_inactive() {
        let gate = gate();
        let page = SettingsPage::new(&gate);
        page.submit(&form("NOPE")).unwrap();
        assert_eq!(page.render().status_label(), "License Inactive");
    }

    #[test]
    fn empty_page_renders_inactive() {
        let gate = gate();
        let view = SettingsPage::new(&gate).render();
        assert_eq!(view.license_key, "");
        assert_eq!(view.status_label(), "License Inactive");
    }

    #[test]
    fn missing_field_is_an_error() {
        let gate = gate();
        let result = SettingsPage::new(&gate).submit(&HashMap::new());
        assert!(matches!(result, Err(BlockGateError::MissingFormField(_))));
    }
}
