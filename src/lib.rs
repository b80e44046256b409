//! # Blockgate
//!
//! **License-gated block loading for the Web Advisor theme builder.**
//!
//! The server side asks a remote license API whether the site's key is valid
//! and publishes the answer as a page flag. The client side reads that flag
//! once and resolves which block modules get registered with the editor.
//!
//! ## Features
//!
//! - **Fail-closed validation**: timeouts, bad statuses and malformed replies all lock pro blocks
//! - **Distinct failure reasons** in [`LicenseStatus`] and logs, so outages are visible
//! - **Time-bounded result cache**, cleared whenever the stored key changes
//! - **Pluggable key storage** through the [`KeyStore`] trait
//! - **One-shot capability resolution** into an immutable [`CapabilitySet`]
//!
//! ## Quickstart
//!
//! ```no_run
//! use blockgate::{BlockGateConfig, FileKeyStore, LicenseGate};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), blockgate::BlockGateError> {
//!     let config = BlockGateConfig::new(
//!         "https://license.example.com/api.php",
//!         "shared-secret",
//!         "example.com",
//!     );
//!     let store = Arc::new(FileKeyStore::new(&config.namespace)?);
//!     let gate = LicenseGate::new(config, store)?;
//!
//!     // Server render: inject the flag into the page.
//!     let script = gate.feature_flag().render_script()?;
//!     println!("<script>{}</script>", script);
//!     Ok(())
//! }
//! ```
//!
//! ## Bootstrap
//!
//! ```
//! use blockgate::features::{bootstrap, registry::EditorRegistry};
//!
//! let mut editor = EditorRegistry::new();
//! let (set, report) = bootstrap(Some(r#"{"licenseValid":false}"#), &mut editor);
//! assert_eq!(set.modules().len(), 1);
//! assert!(report.is_complete());
//! ```

#![warn(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Storage layer
pub mod store;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Cache layer
pub mod cache;

// Gate (main server-side API)
pub mod gate;

// Admin settings
pub mod settings;

// Client-side feature loading
pub mod features;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::BlockGateConfig;
pub use errors::BlockGateError;
pub use features::capability::{BlockModule, CapabilitySet, Tier};
pub use features::flag::FeatureFlag;
pub use gate::{InactiveReason, LicenseCheck, LicenseGate, LicenseStatus};
pub use protocol::models::LicenseValidationResult;
pub use settings::SettingsPage;
pub use store::{FileKeyStore, KeyStore, MemoryKeyStore};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
