//! End-to-end license gate demo.
//!
//! Stores a key, validates it against the license server, injects the flag
//! and runs the block bootstrap against an in-memory editor registry.
//!
//! # Running
//!
//! ```bash
//! export LICENSE_KEY="your-license-key"
//! export LICENSE_ENDPOINT="https://license.example.com/api.php"
//! export SITE_DOMAIN="example.com"
//! cargo run --example gate_demo
//! ```
//!
//! Log output follows `RUST_LOG` (for example `RUST_LOG=blockgate=info`) and
//! defaults to `debug`.

use blockgate::features::bootstrap;
use blockgate::features::registry::EditorRegistry;
use blockgate::{BlockGateConfig, LicenseGate, LicenseStatus, MemoryKeyStore, SettingsPage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Shipped with the plugin, not read from the environment.
const LICENSE_SECRET: &str = "replace-with-shared-secret";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let license_key = std::env::var("LICENSE_KEY").unwrap_or_default();
    let endpoint = std::env::var("LICENSE_ENDPOINT")
        .unwrap_or_else(|_| "https://license.example.com/api.php".to_string());
    let domain = std::env::var("SITE_DOMAIN").unwrap_or_else(|_| "example.com".to_string());

    let config = BlockGateConfig::new(endpoint, LICENSE_SECRET, domain);
    let gate = match LicenseGate::new(config, Arc::new(MemoryKeyStore::new())) {
        Ok(gate) => gate,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Admin submits the settings form.
    let settings = SettingsPage::new(&gate);
    let form = HashMap::from([("license_key".to_string(), license_key)]);
    if let Err(e) = settings.submit(&form) {
        eprintln!("Could not store license key: {}", e);
        std::process::exit(1);
    }

    // Settings page re-render.
    let view = settings.render();
    println!("{}", view.status_label());
    match view.check.status {
        LicenseStatus::Active => {
            if let Some(email) = &view.check.email {
                println!("  Licensed to: {}", email);
            }
            println!("  From cache: {}", view.check.from_cache);
        }
        LicenseStatus::Inactive(reason) => println!("  Reason: {:?}", reason),
    }

    // Page render injects the flag; the editor bootstrap reads it back.
    let script = match gate.feature_flag().render_script() {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Could not render feature flag: {}", e);
            std::process::exit(1);
        }
    };
    println!("<script>{}</script>", script);

    let mut editor = EditorRegistry::new();
    let (set, report) = bootstrap(Some(script.as_str()), &mut editor);
    println!("Tier: {:?}", set.tier());
    for name in &report.registered {
        println!("  registered {}", name);
    }
    for (name, reason) in &report.failed {
        println!("  failed {}: {}", name, reason);
    }
}
