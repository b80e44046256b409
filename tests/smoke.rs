//! Basic smoke test to verify the public API surface.

#[test]
fn crate_compiles() {
    let _ = std::any::type_name::<blockgate::BlockGateConfig>();
    let _ = std::any::type_name::<blockgate::BlockGateError>();
    let _ = std::any::type_name::<blockgate::LicenseGate>();
    let _ = std::any::type_name::<blockgate::CapabilitySet>();
}
