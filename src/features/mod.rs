//! Client-side feature loading: flag, capability set, registration.

pub mod capability;
pub mod flag;
pub mod registry;

use capability::CapabilitySet;
use flag::FeatureFlag;
use registry::{register_capabilities, BlockRegistrar, RegistrationReport};

/// Bootstrap: read the injected flag once, resolve modules, register them.
///
/// Returns the resolved set alongside the report so callers can see what was
/// attempted as well as what the host accepted.
pub fn bootstrap(
    injected: Option<&str>,
    registrar: &mut dyn BlockRegistrar,
) -> (CapabilitySet, RegistrationReport) {
    let set = CapabilitySet::resolve(FeatureFlag::from_injected(injected));
    let report = register_capabilities(&set, registrar);
    (set, report)
}
