//! Registration of resolved modules with the host editor.

use crate::features::capability::{BlockDefinition, BlockModule, CapabilitySet};
use crate::BlockGateError;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Host editor's block registration API.
pub trait BlockRegistrar {
    /// Register one block type.
    ///
    /// # Errors
    /// `RegistrationFailed` when the host refuses the block.
    fn register_block_type(&mut self, block: &BlockDefinition) -> Result<(), BlockGateError>;
}

/// Outcome of registering a capability set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Blocks the host accepted, in registration order.
    pub registered: Vec<&'static str>,

    /// Blocks the host refused, with the reason.
    pub failed: Vec<(&'static str, String)>,
}

impl RegistrationReport {
    /// True when every block was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Register every block of every module in `set`.
///
/// Each registration stands alone: a refused block is recorded and the rest
/// continue.
pub fn register_capabilities(
    set: &CapabilitySet,
    registrar: &mut dyn BlockRegistrar,
) -> RegistrationReport {
    let mut report = RegistrationReport::default();

    for module in set.modules() {
        for block in module.blocks() {
            match registrar.register_block_type(block) {
                Ok(()) => {
                    debug!(module = %module, block = block.name, "block registered");
                    report.registered.push(block.name);
                }
                Err(e) => {
                    warn!(module = %module, block = block.name, error = %e, "block registration failed");
                    report.failed.push((block.name, e.to_string()));
                }
            }
        }
    }

    report
}

/// In-memory registry with the host's duplicate-name rule.
#[derive(Debug, Default)]
pub struct EditorRegistry {
    blocks: BTreeMap<&'static str, BlockDefinition>,
}

impl EditorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// Registered block names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.blocks.keys().copied().collect()
    }

    /// Modules with at least one registered block.
    pub fn modules(&self) -> Vec<BlockModule> {
        let mut modules = Vec::new();
        for module in self.blocks.keys().filter_map(|name| BlockModule::for_block(name)) {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
        modules
    }
}

impl BlockRegistrar for EditorRegistry {
    fn register_block_type(&mut self, block: &BlockDefinition) -> Result<(), BlockGateError> {
        if self.blocks.contains_key(block.name) {
            return Err(BlockGateError::RegistrationFailed {
                block: block.name.to_string(),
                reason: "block type is already registered".to_string(),
            });
        }
        self.blocks.insert(block.name, *block);
        Ok(())
    }
}
