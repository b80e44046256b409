//! Block modules and capability-set resolution.
//!
//! Free tier: the button module, always present.
//! Pro tier: layout (div, section, container), sliders (home, owl) and the
//! FAQ accordion.

use crate::features::flag::{FeatureFlag, FLAG_GLOBAL};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Static description of one editor block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockDefinition {
    /// Namespaced block name, e.g. `web-advisor/button-block`.
    pub name: &'static str,
    /// Title shown in the inserter.
    pub title: &'static str,
    /// Dashicon slug.
    pub icon: &'static str,
    /// Inserter category.
    pub category: &'static str,
}

const fn block(
    name: &'static str,
    title: &'static str,
    icon: &'static str,
    category: &'static str,
) -> BlockDefinition {
    BlockDefinition {
        name,
        title,
        icon,
        category,
    }
}

const BUTTON_BLOCKS: &[BlockDefinition] = &[block(
    "web-advisor/button-block",
    "Button Block",
    "button",
    "layout",
)];
const DIV_BLOCKS: &[BlockDefinition] = &[block(
    "web-advisor/div-block",
    "Div Block",
    "editor-table",
    "layout",
)];
const SECTION_BLOCKS: &[BlockDefinition] = &[block(
    "web-advisor/section-block",
    "Section Block",
    "welcome-write-blog",
    "layout",
)];
const CONTAINER_BLOCKS: &[BlockDefinition] = &[block(
    "web-advisor/container-block",
    "Container Block",
    "align-wide",
    "layout",
)];
const HOME_SLIDER_BLOCKS: &[BlockDefinition] = &[block(
    "wab/home-slider",
    "Home Page Slider",
    "images-alt2",
    "layout",
)];
const OWL_SLIDER_BLOCKS: &[BlockDefinition] = &[
    block(
        "themidev/owl-carousel-slide",
        "Owl Slide",
        "format-image",
        "layout",
    ),
    block(
        "themidev/owl-carousel",
        "Owl Carousel Slider (ThemiDev)",
        "images-alt2",
        "layout",
    ),
];
const FAQ_COLLAPSE_BLOCKS: &[BlockDefinition] = &[block(
    "web-advisor/faq-collapse",
    "FAQ Collapse (Web Advisor)",
    "editor-help",
    "widgets",
)];

/// Licensing tier a module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Always available.
    Free,
    /// Requires a valid license.
    Pro,
}

/// A block-registration module. Each registers one or more block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockModule {
    /// Styled link button.
    Button,
    /// Generic div wrapper.
    Div,
    /// Full-width section with background.
    Section,
    /// Bootstrap container.
    Container,
    /// Bootstrap hero carousel.
    HomeSlider,
    /// Owl carousel and its slide child block.
    OwlSlider,
    /// FAQ accordion.
    FaqCollapse,
}

impl BlockModule {
    /// Modules registered regardless of license state.
    pub const BASE: [BlockModule; 1] = [Self::Button];

    /// Modules added when the license is valid.
    pub const PRO: [BlockModule; 6] = [
        Self::Div,
        Self::Section,
        Self::Container,
        Self::HomeSlider,
        Self::OwlSlider,
        Self::FaqCollapse,
    ];

    /// Module name as used in bootstrap imports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Div => "div",
            Self::Section => "section",
            Self::Container => "container",
            Self::HomeSlider => "home-slider",
            Self::OwlSlider => "owl-slider",
            Self::FaqCollapse => "faq-collapse",
        }
    }

    /// Tier this module belongs to.
    pub fn tier(&self) -> Tier {
        match self {
            Self::Button => Tier::Free,
            _ => Tier::Pro,
        }
    }

    /// Block types this module registers.
    pub fn blocks(&self) -> &'static [BlockDefinition] {
        match self {
            Self::Button => BUTTON_BLOCKS,
            Self::Div => DIV_BLOCKS,
            Self::Section => SECTION_BLOCKS,
            Self::Container => CONTAINER_BLOCKS,
            Self::HomeSlider => HOME_SLIDER_BLOCKS,
            Self::OwlSlider => OWL_SLIDER_BLOCKS,
            Self::FaqCollapse => FAQ_COLLAPSE_BLOCKS,
        }
    }

    /// Find the module that registers `block_name`.
    pub fn for_block(block_name: &str) -> Option<BlockModule> {
        BLOCK_INDEX.get(block_name).copied()
    }
}

static BLOCK_INDEX: Lazy<HashMap<&'static str, BlockModule>> = Lazy::new(|| {
    BlockModule::BASE
        .iter()
        .chain(BlockModule::PRO.iter())
        .flat_map(|module| module.blocks().iter().map(move |b| (b.name, *module)))
        .collect()
});

impl fmt::Display for BlockModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockModule::BASE
            .iter()
            .chain(BlockModule::PRO.iter())
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown block module: {}", s))
    }
}

/// Immutable set of modules to register for one page load.
///
/// Resolved once from the injected flag; registration code iterates it and
/// never looks at the flag again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    tier: Tier,
    modules: Vec<BlockModule>,
}

impl CapabilitySet {
    /// Resolve the module list from the bootstrap flag.
    ///
    /// `None` means the flag was not injected at all, which is treated like
    /// an inactive license.
    pub fn resolve(flag: Option<FeatureFlag>) -> Self {
        match flag {
            Some(FeatureFlag {
                license_valid: true,
            }) => {
                info!(
                    modules = BlockModule::BASE.len() + BlockModule::PRO.len(),
                    "pro features unlocked"
                );
                Self::pro()
            }
            Some(_) => {
                warn!("pro features are locked; activate a license to unlock all blocks");
                Self::free()
            }
            None => {
                warn!(
                    global = FLAG_GLOBAL,
                    "feature flag not injected; loading free blocks only"
                );
                Self::free()
            }
        }
    }

    /// Base modules only.
    pub fn free() -> Self {
        Self {
            tier: Tier::Free,
            modules: BlockModule::BASE.to_vec(),
        }
    }

    /// Base plus extended modules.
    pub fn pro() -> Self {
        Self {
            tier: Tier::Pro,
            modules: BlockModule::BASE
                .iter()
                .chain(BlockModule::PRO.iter())
                .copied()
                .collect(),
        }
    }

    /// Highest tier included.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Modules in registration order.
    pub fn modules(&self) -> &[BlockModule] {
        &self.modules
    }

    /// Whether `module` is part of this set.
    pub fn contains(&self, module: BlockModule) -> bool {
        self.modules.contains(&module)
    }

    /// Every block type the set registers.
    pub fn block_names(&self) -> Vec<&'static str> {
        self.modules
            .iter()
            .flat_map(|m| m.blocks().iter().map(|b| b.name))
            .collect()
    }
}
