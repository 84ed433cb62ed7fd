//! Engine configuration.
//!
//! The room server decides at startup which content packages are loaded, in
//! which order, and which generals or packages are hidden or banned. The
//! registry reads this once while it is built; nothing here changes afterwards.
//!
//! Configuration can be assembled in code with the builder methods or loaded
//! from TOML:
//!
//! ```
//! use rust_hegemony::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     package_names = ["standard", "momentum"]
//!     ban_packages = ["momentum"]
//!     seed = 7
//! "#).unwrap();
//!
//! assert_eq!(config.package_names, vec!["standard", "momentum"]);
//! assert!(config.is_package_banned("momentum"));
//! assert_eq!(config.seed, 7);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Startup configuration for a registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Packages to load, in load order. Order fixes card ids and the
    /// tie-break order of trigger abilities.
    pub package_names: Vec<String>,

    /// Packages whose cards and generals are excluded from random draws.
    pub ban_packages: Vec<String>,

    /// Generals that are hidden even though their definition is not.
    pub extra_hidden_generals: Vec<String>,

    /// Generals that are shown even though their definition is hidden.
    pub removed_hidden_generals: Vec<String>,

    /// Generals excluded from random draws by name.
    pub banned_generals: Vec<String>,

    /// Seed for the engine RNG.
    pub seed: u64,
}

impl EngineConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Append a package to the load order.
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>) -> Self {
        self.package_names.push(name.into());
        self
    }

    /// Ban a package from random draws.
    #[must_use]
    pub fn ban_package(mut self, name: impl Into<String>) -> Self {
        self.ban_packages.push(name.into());
        self
    }

    /// Force a general to be hidden.
    #[must_use]
    pub fn hide_general(mut self, name: impl Into<String>) -> Self {
        self.extra_hidden_generals.push(name.into());
        self
    }

    /// Force a hidden-by-definition general to be shown.
    #[must_use]
    pub fn unhide_general(mut self, name: impl Into<String>) -> Self {
        self.removed_hidden_generals.push(name.into());
        self
    }

    /// Ban a general from random draws.
    #[must_use]
    pub fn ban_general(mut self, name: impl Into<String>) -> Self {
        self.banned_generals.push(name.into());
        self
    }

    /// Set the engine seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether a package is banned.
    #[must_use]
    pub fn is_package_banned(&self, name: &str) -> bool {
        self.ban_packages.iter().any(|p| p == name)
    }

    /// Whether a general is banned by name.
    #[must_use]
    pub fn is_general_banned(&self, name: &str) -> bool {
        self.banned_generals.iter().any(|g| g == name)
    }
}
