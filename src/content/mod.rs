//! Built-in content packages.
//!
//! ```
//! use rust_hegemony::content::builtin_catalog;
//! use rust_hegemony::core::EngineConfig;
//! use rust_hegemony::registry::Registry;
//!
//! let config = EngineConfig::new().with_package("standard");
//! let registry = Registry::from_config(config, &builtin_catalog());
//!
//! assert!(registry.general("guanyu").is_some());
//! assert!(registry.ability("martial_saint").is_some());
//! assert!(registry.card_count() > 0);
//! ```

pub mod standard;

use crate::registry::PackageCatalog;

pub use standard::standard_package;

/// Every built-in package constructor, by name.
#[must_use]
pub fn builtin_catalog() -> PackageCatalog {
    PackageCatalog::new().with(standard::STANDARD, standard_package)
}
