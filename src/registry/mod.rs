//! Content registry: packages, generals and the catalog built from them.
//!
//! ```
//! use rust_hegemony::abilities::Ability;
//! use rust_hegemony::registry::{General, Package, Registry};
//!
//! let package = Package::new("demo")
//!     .with_ability(Ability::max_hand_size("hoard", |_view, _player| 1))
//!     .with_general(General::new("lubu", "qun", 10).with_ability("hoard"));
//!
//! let mut registry = Registry::new();
//! assert!(registry.add_package(package.clone()));
//! assert!(!registry.add_package(package));
//!
//! assert_eq!(registry.ability_count(), 1);
//! assert_eq!(registry.general("lubu").map(|g| g.kingdom()), Some("qun"));
//! ```

mod general;
mod package;
#[allow(clippy::module_inception)]
mod registry;

pub use general::{Gender, General};
pub use package::{Package, PackageCatalog, PackageKind};
pub use registry::Registry;
