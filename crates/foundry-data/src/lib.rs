//! Foundry Data -- content definition loading for the foundry core.
//!
//! Reads declarative item and recipe files (RON, JSON, or TOML) from a
//! content directory and resolves them into the core's runtime tables:
//! an [`foundry_core::item::ItemCatalog`], a
//! [`foundry_core::recipe::RecipeRegistry`], and a
//! [`foundry_core::machine::UpgradeSet`].
//!
//! Loading is all-or-nothing at the file level and forgiving at the
//! record level: a malformed recipe is logged and skipped while the
//! rest of the registry loads.

pub mod loader;
pub mod schema;

pub use loader::{Content, DataLoadError, load_content};
