use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node (machine, cable, or pipe) in the factory.
    pub struct NodeId;
}

/// Identifies an item kind in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKindId(pub u32);

/// Identifies a recipe by its registration position. Stable for the
/// lifetime of the registry: recipes are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);
