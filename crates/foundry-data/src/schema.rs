//! Serde-facing record types for content definition files.
//!
//! These mirror the on-disk shape, not the core types: everything is a
//! name string here, and the loader resolves names into catalog ids.

use serde::Deserialize;

fn default_one() -> u32 {
    1
}

fn default_process_time() -> u32 {
    100
}

fn default_energy_required() -> u32 {
    500
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One item kind declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    /// Present when this item acts as a machine upgrade.
    #[serde(default)]
    pub upgrade: Option<UpgradeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeData {
    pub kind: UpgradeKindData,
    /// Per-unit modifier contribution. Negative for discounts.
    pub magnitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKindData {
    Speed,
    Energy,
    Output,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// One ingredient, in short form (a bare item name, quantity 1) or full
/// form (a table with `item` or `one_of`, plus an optional `quantity`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientData {
    Name(String),
    Full(IngredientSpec),
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientSpec {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub one_of: Vec<String>,
    #[serde(default = "default_one")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputData {
    pub item: String,
    #[serde(default = "default_one")]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub id: String,
    pub inputs: Vec<IngredientData>,
    pub outputs: Vec<OutputData>,
    #[serde(default = "default_process_time")]
    pub process_time: u32,
    #[serde(default = "default_energy_required")]
    pub energy_required: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_defaults_apply() {
        let json = r#"{
            "id": "crush_ore",
            "inputs": ["raw_ore"],
            "outputs": [{"item": "ore_dust"}]
        }"#;
        let recipe: RecipeData = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.process_time, 100);
        assert_eq!(recipe.energy_required, 500);
        assert_eq!(recipe.outputs[0].count, 1);
        assert!(matches!(&recipe.inputs[0], IngredientData::Name(n) if n == "raw_ore"));
    }

    #[test]
    fn full_ingredient_form_parses() {
        let json = r#"{"item": "raw_ore", "quantity": 3}"#;
        let ing: IngredientData = serde_json::from_str(json).unwrap();
        let IngredientData::Full(spec) = ing else {
            panic!("expected full form");
        };
        assert_eq!(spec.item.as_deref(), Some("raw_ore"));
        assert_eq!(spec.quantity, 3);
        assert!(spec.one_of.is_empty());
    }

    #[test]
    fn one_of_ingredient_form_parses() {
        let json = r#"{"one_of": ["raw_ore", "deep_ore"]}"#;
        let IngredientData::Full(spec) = serde_json::from_str(json).unwrap() else {
            panic!("expected full form");
        };
        assert_eq!(spec.one_of, vec!["raw_ore", "deep_ore"]);
        assert_eq!(spec.quantity, 1);
    }

    #[test]
    fn upgrade_kind_uses_snake_case() {
        let item: ItemData = serde_json::from_str(
            r#"{"name": "speed_module", "upgrade": {"kind": "speed", "magnitude": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(item.upgrade.unwrap().kind, UpgradeKindData::Speed);
    }
}
