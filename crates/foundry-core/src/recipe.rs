//! Recipes and the recipe registry.
//!
//! Queries are deterministic first-match scans in registration order, so
//! overlapping recipes resolve by which was registered first.

use crate::id::{ItemKindId, RecipeId};
use crate::item::ItemStack;
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

/// How an ingredient decides whether a stack satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientMatcher {
    /// Exactly this item kind.
    Exact(ItemKindId),
    /// Any of the listed kinds.
    OneOf(Vec<ItemKindId>),
}

impl IngredientMatcher {
    pub fn matches_kind(&self, kind: ItemKindId) -> bool {
        match self {
            IngredientMatcher::Exact(k) => *k == kind,
            IngredientMatcher::OneOf(kinds) => kinds.contains(&kind),
        }
    }
}

/// One required input: a matcher plus the count consumed per cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub matcher: IngredientMatcher,
    pub quantity: u32,
}

impl Ingredient {
    /// Exact-kind ingredient consuming one item per cycle.
    pub fn exact(kind: ItemKindId) -> Self {
        Self {
            matcher: IngredientMatcher::Exact(kind),
            quantity: 1,
        }
    }

    /// Any-of-kinds ingredient consuming one item per cycle.
    pub fn one_of(kinds: Vec<ItemKindId>) -> Self {
        Self {
            matcher: IngredientMatcher::OneOf(kinds),
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// A stack satisfies an ingredient when the kind matches and the
    /// stack carries at least the consumed quantity.
    pub fn matches(&self, stack: &ItemStack) -> bool {
        stack.count >= self.quantity && self.matcher.matches_kind(stack.kind)
    }
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable external identifier, unique within a registry.
    pub id: String,
    pub inputs: Vec<Ingredient>,
    pub outputs: Vec<ItemStack>,
    /// Base processing duration in ticks. Always at least 1.
    pub process_ticks: u32,
    /// Total energy drained across one unmodified cycle.
    pub energy_cost: u32,
}

impl Recipe {
    /// Energy drained per processing tick, before upgrade modifiers.
    /// Integer division: the remainder is never charged.
    pub fn energy_per_tick(&self) -> u32 {
        self.energy_cost / self.process_ticks
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("recipe id {0:?} is already registered")]
    DuplicateId(String),
    #[error("recipe {0:?} has zero process_ticks")]
    ZeroProcessTicks(String),
    #[error("recipe {0:?} has no inputs")]
    NoInputs(String),
}

/// Append-only recipe table. Registration order is query order.
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
    by_id: HashMap<String, RecipeId>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, recipe: Recipe) -> Result<RecipeId, RegistryError> {
        if self.by_id.contains_key(&recipe.id) {
            return Err(RegistryError::DuplicateId(recipe.id));
        }
        if recipe.process_ticks == 0 {
            return Err(RegistryError::ZeroProcessTicks(recipe.id));
        }
        if recipe.inputs.is_empty() {
            return Err(RegistryError::NoInputs(recipe.id));
        }
        let id = RecipeId(self.recipes.len() as u32);
        self.by_id.insert(recipe.id.clone(), id);
        self.recipes.push(recipe);
        Ok(id)
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.0 as usize)
    }

    pub fn lookup(&self, name: &str) -> Option<RecipeId> {
        self.by_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeId, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, r)| (RecipeId(i as u32), r))
    }

    /// First recipe whose *first* ingredient the stack satisfies. Only
    /// the first ingredient is consulted; single-input machines pair
    /// naturally with single-input recipes.
    pub fn find_recipe(&self, input: &ItemStack) -> Option<(RecipeId, &Recipe)> {
        if input.count == 0 {
            return None;
        }
        self.iter()
            .find(|(_, r)| r.inputs.first().is_some_and(|ing| ing.matches(input)))
    }

    /// First recipe whose ingredient list matches the slot array
    /// position-for-position. The slot count must equal the recipe's
    /// ingredient count exactly; a count mismatch is a silent non-match.
    pub fn find_recipe_multi(&self, inputs: &[Option<ItemStack>]) -> Option<(RecipeId, &Recipe)> {
        self.iter().find(|(_, r)| {
            r.inputs.len() == inputs.len()
                && r.inputs.iter().zip(inputs).all(|(ing, slot)| {
                    slot.as_ref().is_some_and(|stack| ing.matches(stack))
                })
        })
    }
}
