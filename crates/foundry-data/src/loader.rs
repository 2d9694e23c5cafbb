//! Content loading: file discovery, format detection, and resolution of
//! name references into core tables.
//!
//! A content directory holds an `items` file and a `recipes` file, each
//! in RON, JSON, or TOML (detected by extension). File-level problems
//! (missing items file, unparseable file, two formats for one base name)
//! abort the load; a single malformed recipe is reported through
//! `tracing` and skipped, per-recipe, so one bad record never takes the
//! rest of the registry down. Each call builds fresh tables, so a host
//! reloads by calling again and swapping the result in atomically.

use crate::schema::{
    IngredientData, ItemData, OutputData, RecipeData, UpgradeKindData,
};
use foundry_core::fixed::f64_to_fixed64;
use foundry_core::item::{ItemCatalog, ItemStack};
use foundry_core::machine::{UpgradeKind, UpgradeSet, UpgradeSpec};
use foundry_core::recipe::{Ingredient, IngredientMatcher, Recipe, RecipeRegistry};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::warn;

// ===========================================================================
// Errors
// ===========================================================================

/// File-level errors. These abort the whole load.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why one recipe record was rejected. Never fatal; the loader logs the
/// defect and moves on.
#[derive(Debug, thiserror::Error)]
pub enum RecipeDefect {
    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("ingredient declares neither 'item' nor 'one_of'")]
    EmptyMatcher,

    #[error("ingredient declares both 'item' and 'one_of'")]
    AmbiguousMatcher,
}

// ===========================================================================
// Format detection and file discovery
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file from its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Scan a directory for `{base_name}.{ron,toml,json}`. Returns `Ok(None)`
/// when no candidate exists and an error when more than one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }
    Ok(found)
}

fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Read and deserialize a list. RON and JSON files hold a bare list;
/// TOML cannot, so TOML files wrap it in a top-level table under
/// `toml_key`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let content = std::fs::read_to_string(path)?;
    let parse_err = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match detect_format(path)? {
        Format::Ron => ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(&content)
            .map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => {
            let table: toml::Table = toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?;
            let Some(list) = table.get(toml_key) else {
                return Err(parse_err(format!("missing top-level key '{toml_key}'")));
            };
            list.clone()
                .try_into()
                .map_err(|e: toml::de::Error| parse_err(e.to_string()))
        }
    }
}

// ===========================================================================
// Loading and resolution
// ===========================================================================

/// Everything a host needs to run the simulation, built in one load.
#[derive(Debug)]
pub struct Content {
    pub items: ItemCatalog,
    pub recipes: RecipeRegistry,
    pub upgrades: UpgradeSet,
}

/// Load a content directory: a required `items` file and an optional
/// `recipes` file.
pub fn load_content(dir: &Path) -> Result<Content, DataLoadError> {
    let items_path = require_data_file(dir, "items")?;
    let item_rows: Vec<ItemData> = deserialize_list(&items_path, "items")?;

    let mut items = ItemCatalog::new();
    let mut upgrades = UpgradeSet::new();
    for row in item_rows {
        let id = items.register(&row.name);
        if let Some(upgrade) = row.upgrade {
            let kind = match upgrade.kind {
                UpgradeKindData::Speed => UpgradeKind::Speed,
                UpgradeKindData::Energy => UpgradeKind::Energy,
                UpgradeKindData::Output => UpgradeKind::Output,
            };
            upgrades.register(
                id,
                UpgradeSpec {
                    kind,
                    magnitude: f64_to_fixed64(upgrade.magnitude),
                },
            );
        }
    }

    let mut recipes = RecipeRegistry::new();
    if let Some(recipes_path) = find_data_file(dir, "recipes")? {
        let recipe_rows: Vec<RecipeData> = deserialize_list(&recipes_path, "recipes")?;
        for row in recipe_rows {
            let id = row.id.clone();
            match resolve_recipe(&items, row) {
                Ok(recipe) => {
                    if let Err(defect) = recipes.register(recipe) {
                        warn!(recipe = %id, %defect, "skipping recipe");
                    }
                }
                Err(defect) => {
                    warn!(recipe = %id, %defect, "skipping malformed recipe");
                }
            }
        }
    }

    Ok(Content {
        items,
        recipes,
        upgrades,
    })
}

fn resolve_recipe(items: &ItemCatalog, row: RecipeData) -> Result<Recipe, RecipeDefect> {
    let inputs = row
        .inputs
        .into_iter()
        .map(|ing| resolve_ingredient(items, ing))
        .collect::<Result<Vec<_>, _>>()?;
    let outputs = row
        .outputs
        .into_iter()
        .map(|out| resolve_output(items, out))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Recipe {
        id: row.id,
        inputs,
        outputs,
        process_ticks: row.process_time,
        energy_cost: row.energy_required,
    })
}

fn resolve_ingredient(items: &ItemCatalog, ing: IngredientData) -> Result<Ingredient, RecipeDefect> {
    match ing {
        IngredientData::Name(name) => Ok(Ingredient::exact(lookup(items, &name)?)),
        IngredientData::Full(spec) => {
            let matcher = match (spec.item, spec.one_of.is_empty()) {
                (Some(_), false) => return Err(RecipeDefect::AmbiguousMatcher),
                (Some(name), true) => IngredientMatcher::Exact(lookup(items, &name)?),
                (None, true) => return Err(RecipeDefect::EmptyMatcher),
                (None, false) => IngredientMatcher::OneOf(
                    spec.one_of
                        .iter()
                        .map(|name| lookup(items, name))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            };
            Ok(Ingredient {
                matcher,
                quantity: spec.quantity,
            })
        }
    }
}

fn resolve_output(items: &ItemCatalog, out: OutputData) -> Result<ItemStack, RecipeDefect> {
    Ok(ItemStack::new(lookup(items, &out.item)?, out.count))
}

fn lookup(items: &ItemCatalog, name: &str) -> Result<foundry_core::id::ItemKindId, RecipeDefect> {
    items
        .id(name)
        .ok_or_else(|| RecipeDefect::UnknownItem(name.to_string()))
}
