use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::image::ImageLoadResult;

/// Step images live here, next to the catalog file
pub const IMAGES_DIR: &str = "images";

/// A single recipe as stored in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Unique catalog key
    pub name: String,
    /// Ordered step instructions
    pub steps: Vec<String>,
    /// One image per step (resolved against the catalog directory); `None`
    /// where the document had no usable path
    pub images: Vec<Option<PathBuf>>,
    /// Raw ingredient lines, e.g. "200g flour"
    pub ingredients: Vec<String>,
    /// Number of servings the ingredient list is written for (>= 1)
    pub base_servings: u32,
}

impl Recipe {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&str> {
        self.steps.get(index).map(String::as_str)
    }

    /// Look up the image for a step
    ///
    /// Out-of-range indices and files that are not on disk both degrade to
    /// `Missing`.
    pub fn image(&self, index: usize) -> ImageLoadResult {
        match self.images.get(index) {
            Some(Some(path)) if path.is_file() => ImageLoadResult::Found(path.clone()),
            _ => ImageLoadResult::Missing,
        }
    }
}

/// Catalog entry as it appears in the JSON document
///
/// Only `steps` is strict. The optional fields are read leniently so a
/// badly typed extra never drops the whole recipe.
#[derive(Debug, Deserialize)]
struct RecipeEntry {
    steps: Vec<String>,
    #[serde(default)]
    images: Value,
    #[serde(default)]
    ingredients: Value,
    #[serde(default)]
    servings: Value,
}

fn parse_images(name: &str, value: Value) -> Vec<Option<PathBuf>> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::String(path) if !path.is_empty() => Some(PathBuf::from(path)),
                other => {
                    warn!("Recipe {:?} image {} is not a path: {}", name, idx + 1, other);
                    None
                }
            })
            .collect(),
        other => {
            warn!("Recipe {:?} images is not a list: {}", name, other);
            Vec::new()
        }
    }
}

fn parse_ingredients(name: &str, value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(line) => Some(line),
                other => {
                    warn!("Recipe {:?} skipping ingredient {}", name, other);
                    None
                }
            })
            .collect(),
        other => {
            warn!("Recipe {:?} ingredients is not a list: {}", name, other);
            Vec::new()
        }
    }
}

/// Declared servings, or 1 when absent or unusable
fn parse_servings(name: &str, value: &Value) -> u32 {
    let servings = match value {
        Value::Null => return 1,
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match servings.and_then(|n| u32::try_from(n).ok()) {
        Some(n) if n > 0 => n,
        _ => {
            warn!("Recipe {:?} has unusable servings {}, using 1", name, value);
            1
        }
    }
}

/// All recipes known to this process, in document order
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Arc<Recipe>>,
    root: PathBuf,
}

impl RecipeCatalog {
    /// Load the catalog from a JSON file
    ///
    /// Relative image paths are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading recipe catalog: {}", path.display());

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe catalog {}", path.display()))?;

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let catalog = Self::from_json(&json, root)?;

        info!("Recipe catalog loaded: {} recipes", catalog.len());

        Ok(catalog)
    }

    /// Parse a catalog document
    ///
    /// Entries that fail to deserialize or have no steps are skipped with a
    /// warning so that one bad recipe never takes the others down.
    pub fn from_json(json: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let document: Value =
            serde_json::from_str(json).context("Recipe catalog is not valid JSON")?;

        let Value::Object(entries) = document else {
            bail!("Recipe catalog must be a JSON object keyed by recipe name");
        };

        let mut recipes = Vec::with_capacity(entries.len());

        for (name, value) in entries {
            let entry: RecipeEntry = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping malformed recipe {:?}: {}", name, e);
                    continue;
                }
            };

            if entry.steps.is_empty() {
                warn!("Skipping recipe {:?}: no steps", name);
                continue;
            }

            let images: Vec<Option<PathBuf>> = parse_images(&name, entry.images)
                .into_iter()
                .map(|p| p.map(|p| if p.is_relative() { root.join(p) } else { p }))
                .collect();

            if images.len() != entry.steps.len() {
                warn!(
                    "Recipe {:?} has {} steps but {} images; missing images will show a placeholder",
                    name,
                    entry.steps.len(),
                    images.len()
                );
            }

            let ingredients = parse_ingredients(&name, entry.ingredients);
            let base_servings = parse_servings(&name, &entry.servings);

            recipes.push(Arc::new(Recipe {
                name,
                steps: entry.steps,
                images,
                ingredients,
                base_servings,
            }));
        }

        Ok(Self { recipes, root })
    }

    /// Recipe names in catalog order (selector contents)
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Recipe>> {
        self.recipes.iter().find(|r| r.name == name).cloned()
    }

    pub fn first(&self) -> Option<Arc<Recipe>> {
        self.recipes.first().cloned()
    }

    /// Directory relative image paths were resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory served to displays for step images
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
