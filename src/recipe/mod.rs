//! Recipe catalog and ingredient scaling
//!
//! The catalog is loaded once at startup from a JSON document keyed by recipe
//! name. Recipes are immutable afterwards and shared with the session through
//! `Arc`.

mod catalog;
mod image;
mod scale;

pub use catalog::{Recipe, RecipeCatalog, IMAGES_DIR};
pub use image::ImageLoadResult;
pub use scale::{scale_ingredients, Ingredient, ScaledIngredient, Unit};
