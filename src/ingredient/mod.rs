//! Ingredient layer modules.
//!
//! This module groups the canonical record and the relations that hang off it.

pub mod record;
pub mod relation;

pub use record::{CanonicalIngredient, IngredientId, NewIngredient};
pub use relation::{SubstituteRelation, UnitConversion};
