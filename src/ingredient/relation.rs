//! Relations that reference canonical ingredients.

use serde::{Deserialize, Serialize};

use crate::ingredient::IngredientId;

/// `substitute_id` can stand in for `ingredient_id` at the given ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstituteRelation {
    /// The ingredient being replaced.
    pub ingredient_id: IngredientId,
    /// The ingredient used instead.
    pub substitute_id: IngredientId,
    /// Amount of substitute per unit of the original.
    pub ratio: f64,
}

impl SubstituteRelation {
    /// Returns true if either side points at `id`.
    #[must_use]
    pub fn references(&self, id: IngredientId) -> bool {
        self.ingredient_id == id || self.substitute_id == id
    }

    /// Rewrites every side that points at `from` to point at `to`.
    pub fn repoint(&mut self, from: IngredientId, to: IngredientId) {
        if self.ingredient_id == from {
            self.ingredient_id = to;
        }
        if self.substitute_id == from {
            self.substitute_id = to;
        }
    }
}

/// A per-ingredient unit conversion: `1 from_unit = factor to_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    /// The ingredient this conversion applies to.
    pub ingredient_id: IngredientId,
    /// Normalized source unit.
    pub from_unit: String,
    /// Normalized target unit.
    pub to_unit: String,
    /// Multiplier from source to target.
    pub factor: f64,
}
