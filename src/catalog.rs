//! The upward-facing ingredient catalog.
//!
//! `IngredientCatalog` is what a request layer talks to. It owns a
//! [`Resolver`] and a [`MergeCoordinator`] and adds the plain record and
//! relation operations, normalizing and validating input before anything
//! reaches the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::context::CallContext;
use crate::error::{CatalogResult, ValidationError};
use crate::ingredient::{
    CanonicalIngredient, IngredientId, NewIngredient, SubstituteRelation, UnitConversion,
};
use crate::merge::MergeCoordinator;
use crate::normalize::{normalize, normalize_aliases, normalize_optional};
use crate::resolver::{Resolution, Resolver};
use crate::storage::{IngredientStore, MergeStore};

/// Request to create a record explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIngredient {
    /// Raw name; normalized before storage.
    pub name: String,
    /// Raw aliases; normalized, deduplicated, and stripped of the name.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Optional category.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional default unit.
    #[serde(default)]
    pub default_unit: Option<String>,
}

/// Replacement aliases and metadata for an existing record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIngredient {
    /// Raw aliases; replaces the current list.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// New category, or `None` to clear it.
    #[serde(default)]
    pub category: Option<String>,
    /// New default unit, or `None` to clear it.
    #[serde(default)]
    pub default_unit: Option<String>,
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Ingredient catalog over a store providing every capability.
pub struct IngredientCatalog {
    store: Arc<dyn IngredientStore>,
    resolver: Resolver,
    merger: MergeCoordinator,
}

impl IngredientCatalog {
    /// Build a catalog; the store is shared by resolver, merge and CRUD.
    #[must_use]
    pub fn new<S>(store: Arc<S>, config: ResolverConfig) -> Self
    where
        S: IngredientStore + MergeStore + 'static,
    {
        Self {
            resolver: Resolver::new(store.clone(), config),
            merger: MergeCoordinator::new(store.clone()),
            store,
        }
    }

    /// The resolver configuration in use.
    #[must_use]
    pub const fn config(&self) -> ResolverConfig {
        self.resolver.config()
    }

    /// Resolve a raw name, creating a record if nothing matches well enough.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve(&self, ctx: &CallContext, raw_name: &str) -> CatalogResult<Resolution> {
        self.resolver.resolve(ctx, raw_name)
    }

    /// Fold `loser` into `winner`.
    ///
    /// # Errors
    ///
    /// See [`MergeCoordinator::merge`].
    pub fn merge(
        &self,
        ctx: &CallContext,
        winner: IngredientId,
        loser: IngredientId,
    ) -> CatalogResult<CanonicalIngredient> {
        self.merger.merge(ctx, winner, loser)
    }

    /// Create a record explicitly.
    ///
    /// # Errors
    ///
    /// `Validation(EmptyName)` for a blank name, `Storage(DuplicateName)`
    /// if the normalized name is taken.
    pub fn create(&self, ctx: &CallContext, req: CreateIngredient) -> CatalogResult<CanonicalIngredient> {
        let name = normalize(&req.name);
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let new = NewIngredient {
            aliases: normalize_aliases(&name, &req.aliases),
            category: normalize_optional(req.category.as_deref()),
            default_unit: normalize_optional(req.default_unit.as_deref()),
            name,
        };
        let created = self.store.insert(ctx, new)?;
        tracing::info!(name = %created.name, id = %created.id, "created ingredient");
        Ok(created)
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// `Storage(IngredientNotFound)` if absent.
    pub fn get(&self, ctx: &CallContext, id: IngredientId) -> CatalogResult<CanonicalIngredient> {
        Ok(self.store.get(ctx, id)?)
    }

    /// Every record, in store enumeration order.
    ///
    /// # Errors
    ///
    /// Store errors only.
    pub fn list(&self, ctx: &CallContext) -> CatalogResult<Vec<CanonicalIngredient>> {
        Ok(self.store.list_all(ctx)?)
    }

    /// Replace a record's aliases and metadata. The name never changes.
    ///
    /// # Errors
    ///
    /// `Storage(IngredientNotFound)` if absent.
    pub fn update(
        &self,
        ctx: &CallContext,
        id: IngredientId,
        req: UpdateIngredient,
    ) -> CatalogResult<CanonicalIngredient> {
        let current = self.store.get(ctx, id)?;
        let aliases = normalize_aliases(&current.name, &req.aliases);
        Ok(self.store.update_aliases_and_meta(
            ctx,
            id,
            aliases,
            normalize_optional(req.category.as_deref()),
            normalize_optional(req.default_unit.as_deref()),
        )?)
    }

    /// Delete a record along with every relation that references it.
    ///
    /// # Errors
    ///
    /// `Storage(IngredientNotFound)` if absent.
    pub fn delete(&self, ctx: &CallContext, id: IngredientId) -> CatalogResult<()> {
        self.store.delete(ctx, id)?;
        tracing::info!(id = %id, "deleted ingredient");
        Ok(())
    }

    /// Record that `substitute` can replace `ingredient` at `ratio`.
    ///
    /// Re-adding an existing pair updates its ratio.
    ///
    /// # Errors
    ///
    /// Validation errors for a self-substitution or a non-positive ratio;
    /// `Storage(IngredientNotFound)` if either record is missing.
    pub fn add_substitute(
        &self,
        ctx: &CallContext,
        ingredient: IngredientId,
        substitute: IngredientId,
        ratio: f64,
    ) -> CatalogResult<SubstituteRelation> {
        if ingredient == substitute {
            return Err(ValidationError::SelfSubstitute { id: ingredient }.into());
        }
        if !positive_finite(ratio) {
            return Err(ValidationError::InvalidRatio { value: ratio }.into());
        }
        let relation = SubstituteRelation {
            ingredient_id: ingredient,
            substitute_id: substitute,
            ratio,
        };
        self.store.add_substitute(ctx, relation.clone())?;
        Ok(relation)
    }

    /// Substitutes registered for `id`.
    ///
    /// # Errors
    ///
    /// `Storage(IngredientNotFound)` if absent.
    pub fn substitutes(&self, ctx: &CallContext, id: IngredientId) -> CatalogResult<Vec<SubstituteRelation>> {
        Ok(self.store.list_substitutes(ctx, id)?)
    }

    /// Record `1 from_unit = factor to_unit` for `ingredient`.
    ///
    /// Re-adding an existing unit pair updates its factor.
    ///
    /// # Errors
    ///
    /// Validation errors for blank units or a non-positive factor;
    /// `Storage(IngredientNotFound)` if the record is missing.
    pub fn add_unit_conversion(
        &self,
        ctx: &CallContext,
        ingredient: IngredientId,
        from_unit: &str,
        to_unit: &str,
        factor: f64,
    ) -> CatalogResult<UnitConversion> {
        let from_unit = normalize(from_unit);
        let to_unit = normalize(to_unit);
        if from_unit.is_empty() || to_unit.is_empty() {
            return Err(ValidationError::EmptyUnit.into());
        }
        if !positive_finite(factor) {
            return Err(ValidationError::InvalidFactor { value: factor }.into());
        }
        let conversion = UnitConversion {
            ingredient_id: ingredient,
            from_unit,
            to_unit,
            factor,
        };
        self.store.add_unit_conversion(ctx, conversion.clone())?;
        Ok(conversion)
    }

    /// Unit conversions owned by `id`.
    ///
    /// # Errors
    ///
    /// `Storage(IngredientNotFound)` if absent.
    pub fn unit_conversions(&self, ctx: &CallContext, id: IngredientId) -> CatalogResult<Vec<UnitConversion>> {
        Ok(self.store.list_unit_conversions(ctx, id)?)
    }
}
