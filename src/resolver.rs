//! Free-text name resolution.
//!
//! A raw name is normalized, matched against every canonical record's name
//! and aliases, and either pinned to the best match or written through as a
//! new record. Concurrent callers racing on the same unseen name all end up
//! with the single record the store let through.
//!
//! The candidate scan is exhaustive, O(records) per call. Swapping in an
//! indexed candidate set could change which record wins a score tie.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::context::CallContext;
use crate::error::{CatalogResult, ValidationError};
use crate::ingredient::{CanonicalIngredient, NewIngredient};
use crate::normalize::normalize;
use crate::similarity::similarity;
use crate::storage::{IngredientLookup, InsertOutcome};

/// Outcome of resolving one name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The canonical record the name resolved to.
    pub ingredient: CanonicalIngredient,
    /// Match confidence in `[0, 1]`; 1.0 for exact hits and new records.
    pub confidence: f64,
    /// True only for the caller whose write created the record.
    pub created: bool,
}

/// Best candidate found by [`best_match`].
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The matching record.
    pub ingredient: CanonicalIngredient,
    /// Its score against the query.
    pub score: f64,
    /// True when the query equals the name or an alias.
    pub exact: bool,
}

/// Scores `normalized` against each record's name and aliases.
///
/// The first exact hit is returned immediately. Otherwise the highest
/// scoring record wins, and a later record displaces the current best only
/// on a strictly greater score, so ties go to the earlier one.
#[must_use]
pub fn best_match<I>(normalized: &str, candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = CanonicalIngredient>,
{
    let mut best: Option<Candidate> = None;

    for ingredient in candidates {
        if ingredient.is_known_as(normalized) {
            return Some(Candidate {
                ingredient,
                score: 1.0,
                exact: true,
            });
        }

        let score = ingredient
            .surface_forms()
            .map(|form| similarity(normalized, form))
            .fold(0.0_f64, f64::max);

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(Candidate {
                ingredient,
                score,
                exact: false,
            });
        }
    }

    best
}

/// Resolves raw names to canonical records.
///
/// Stateless between calls; the only shared state is the store.
pub struct Resolver {
    store: Arc<dyn IngredientLookup>,
    config: ResolverConfig,
}

impl Resolver {
    /// Create a resolver over the given lookup capability.
    #[must_use]
    pub fn new(store: Arc<dyn IngredientLookup>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    /// The configuration this resolver was built with.
    #[must_use]
    pub const fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Resolve `raw` to a canonical record, creating one if nothing scores
    /// at or above the threshold.
    ///
    /// # Errors
    ///
    /// - `Validation(EmptyName)` if `raw` normalizes to an empty string;
    ///   the store is not touched.
    /// - Any store error, unmodified. The only internal retry is the
    ///   exact-name fetch after losing a creation race.
    pub fn resolve(&self, ctx: &CallContext, raw: &str) -> CatalogResult<Resolution> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let candidates = self.store.list_all(ctx)?;
        if let Some(best) = best_match(&normalized, candidates) {
            if best.exact {
                tracing::debug!(name = %normalized, id = %best.ingredient.id, "exact match");
                return Ok(Resolution {
                    ingredient: best.ingredient,
                    confidence: 1.0,
                    created: false,
                });
            }
            if best.score >= self.config.threshold() {
                tracing::debug!(
                    name = %normalized,
                    id = %best.ingredient.id,
                    matched = %best.ingredient.name,
                    confidence = best.score,
                    "fuzzy match"
                );
                return Ok(Resolution {
                    ingredient: best.ingredient,
                    confidence: best.score,
                    created: false,
                });
            }
        }

        self.write_through(ctx, normalized)
    }

    fn write_through(&self, ctx: &CallContext, normalized: String) -> CatalogResult<Resolution> {
        match self
            .store
            .insert_if_absent(ctx, NewIngredient::named(normalized.clone()))?
        {
            InsertOutcome::Created(ingredient) => {
                tracing::info!(name = %ingredient.name, id = %ingredient.id, "created ingredient");
                Ok(Resolution {
                    ingredient,
                    confidence: 1.0,
                    created: true,
                })
            }
            InsertOutcome::AlreadyExists => {
                tracing::debug!(name = %normalized, "lost creation race, fetching existing record");
                let ingredient = self.store.get_by_name(ctx, &normalized)?;
                Ok(Resolution {
                    ingredient,
                    confidence: 1.0,
                    created: false,
                })
            }
        }
    }
}
