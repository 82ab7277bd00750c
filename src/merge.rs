//! Consolidation of duplicate canonical records.
//!
//! Merging folds a loser record into a winner: the loser's name and
//! aliases become winner aliases, every relation pointing at the loser is
//! re-pointed, and the loser is deleted. All of it happens in one store
//! transaction, so either every step lands or none does.
//!
//! A successful merge cannot be repeated (the loser is gone). A failed one
//! can be retried as-is.

use std::collections::HashSet;
use std::sync::Arc;

use crate::context::CallContext;
use crate::error::{CatalogResult, ValidationError};
use crate::ingredient::{CanonicalIngredient, IngredientId};
use crate::storage::{MergeStore, MergeTransaction, StorageError};

/// Combines winner aliases with the loser's name and aliases.
///
/// Order is winner aliases, then loser name, then loser aliases; only the
/// first occurrence of each string is kept and `winner_name` is excluded.
/// Inputs are assumed normalized already.
#[must_use]
pub fn merge_aliases(
    winner_aliases: &[String],
    loser_name: &str,
    loser_aliases: &[String],
    winner_name: &str,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(winner_aliases.len() + 1 + loser_aliases.len());
    let mut merged = Vec::with_capacity(winner_aliases.len() + 1 + loser_aliases.len());

    let all = winner_aliases
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(loser_name))
        .chain(loser_aliases.iter().map(String::as_str));

    for alias in all {
        if alias == winner_name || !seen.insert(alias) {
            continue;
        }
        merged.push(alias.to_string());
    }
    merged
}

/// Runs merges against the transactional store capability.
pub struct MergeCoordinator {
    store: Arc<dyn MergeStore>,
}

impl MergeCoordinator {
    /// Create a coordinator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn MergeStore>) -> Self {
        Self { store }
    }

    /// Fold `loser` into `winner` and return the updated winner.
    ///
    /// # Errors
    ///
    /// - `Validation(SelfMerge)` when both IDs are the same; the store is not touched.
    /// - `Storage(IngredientNotFound)` when either record is missing; nothing is mutated.
    /// - Any other store error (including cancellation) after the
    ///   transaction has been rolled back.
    pub fn merge(
        &self,
        ctx: &CallContext,
        winner: IngredientId,
        loser: IngredientId,
    ) -> CatalogResult<CanonicalIngredient> {
        if winner == loser {
            return Err(ValidationError::SelfMerge { id: winner }.into());
        }

        let tx = self.store.begin(ctx)?;
        match Self::run(tx, winner, loser) {
            Ok(merged) => {
                tracing::info!(
                    winner = %winner,
                    loser = %loser,
                    aliases = merged.aliases.len(),
                    "merged ingredients"
                );
                Ok(merged)
            }
            Err(err) => {
                tracing::warn!(winner = %winner, loser = %loser, error = %err, "merge rolled back");
                Err(err.into())
            }
        }
    }

    fn run(
        mut tx: Box<dyn MergeTransaction + '_>,
        winner_id: IngredientId,
        loser_id: IngredientId,
    ) -> Result<CanonicalIngredient, StorageError> {
        let winner = tx.get(winner_id)?;
        let loser = tx.get(loser_id)?;

        let aliases = merge_aliases(&winner.aliases, &loser.name, &loser.aliases, &winner.name);
        let merged = tx.update_aliases_and_meta(winner_id, aliases, winner.category, winner.default_unit)?;

        let substitutes = tx.repoint_substitutes(loser_id, winner_id)?;
        let conversions = tx.repoint_unit_conversions(loser_id, winner_id)?;
        tracing::debug!(substitutes, conversions, "re-pointed relations");

        tx.delete(loser_id)?;
        tx.commit()?;
        Ok(merged)
    }
}
