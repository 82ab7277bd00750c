//! # pantry-canon - canonical ingredient identity
//!
//! pantry-canon pins free-text ingredient names ("Garlic ", "garlc",
//! "garlic clove") to one canonical record per ingredient concept, and lets
//! an operator fold a duplicate record into the one that should survive.
//!
//! ## Core Concepts
//!
//! - **Canonical record**: the authoritative row for one ingredient, with a
//!   unique normalized name and a set of aliases
//! - **Confidence**: a `[0, 1]` edit-distance similarity between a query and a record
//! - **Threshold**: the minimum confidence for accepting a fuzzy match
//!   instead of creating a new record
//! - **Merge**: irreversible, transactional consolidation of a loser record
//!   into a winner, re-pointing every relation first
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pantry_canon::{CallContext, InMemoryIngredientStore, IngredientCatalog, ResolverConfig};
//!
//! let store = Arc::new(InMemoryIngredientStore::new());
//! let catalog = IngredientCatalog::new(store, ResolverConfig::default());
//! let ctx = CallContext::background();
//!
//! let first = catalog.resolve(&ctx, " Garlic ")?;
//! assert!(first.created);
//!
//! let typo = catalog.resolve(&ctx, "garlc")?;
//! assert_eq!(typo.ingredient.id, first.ingredient.id);
//! assert!(!typo.created);
//! # Ok::<(), pantry_canon::CatalogError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Text and scoring
pub mod normalize;
pub mod similarity;

// Data model and errors
pub mod config;
pub mod context;
pub mod error;
pub mod ingredient;

// Storage and orchestration
pub mod catalog;
pub mod merge;
pub mod resolver;
pub mod storage;

#[cfg(feature = "async")]
pub mod runtime;

// Re-export primary types at crate root for convenience
pub use catalog::{CreateIngredient, IngredientCatalog, UpdateIngredient};
pub use config::ResolverConfig;
pub use context::{CallContext, CancelHandle};
pub use error::{CatalogError, CatalogResult, ValidationError};
pub use ingredient::{
    CanonicalIngredient, IngredientId, NewIngredient, SubstituteRelation, UnitConversion,
};
pub use merge::{merge_aliases, MergeCoordinator};
pub use normalize::normalize;
pub use resolver::{best_match, Candidate, Resolution, Resolver};
pub use similarity::{edit_distance, similarity};
pub use storage::{
    InMemoryIngredientStore, IngredientLookup, IngredientStore, InsertOutcome, MergeStore,
    MergeTransaction, StorageError, StoreSnapshot,
};

#[cfg(feature = "async")]
pub use runtime::AsyncCatalog;
