//! Abstract storage traits for pantry-canon.
//!
//! The store is split by capability so each component depends only on what
//! it exercises:
//! - [`IngredientLookup`] for the resolver's scan and write-through path
//! - [`MergeStore`] / [`MergeTransaction`] for consolidation
//! - [`IngredientStore`] for the catalog's CRUD and relation surface
//!
//! Backends own persistence and uniqueness enforcement. Callers treat their
//! answers, including "someone else created that name first", as final.

use thiserror::Error;

use crate::context::CallContext;
use crate::ingredient::{
    CanonicalIngredient, IngredientId, NewIngredient, SubstituteRelation, UnitConversion,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record with this ID.
    #[error("Ingredient not found: {0}")]
    IngredientNotFound(IngredientId),

    /// No record with this exact name.
    #[error("Ingredient not found by name: {0}")]
    NameNotFound(String),

    /// Name uniqueness would be violated.
    #[error("Duplicate ingredient name: {0}")]
    DuplicateName(String),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// The caller's deadline passed.
    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result of an insert-if-absent.
///
/// `AlreadyExists` is an expected race outcome, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// A new row was written.
    Created(CanonicalIngredient),
    /// A record with that name already exists; nothing was written.
    AlreadyExists,
}

/// Read and write-through capability used by the resolver.
pub trait IngredientLookup: Send + Sync {
    /// Full snapshot of every canonical record, no pagination.
    ///
    /// Order is backend-defined. It decides score ties, so backends should
    /// keep it stable across calls.
    fn list_all(&self, ctx: &CallContext) -> Result<Vec<CanonicalIngredient>, StorageError>;

    /// Get a record by ID. `IngredientNotFound` if absent.
    fn get(&self, ctx: &CallContext, id: IngredientId) -> Result<CanonicalIngredient, StorageError>;

    /// Get a record by exact (already normalized) name. `NameNotFound` if absent.
    fn get_by_name(&self, ctx: &CallContext, name: &str) -> Result<CanonicalIngredient, StorageError>;

    /// Atomically create `new` unless a record with that name exists.
    fn insert_if_absent(
        &self,
        ctx: &CallContext,
        new: NewIngredient,
    ) -> Result<InsertOutcome, StorageError>;
}

/// One open merge transaction.
///
/// Nothing done through a transaction is visible to other callers until
/// [`MergeTransaction::commit`] succeeds. Dropping it uncommitted rolls
/// every step back.
pub trait MergeTransaction {
    /// Get a record by ID as seen inside the transaction.
    fn get(&mut self, id: IngredientId) -> Result<CanonicalIngredient, StorageError>;

    /// Replace aliases and metadata of `id`.
    fn update_aliases_and_meta(
        &mut self,
        id: IngredientId,
        aliases: Vec<String>,
        category: Option<String>,
        default_unit: Option<String>,
    ) -> Result<CanonicalIngredient, StorageError>;

    /// Rewrite every substitute relation that has `from` on either side.
    /// Returns the number of relations touched.
    fn repoint_substitutes(&mut self, from: IngredientId, to: IngredientId) -> Result<usize, StorageError>;

    /// Rewrite every unit conversion owned by `from`.
    /// Returns the number of relations touched.
    fn repoint_unit_conversions(
        &mut self,
        from: IngredientId,
        to: IngredientId,
    ) -> Result<usize, StorageError>;

    /// Delete a record, cascading to relations still referencing it.
    fn delete(&mut self, id: IngredientId) -> Result<(), StorageError>;

    /// Publish every step atomically.
    fn commit(self: Box<Self>) -> Result<(), StorageError>;
}

/// Transactional capability used exclusively by merge.
pub trait MergeStore: Send + Sync {
    /// Open a transaction bound to `ctx`; the context is re-checked before
    /// every step and before commit.
    fn begin<'a>(&'a self, ctx: &'a CallContext) -> Result<Box<dyn MergeTransaction + 'a>, StorageError>;
}

/// CRUD and relation capability used by the catalog.
pub trait IngredientStore: IngredientLookup {
    /// Insert a new record. `DuplicateName` if the name is taken.
    fn insert(&self, ctx: &CallContext, new: NewIngredient) -> Result<CanonicalIngredient, StorageError>;

    /// Replace aliases and metadata of an existing record.
    fn update_aliases_and_meta(
        &self,
        ctx: &CallContext,
        id: IngredientId,
        aliases: Vec<String>,
        category: Option<String>,
        default_unit: Option<String>,
    ) -> Result<CanonicalIngredient, StorageError>;

    /// Delete a record and cascade its relations.
    fn delete(&self, ctx: &CallContext, id: IngredientId) -> Result<(), StorageError>;

    /// Record a substitution. Both IDs must exist.
    fn add_substitute(&self, ctx: &CallContext, relation: SubstituteRelation) -> Result<(), StorageError>;

    /// Substitutions where `id` is the ingredient being replaced.
    fn list_substitutes(
        &self,
        ctx: &CallContext,
        id: IngredientId,
    ) -> Result<Vec<SubstituteRelation>, StorageError>;

    /// Record a unit conversion. The ingredient must exist.
    fn add_unit_conversion(&self, ctx: &CallContext, conversion: UnitConversion) -> Result<(), StorageError>;

    /// Conversions owned by `id`.
    fn list_unit_conversions(
        &self,
        ctx: &CallContext,
        id: IngredientId,
    ) -> Result<Vec<UnitConversion>, StorageError>;
}
