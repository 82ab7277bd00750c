//! Storage layer for pantry-canon.
//!
//! The traits define the contract backends must honour; the in-memory
//! backend implements all of them and can be snapshotted to disk.

mod memory;
mod snapshot;
mod traits;

pub use memory::InMemoryIngredientStore;
pub use snapshot::StoreSnapshot;
pub use traits::{
    IngredientLookup, IngredientStore, InsertOutcome, MergeStore, MergeTransaction, StorageError,
};
