//! In-memory storage backend.
//!
//! This module provides a thread-safe in-memory implementation of every
//! storage trait. It is intended for embedded usage, tests, and as a
//! reference for what a database backend must guarantee:
//! - name uniqueness checked and enforced under one write lock
//! - deleting a record cascades to the relations that reference it
//! - merge transactions stage changes and publish them only on commit

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockWriteGuard};

use crate::context::CallContext;
use crate::ingredient::{
    CanonicalIngredient, IngredientId, NewIngredient, SubstituteRelation, UnitConversion,
};
use crate::storage::snapshot::StoreSnapshot;
use crate::storage::traits::{
    IngredientLookup, IngredientStore, InsertOutcome, MergeStore, MergeTransaction, StorageError,
};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// Relation ratios and factors are finite and positive.
fn check_positive(field: &'static str, value: f64) -> Result<(), StorageError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StorageError::BackendError(format!(
            "{field} {value} must be finite and positive"
        )))
    }
}

#[derive(Debug, Default, Clone)]
struct CatalogState {
    by_id: HashMap<IngredientId, CanonicalIngredient>,
    by_name: HashMap<String, IngredientId>,
    /// Insertion order; `list_all` enumerates in this order.
    order: Vec<IngredientId>,
    substitutes: Vec<SubstituteRelation>,
    conversions: Vec<UnitConversion>,
}

impl CatalogState {
    fn get(&self, id: IngredientId) -> Result<&CanonicalIngredient, StorageError> {
        self.by_id.get(&id).ok_or(StorageError::IngredientNotFound(id))
    }

    /// The name must not appear among the aliases and aliases must be
    /// pairwise distinct.
    fn check_aliases(name: &str, aliases: &[String]) -> Result<(), StorageError> {
        if aliases.iter().any(|a| a == name) {
            return Err(StorageError::BackendError(format!(
                "alias list for {name:?} contains its own name"
            )));
        }
        let mut seen = HashSet::with_capacity(aliases.len());
        if let Some(dup) = aliases.iter().find(|a| !seen.insert(a.as_str())) {
            return Err(StorageError::BackendError(format!(
                "alias list for {name:?} repeats {dup:?}"
            )));
        }
        Ok(())
    }

    fn insert_record(&mut self, record: CanonicalIngredient) {
        self.by_name.insert(record.name.clone(), record.id);
        self.order.push(record.id);
        self.by_id.insert(record.id, record);
    }

    fn update_aliases_and_meta(
        &mut self,
        id: IngredientId,
        aliases: Vec<String>,
        category: Option<String>,
        default_unit: Option<String>,
    ) -> Result<CanonicalIngredient, StorageError> {
        let record = self
            .by_id
            .get_mut(&id)
            .ok_or(StorageError::IngredientNotFound(id))?;

        Self::check_aliases(&record.name, &aliases)?;

        record.aliases = aliases;
        record.category = category;
        record.default_unit = default_unit;
        Ok(record.clone())
    }

    /// Removes the record and every relation that still references it.
    fn delete(&mut self, id: IngredientId) -> Result<(), StorageError> {
        let removed = self
            .by_id
            .remove(&id)
            .ok_or(StorageError::IngredientNotFound(id))?;
        self.by_name.remove(&removed.name);
        self.order.retain(|x| *x != id);
        self.substitutes.retain(|s| !s.references(id));
        self.conversions.retain(|c| c.ingredient_id != id);
        Ok(())
    }

    /// Re-points substitutes from `from` to `to`.
    ///
    /// A re-pointed relation is dropped when it would become a
    /// self-substitution or duplicate a pair `to` already has.
    fn repoint_substitutes(&mut self, from: IngredientId, to: IngredientId) -> usize {
        let mut pairs: HashSet<(IngredientId, IngredientId)> = self
            .substitutes
            .iter()
            .filter(|s| !s.references(from))
            .map(|s| (s.ingredient_id, s.substitute_id))
            .collect();

        let mut touched = 0;
        self.substitutes.retain_mut(|s| {
            if !s.references(from) {
                return true;
            }
            touched += 1;
            s.repoint(from, to);
            s.ingredient_id != s.substitute_id && pairs.insert((s.ingredient_id, s.substitute_id))
        });
        touched
    }

    /// Re-points unit conversions from `from` to `to`; conversions `to`
    /// already defines for the same unit pair win.
    fn repoint_unit_conversions(&mut self, from: IngredientId, to: IngredientId) -> usize {
        let mut keys: HashSet<(String, String)> = self
            .conversions
            .iter()
            .filter(|c| c.ingredient_id == to)
            .map(|c| (c.from_unit.clone(), c.to_unit.clone()))
            .collect();

        let mut touched = 0;
        self.conversions.retain_mut(|c| {
            if c.ingredient_id != from {
                return true;
            }
            touched += 1;
            c.ingredient_id = to;
            keys.insert((c.from_unit.clone(), c.to_unit.clone()))
        });
        touched
    }
}

/// Thread-safe in-memory ingredient store.
#[derive(Debug, Default)]
pub struct InMemoryIngredientStore {
    state: RwLock<CatalogState>,
}

impl InMemoryIngredientStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of canonical records.
    ///
    /// # Errors
    ///
    /// Fails only if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("ingredient.len"))?;
        Ok(state.order.len())
    }

    /// Returns true if the store holds no records.
    ///
    /// # Errors
    ///
    /// Fails only if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Every substitute relation, in insertion order.
    ///
    /// # Errors
    ///
    /// Fails only if the lock is poisoned.
    pub fn all_substitutes(&self) -> Result<Vec<SubstituteRelation>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("substitute.all"))?;
        Ok(state.substitutes.clone())
    }

    /// Every unit conversion, in insertion order.
    ///
    /// # Errors
    ///
    /// Fails only if the lock is poisoned.
    pub fn all_unit_conversions(&self) -> Result<Vec<UnitConversion>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("conversion.all"))?;
        Ok(state.conversions.clone())
    }

    /// Copies the full store contents.
    ///
    /// # Errors
    ///
    /// Fails only if the lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("ingredient.snapshot"))?;
        let ingredients = state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect();
        Ok(StoreSnapshot {
            ingredients,
            substitutes: state.substitutes.clone(),
            unit_conversions: state.conversions.clone(),
        })
    }

    /// Builds a store from a snapshot after checking its invariants.
    ///
    /// # Errors
    ///
    /// `BackendError` if names collide, an alias list is malformed, or a
    /// relation references a missing record.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StorageError> {
        snapshot.validate()?;

        let mut state = CatalogState::default();
        for record in snapshot.ingredients {
            state.insert_record(record);
        }
        state.substitutes = snapshot.substitutes;
        state.conversions = snapshot.unit_conversions;

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

impl IngredientLookup for InMemoryIngredientStore {
    fn list_all(&self, ctx: &CallContext) -> Result<Vec<CanonicalIngredient>, StorageError> {
        ctx.check()?;
        let state = self.state.read().map_err(|_| lock_err("ingredient.list_all"))?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect())
    }

    fn get(&self, ctx: &CallContext, id: IngredientId) -> Result<CanonicalIngredient, StorageError> {
        ctx.check()?;
        let state = self.state.read().map_err(|_| lock_err("ingredient.get"))?;
        state.get(id).cloned()
    }

    fn get_by_name(&self, ctx: &CallContext, name: &str) -> Result<CanonicalIngredient, StorageError> {
        ctx.check()?;
        let state = self.state.read().map_err(|_| lock_err("ingredient.get_by_name"))?;
        state
            .by_name
            .get(name)
            .and_then(|id| state.by_id.get(id))
            .cloned()
            .ok_or_else(|| StorageError::NameNotFound(name.to_string()))
    }

    fn insert_if_absent(
        &self,
        ctx: &CallContext,
        new: NewIngredient,
    ) -> Result<InsertOutcome, StorageError> {
        ctx.check()?;
        CatalogState::check_aliases(&new.name, &new.aliases)?;
        let mut state = self.state.write().map_err(|_| lock_err("ingredient.insert_if_absent"))?;
        if state.by_name.contains_key(&new.name) {
            return Ok(InsertOutcome::AlreadyExists);
        }

        let record = CanonicalIngredient::from_new(new);
        state.insert_record(record.clone());
        Ok(InsertOutcome::Created(record))
    }
}

impl IngredientStore for InMemoryIngredientStore {
    fn insert(&self, ctx: &CallContext, new: NewIngredient) -> Result<CanonicalIngredient, StorageError> {
        match self.insert_if_absent(ctx, new.clone())? {
            InsertOutcome::Created(record) => Ok(record),
            InsertOutcome::AlreadyExists => Err(StorageError::DuplicateName(new.name)),
        }
    }

    fn update_aliases_and_meta(
        &self,
        ctx: &CallContext,
        id: IngredientId,
        aliases: Vec<String>,
        category: Option<String>,
        default_unit: Option<String>,
    ) -> Result<CanonicalIngredient, StorageError> {
        ctx.check()?;
        let mut state = self.state.write().map_err(|_| lock_err("ingredient.update"))?;
        state.update_aliases_and_meta(id, aliases, category, default_unit)
    }

    fn delete(&self, ctx: &CallContext, id: IngredientId) -> Result<(), StorageError> {
        ctx.check()?;
        let mut state = self.state.write().map_err(|_| lock_err("ingredient.delete"))?;
        state.delete(id)
    }

    fn add_substitute(&self, ctx: &CallContext, relation: SubstituteRelation) -> Result<(), StorageError> {
        ctx.check()?;
        if relation.ingredient_id == relation.substitute_id {
            return Err(StorageError::BackendError(format!(
                "{} cannot substitute for itself",
                relation.ingredient_id
            )));
        }
        check_positive("ratio", relation.ratio)?;
        let mut state = self.state.write().map_err(|_| lock_err("substitute.add"))?;
        state.get(relation.ingredient_id)?;
        state.get(relation.substitute_id)?;

        if let Some(existing) = state.substitutes.iter_mut().find(|s| {
            s.ingredient_id == relation.ingredient_id && s.substitute_id == relation.substitute_id
        }) {
            existing.ratio = relation.ratio;
        } else {
            state.substitutes.push(relation);
        }
        Ok(())
    }

    fn list_substitutes(
        &self,
        ctx: &CallContext,
        id: IngredientId,
    ) -> Result<Vec<SubstituteRelation>, StorageError> {
        ctx.check()?;
        let state = self.state.read().map_err(|_| lock_err("substitute.list"))?;
        state.get(id)?;
        Ok(state
            .substitutes
            .iter()
            .filter(|s| s.ingredient_id == id)
            .cloned()
            .collect())
    }

    fn add_unit_conversion(&self, ctx: &CallContext, conversion: UnitConversion) -> Result<(), StorageError> {
        ctx.check()?;
        check_positive("factor", conversion.factor)?;
        let mut state = self.state.write().map_err(|_| lock_err("conversion.add"))?;
        state.get(conversion.ingredient_id)?;

        if let Some(existing) = state.conversions.iter_mut().find(|c| {
            c.ingredient_id == conversion.ingredient_id
                && c.from_unit == conversion.from_unit
                && c.to_unit == conversion.to_unit
        }) {
            existing.factor = conversion.factor;
        } else {
            state.conversions.push(conversion);
        }
        Ok(())
    }

    fn list_unit_conversions(
        &self,
        ctx: &CallContext,
        id: IngredientId,
    ) -> Result<Vec<UnitConversion>, StorageError> {
        ctx.check()?;
        let state = self.state.read().map_err(|_| lock_err("conversion.list"))?;
        state.get(id)?;
        Ok(state
            .conversions
            .iter()
            .filter(|c| c.ingredient_id == id)
            .cloned()
            .collect())
    }
}

/// Merge transaction over [`InMemoryIngredientStore`].
///
/// Holds the write lock for its whole lifetime and mutates a private
/// working copy; commit swaps the copy in, drop discards it.
struct InMemoryMergeTransaction<'a> {
    guard: RwLockWriteGuard<'a, CatalogState>,
    working: CatalogState,
    ctx: &'a CallContext,
}

impl MergeTransaction for InMemoryMergeTransaction<'_> {
    fn get(&mut self, id: IngredientId) -> Result<CanonicalIngredient, StorageError> {
        self.ctx.check()?;
        self.working.get(id).cloned()
    }

    fn update_aliases_and_meta(
        &mut self,
        id: IngredientId,
        aliases: Vec<String>,
        category: Option<String>,
        default_unit: Option<String>,
    ) -> Result<CanonicalIngredient, StorageError> {
        self.ctx.check()?;
        self.working
            .update_aliases_and_meta(id, aliases, category, default_unit)
    }

    fn repoint_substitutes(&mut self, from: IngredientId, to: IngredientId) -> Result<usize, StorageError> {
        self.ctx.check()?;
        self.working.get(to)?;
        Ok(self.working.repoint_substitutes(from, to))
    }

    fn repoint_unit_conversions(
        &mut self,
        from: IngredientId,
        to: IngredientId,
    ) -> Result<usize, StorageError> {
        self.ctx.check()?;
        self.working.get(to)?;
        Ok(self.working.repoint_unit_conversions(from, to))
    }

    fn delete(&mut self, id: IngredientId) -> Result<(), StorageError> {
        self.ctx.check()?;
        self.working.delete(id)
    }

    fn commit(self: Box<Self>) -> Result<(), StorageError> {
        self.ctx.check()?;
        let Self {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

impl MergeStore for InMemoryIngredientStore {
    fn begin<'a>(&'a self, ctx: &'a CallContext) -> Result<Box<dyn MergeTransaction + 'a>, StorageError> {
        ctx.check()?;
        let guard = self.state.write().map_err(|_| lock_err("merge.begin"))?;
        let working = guard.clone();
        Ok(Box::new(InMemoryMergeTransaction {
            guard,
            working,
            ctx,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CallContext {
        CallContext::background()
    }

    fn seed(store: &InMemoryIngredientStore, name: &str, aliases: &[&str]) -> CanonicalIngredient {
        store
            .insert(
                &ctx(),
                NewIngredient {
                    name: name.to_string(),
                    aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
                    ..NewIngredient::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn insert_get_and_name_index() {
        let store = InMemoryIngredientStore::new();
        let garlic = seed(&store, "garlic", &["garlic clove"]);

        assert_eq!(store.get(&ctx(), garlic.id).unwrap(), garlic);
        assert_eq!(store.get_by_name(&ctx(), "garlic").unwrap().id, garlic.id);
        assert!(matches!(
            store.get_by_name(&ctx(), "garlic clove"),
            Err(StorageError::NameNotFound(_))
        ));
        assert!(matches!(
            store.insert(&ctx(), NewIngredient::named("garlic")),
            Err(StorageError::DuplicateName(ref n)) if n == "garlic"
        ));
    }

    #[test]
    fn list_all_keeps_insertion_order() {
        let store = InMemoryIngredientStore::new();
        let names = ["salt", "pepper", "garlic", "butter"];
        for name in names {
            seed(&store, name, &[]);
        }
        let listed: Vec<String> = store
            .list_all(&ctx())
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn insert_if_absent_reports_existing_name() {
        let store = InMemoryIngredientStore::new();
        let first = store.insert_if_absent(&ctx(), NewIngredient::named("salt")).unwrap();
        assert!(matches!(first, InsertOutcome::Created(ref r) if r.name == "salt"));

        let second = store.insert_if_absent(&ctx(), NewIngredient::named("salt")).unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_malformed_aliases() {
        let store = InMemoryIngredientStore::new();
        let aliases = |list: &[&str]| NewIngredient {
            name: "salt".to_string(),
            aliases: list.iter().map(|a| (*a).to_string()).collect(),
            ..NewIngredient::default()
        };

        for bad in [&["salt", "sel"][..], &["sel", "sel"][..]] {
            assert!(matches!(
                store.insert_if_absent(&ctx(), aliases(bad)),
                Err(StorageError::BackendError(_))
            ));
            assert!(matches!(
                store.insert(&ctx(), aliases(bad)),
                Err(StorageError::BackendError(_))
            ));
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn accepted_state_always_reloads() {
        let store = InMemoryIngredientStore::new();
        let butter = seed(&store, "butter", &["sweet butter"]);
        let ghee = seed(&store, "ghee", &[]);

        let _ = store.insert(
            &ctx(),
            NewIngredient {
                name: "salt".to_string(),
                aliases: vec!["salt".to_string(), "sel".to_string(), "sel".to_string()],
                ..NewIngredient::default()
            },
        );
        for (substitute_id, ratio) in [(butter.id, 1.0), (ghee.id, f64::NAN), (ghee.id, -1.0)] {
            let _ = store.add_substitute(
                &ctx(),
                SubstituteRelation {
                    ingredient_id: butter.id,
                    substitute_id,
                    ratio,
                },
            );
        }
        for factor in [0.0, f64::INFINITY] {
            let _ = store.add_unit_conversion(
                &ctx(),
                UnitConversion {
                    ingredient_id: butter.id,
                    from_unit: "stick".to_string(),
                    to_unit: "g".to_string(),
                    factor,
                },
            );
        }

        assert!(store.all_substitutes().unwrap().is_empty());
        assert!(store.all_unit_conversions().unwrap().is_empty());

        let snapshot = store.snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: StoreSnapshot = serde_json::from_str(&json).unwrap();
        let reloaded = InMemoryIngredientStore::from_snapshot(decoded).unwrap();
        assert_eq!(reloaded.len().unwrap(), 2);
    }

    #[test]
    fn update_rejects_malformed_aliases() {
        let store = InMemoryIngredientStore::new();
        let garlic = seed(&store, "garlic", &[]);

        let err = store
            .update_aliases_and_meta(&ctx(), garlic.id, vec!["garlic".to_string()], None, None)
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendError(_)));

        let err = store
            .update_aliases_and_meta(
                &ctx(),
                garlic.id,
                vec!["clove".to_string(), "clove".to_string()],
                None,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendError(_)));

        let missing = IngredientId::new();
        assert!(matches!(
            store.update_aliases_and_meta(&ctx(), missing, Vec::new(), None, None),
            Err(StorageError::IngredientNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn delete_cascades_relations() {
        let store = InMemoryIngredientStore::new();
        let butter = seed(&store, "butter", &[]);
        let margarine = seed(&store, "margarine", &[]);
        let oil = seed(&store, "oil", &[]);

        store
            .add_substitute(
                &ctx(),
                SubstituteRelation {
                    ingredient_id: butter.id,
                    substitute_id: margarine.id,
                    ratio: 1.0,
                },
            )
            .unwrap();
        store
            .add_substitute(
                &ctx(),
                SubstituteRelation {
                    ingredient_id: oil.id,
                    substitute_id: butter.id,
                    ratio: 1.25,
                },
            )
            .unwrap();
        store
            .add_unit_conversion(
                &ctx(),
                UnitConversion {
                    ingredient_id: butter.id,
                    from_unit: "stick".to_string(),
                    to_unit: "g".to_string(),
                    factor: 113.0,
                },
            )
            .unwrap();

        store.delete(&ctx(), butter.id).unwrap();

        assert!(store.all_substitutes().unwrap().is_empty());
        assert!(store.all_unit_conversions().unwrap().is_empty());
        assert!(matches!(
            store.get_by_name(&ctx(), "butter"),
            Err(StorageError::NameNotFound(_))
        ));
        assert!(matches!(
            store.delete(&ctx(), butter.id),
            Err(StorageError::IngredientNotFound(_))
        ));
    }

    #[test]
    fn add_substitute_requires_both_records() {
        let store = InMemoryIngredientStore::new();
        let butter = seed(&store, "butter", &[]);
        let ghost = IngredientId::new();

        let err = store
            .add_substitute(
                &ctx(),
                SubstituteRelation {
                    ingredient_id: butter.id,
                    substitute_id: ghost,
                    ratio: 1.0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::IngredientNotFound(id) if id == ghost));
    }

    #[test]
    fn uncommitted_transaction_rolls_back() {
        let store = InMemoryIngredientStore::new();
        let garlic = seed(&store, "garlic", &[]);
        let ctx = ctx();

        {
            let mut tx = store.begin(&ctx).unwrap();
            tx.update_aliases_and_meta(garlic.id, vec!["clove".to_string()], None, None)
                .unwrap();
            tx.delete(garlic.id).unwrap();
        }

        assert_eq!(store.get(&ctx, garlic.id).unwrap(), garlic);
    }

    #[test]
    fn committed_transaction_publishes() {
        let store = InMemoryIngredientStore::new();
        let garlic = seed(&store, "garlic", &[]);
        let ctx = ctx();

        let mut tx = store.begin(&ctx).unwrap();
        tx.update_aliases_and_meta(garlic.id, vec!["clove".to_string()], None, None)
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(store.get(&ctx, garlic.id).unwrap().aliases, vec!["clove"]);
    }

    #[test]
    fn cancelled_context_blocks_commit() {
        let store = InMemoryIngredientStore::new();
        let garlic = seed(&store, "garlic", &[]);
        let ctx = ctx();

        let mut tx = store.begin(&ctx).unwrap();
        tx.delete(garlic.id).unwrap();
        ctx.cancel();
        assert!(matches!(tx.commit(), Err(StorageError::Cancelled)));

        assert!(store.get(&CallContext::background(), garlic.id).is_ok());
    }

    #[test]
    fn repoint_drops_self_and_duplicate_substitutes() {
        let store = InMemoryIngredientStore::new();
        let winner = seed(&store, "butter", &[]);
        let loser = seed(&store, "unsalted butter", &[]);
        let margarine = seed(&store, "margarine", &[]);

        for (ingredient_id, substitute_id) in [
            (winner.id, margarine.id),
            (loser.id, margarine.id),
            (loser.id, winner.id),
        ] {
            store
                .add_substitute(
                    &ctx(),
                    SubstituteRelation {
                        ingredient_id,
                        substitute_id,
                        ratio: 1.0,
                    },
                )
                .unwrap();
        }

        let ctx = ctx();
        let mut tx = store.begin(&ctx).unwrap();
        assert_eq!(tx.repoint_substitutes(loser.id, winner.id).unwrap(), 2);
        tx.commit().unwrap();

        let subs = store.all_substitutes().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].ingredient_id, winner.id);
        assert_eq!(subs[0].substitute_id, margarine.id);
    }

    #[test]
    fn repoint_conversions_keeps_target_definitions() {
        let store = InMemoryIngredientStore::new();
        let winner = seed(&store, "flour", &[]);
        let loser = seed(&store, "all purpose flour", &[]);

        for (id, to_unit, factor) in [
            (winner.id, "g", 120.0),
            (loser.id, "g", 125.0),
            (loser.id, "oz", 4.25),
        ] {
            store
                .add_unit_conversion(
                    &ctx(),
                    UnitConversion {
                        ingredient_id: id,
                        from_unit: "cup".to_string(),
                        to_unit: to_unit.to_string(),
                        factor,
                    },
                )
                .unwrap();
        }

        let ctx = ctx();
        let mut tx = store.begin(&ctx).unwrap();
        assert_eq!(tx.repoint_unit_conversions(loser.id, winner.id).unwrap(), 2);
        tx.commit().unwrap();

        let convs = store.list_unit_conversions(&ctx, winner.id).unwrap();
        assert_eq!(convs.len(), 2);
        let grams = convs.iter().find(|c| c.to_unit == "g").unwrap();
        assert!((grams.factor - 120.0).abs() < f64::EPSILON);
    }
}
