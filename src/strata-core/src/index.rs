//! Name lookup index for tree and graph entities.
//!
//! Entries are lookup-only back references; the owning container's primary
//! store is always the source of truth.

use std::collections::{BTreeSet, HashMap};

use common_error::StrataResult;
use crate::attributes::{AttributeBag, keys};
use crate::types::Value;

/// Multi-map from `name` attribute values to entity ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex<Id: Ord> {
    entries: HashMap<String, BTreeSet<Id>>,
}

impl<Id: Ord + Copy> NameIndex<Id> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build an index over existing entities.
    pub fn from_bags<'a>(bags: impl IntoIterator<Item = (Id, &'a AttributeBag)>) -> Self {
        let mut index = Self::new();
        for (id, bag) in bags {
            index.insert(bag.as_map().get(keys::NAME), id);
        }
        index
    }

    /// Register `id` under `name`, if the name is a string.
    pub fn insert(&mut self, name: Option<&Value>, id: Id) {
        if let Some(name) = name.and_then(Value::as_str) {
            self.entries.entry(name.to_string()).or_default().insert(id);
        }
    }

    /// Unregister `id` from `name`, dropping the entry once empty.
    pub fn remove(&mut self, name: Option<&Value>, id: Id) {
        let Some(name) = name.and_then(Value::as_str) else {
            return;
        };
        if let Some(ids) = self.entries.get_mut(name) {
            ids.remove(&id);
            if ids.is_empty() {
                self.entries.remove(name);
            }
        }
    }

    /// Move `id` from its old name to its new one.
    ///
    /// Every path that can change an entity's name goes through here.
    pub fn rename(&mut self, old: Option<&Value>, new: Option<&Value>, id: Id) {
        if old == new {
            return;
        }
        self.remove(old, id);
        self.insert(new, id);
    }

    /// Apply `update` to the bag of entity `id`, then move the entity to its new
    /// name. A failed update leaves both the bag and the index untouched.
    pub fn update<R>(
        &mut self,
        id: Id,
        bag: &mut AttributeBag,
        update: impl FnOnce(&mut AttributeBag) -> StrataResult<R>,
    ) -> StrataResult<R> {
        let old = bag.as_map().get(keys::NAME).cloned();
        let result = update(bag)?;
        self.rename(old.as_ref(), bag.as_map().get(keys::NAME), id);
        Ok(result)
    }

    /// Ids registered under `name`, ascending.
    pub fn lookup(&self, name: &str) -> Vec<Id> {
        self.entries
            .get(name)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<Id: Ord + Copy> Default for NameIndex<Id> {
    fn default() -> Self {
        Self::new()
    }
}
