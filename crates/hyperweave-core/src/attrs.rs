//! # Attribute Store
//!
//! Per-entity key/value records. One `AttrStore` exists for nodes and one for
//! edges in every structure; whole-structure metadata is a plain [`Attrs`].
//!
//! Records are created empty when their owner is added, mutated in place by the
//! setters, and dropped only together with their owner.

use crate::{AttrValue, Attrs, EntityKind, HyperweaveError, Id};
use std::collections::BTreeMap;

/// Attribute records keyed by node or edge identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrStore {
    kind: EntityKind,
    records: BTreeMap<Id, Attrs>,
}

impl AttrStore {
    /// Create an empty store for the given collection.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            records: BTreeMap::new(),
        }
    }

    /// Create an empty record for `id` if none exists.
    pub fn ensure(&mut self, id: &Id) {
        if !self.records.contains_key(id) {
            self.records.insert(id.clone(), Attrs::new());
        }
    }

    /// Full record of `id`.
    pub fn get(&self, id: &Id) -> Result<&Attrs, HyperweaveError> {
        self.records
            .get(id)
            .ok_or_else(|| HyperweaveError::not_found(self.kind, id.clone()))
    }

    /// Single value of `id`, or `default` when the key is absent.
    pub fn get_key(
        &self,
        id: &Id,
        key: &str,
        default: Option<AttrValue>,
    ) -> Result<Option<AttrValue>, HyperweaveError> {
        Ok(self.get(id)?.get(key).cloned().or(default))
    }

    /// Set one key of `id`.
    pub fn set(
        &mut self,
        id: &Id,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), HyperweaveError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| HyperweaveError::not_found(self.kind, id.clone()))?;
        record.insert(key.into(), value.into());
        Ok(())
    }

    /// Merge a partial record into `id`. Existing keys not in `partial` survive.
    pub fn merge(&mut self, id: &Id, partial: Attrs) -> Result<(), HyperweaveError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| HyperweaveError::not_found(self.kind, id.clone()))?;
        record.extend(partial);
        Ok(())
    }

    /// Merge many partial records at once.
    ///
    /// Every identifier is checked before the first write, so an unknown
    /// identifier leaves every record untouched.
    pub fn set_many(&mut self, values: BTreeMap<Id, Attrs>) -> Result<(), HyperweaveError> {
        if let Some(missing) = values.keys().find(|id| !self.records.contains_key(*id)) {
            return Err(HyperweaveError::not_found(self.kind, missing.clone()));
        }
        for (id, partial) in values {
            if let Some(record) = self.records.get_mut(&id) {
                record.extend(partial);
            }
        }
        Ok(())
    }

    /// Remove one key of `id`, returning its previous value.
    pub fn remove_key(&mut self, id: &Id, key: &str) -> Result<Option<AttrValue>, HyperweaveError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| HyperweaveError::not_found(self.kind, id.clone()))?;
        Ok(record.remove(key))
    }

    /// Drop the record of a destroyed owner.
    pub fn remove(&mut self, id: &Id) -> Option<Attrs> {
        self.records.remove(id)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterate over all records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &Attrs)> {
        self.records.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
