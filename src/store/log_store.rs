// ABOUTME: Append-only food-log store preserving insertion order with unique entry ids
// ABOUTME: Batches are validated as a whole and committed atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CalAI Contributors

use std::collections::HashMap;

use calai_core::models::{EntryId, FoodLogEntry};

use crate::errors::{AppError, AppResult};

/// Ordered collection of log entries keyed by id
///
/// Insertion order is kept so that entries with equal timestamps have a
/// stable tie-break. The id index leaves room for update and delete.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Vec<FoodLogEntry>,
    index: HashMap<EntryId, usize>,
}

impl LogStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if two entries share an id.
    pub fn from_entries(entries: Vec<FoodLogEntry>) -> AppResult<Self> {
        let mut store = Self::new();
        store.append(entries)?;
        Ok(store)
    }

    /// Append a batch, all or nothing
    ///
    /// Returns the number of entries added.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if any id is already stored or repeats
    /// within the batch; the store is unchanged in that case.
    pub fn append(&mut self, batch: Vec<FoodLogEntry>) -> AppResult<usize> {
        let mut seen = HashMap::with_capacity(batch.len());
        for (offset, entry) in batch.iter().enumerate() {
            let id = entry.id();
            if self.index.contains_key(&id) || seen.insert(id, offset).is_some() {
                return Err(AppError::already_exists(format!("Log entry {id}")));
            }
        }

        let base = self.entries.len();
        self.index
            .extend(seen.into_iter().map(|(id, offset)| (id, base + offset)));
        let added = batch.len();
        self.entries.extend(batch);
        Ok(added)
    }

    /// Copy of this store with `batch` appended, leaving `self` untouched
    ///
    /// # Errors
    ///
    /// Same as [`LogStore::append`].
    pub fn with_appended(&self, batch: Vec<FoodLogEntry>) -> AppResult<Self> {
        let mut next = self.clone();
        next.append(batch)?;
        Ok(next)
    }

    /// All entries in insertion order
    #[must_use]
    pub fn all(&self) -> &[FoodLogEntry] {
        &self.entries
    }

    /// Look up an entry by id
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&FoodLogEntry> {
        self.index.get(&id).and_then(|&i| self.entries.get(i))
    }

    /// Whether an id is stored
    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calai_core::models::{MealType, Micronutrients, Nutrition};
    use chrono::Utc;

    fn entry(name: &str) -> FoodLogEntry {
        FoodLogEntry::new(
            name,
            Nutrition {
                calories: 100.0,
                ..Nutrition::default()
            },
            Micronutrients::none(),
            MealType::Snack,
            Utc::now(),
        )
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = LogStore::new();
        store.append(vec![entry("a"), entry("b")]).unwrap();
        store.append(vec![entry("c")]).unwrap();
        let names: Vec<&str> = store.all().iter().map(FoodLogEntry::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_id_rejects_whole_batch() {
        let first = entry("a");
        let mut store = LogStore::new();
        store.append(vec![first.clone()]).unwrap();

        let err = store.append(vec![entry("b"), first]).unwrap_err();
        assert_eq!(err.code, calai_core::errors::ErrorCode::ResourceAlreadyExists);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_within_batch_is_rejected() {
        let twin = entry("twin");
        let mut store = LogStore::new();
        assert!(store.append(vec![twin.clone(), twin]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let target = entry("target");
        let id = target.id();
        let store = LogStore::from_entries(vec![entry("x"), target]).unwrap();
        assert_eq!(store.get(id).unwrap().name(), "target");
        assert!(store.contains(id));
    }

    #[test]
    fn test_with_appended_leaves_original() {
        let store = LogStore::from_entries(vec![entry("x")]).unwrap();
        let next = store.with_appended(vec![entry("y")]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(next.len(), 2);
    }
}
