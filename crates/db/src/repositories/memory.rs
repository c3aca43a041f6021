//! In-memory repository twins for tests and for wiring the server without a
//! database file.

use std::sync::Mutex;

use trellis_core::domain::store::StoreItem;
use trellis_core::domain::suggestion::SuggestionSet;

use super::{RepositoryError, StoreItemRepository, SuggestionSetRepository};

#[derive(Default)]
pub struct InMemorySuggestionSetRepository {
    sets: Mutex<Vec<SuggestionSet>>,
}

impl InMemorySuggestionSetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sets(sets: Vec<SuggestionSet>) -> Self {
        Self { sets: Mutex::new(sets) }
    }
}

#[async_trait::async_trait]
impl SuggestionSetRepository for InMemorySuggestionSetRepository {
    async fn list_active(&self) -> Result<Vec<SuggestionSet>, RepositoryError> {
        let sets = self.sets.lock().expect("suggestion set lock poisoned");
        Ok(sets.iter().filter(|set| set.active).cloned().collect())
    }

    async fn save(&self, set: SuggestionSet) -> Result<(), RepositoryError> {
        let mut sets = self.sets.lock().expect("suggestion set lock poisoned");
        sets.retain(|existing| existing.id != set.id);
        sets.push(set);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStoreItemRepository {
    items: Mutex<Vec<StoreItem>>,
}

impl InMemoryStoreItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<StoreItem>) -> Self {
        Self { items: Mutex::new(items) }
    }
}

#[async_trait::async_trait]
impl StoreItemRepository for InMemoryStoreItemRepository {
    async fn list_recommended(&self, limit: u32) -> Result<Vec<StoreItem>, RepositoryError> {
        let items = self.items.lock().expect("store item lock poisoned");
        Ok(items.iter().filter(|item| item.recommended).take(limit as usize).cloned().collect())
    }

    async fn save(&self, item: StoreItem) -> Result<(), RepositoryError> {
        let mut items = self.items.lock().expect("store item lock poisoned");
        items.retain(|existing| existing.id != item.id);
        items.push(item);
        Ok(())
    }
}
