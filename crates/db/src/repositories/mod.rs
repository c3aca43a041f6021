use async_trait::async_trait;
use thiserror::Error;

use trellis_core::domain::store::StoreItem;
use trellis_core::domain::suggestion::SuggestionSet;

pub mod memory;
pub mod store_item;
pub mod suggestion;

pub use memory::{InMemoryStoreItemRepository, InMemorySuggestionSetRepository};
pub use store_item::SqlStoreItemRepository;
pub use suggestion::SqlSuggestionSetRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait SuggestionSetRepository: Send + Sync {
    /// All active suggestion sets, plants in stored position order. The
    /// combination resolver runs over this snapshot.
    async fn list_active(&self) -> Result<Vec<SuggestionSet>, RepositoryError>;
    async fn save(&self, set: SuggestionSet) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait StoreItemRepository: Send + Sync {
    async fn list_recommended(&self, limit: u32) -> Result<Vec<StoreItem>, RepositoryError>;
    async fn save(&self, item: StoreItem) -> Result<(), RepositoryError>;
}
