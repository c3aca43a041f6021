pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extraction;
pub mod filter;
pub mod resolver;

pub use catalog::{Catalog, CatalogError, CatalogSource};
pub use domain::plant::{Maintenance, PlantCategory, PlantRecord, Space, Sunlight};
pub use domain::store::StoreItem;
pub use domain::suggestion::{
    CombinationKey, CombinationProfile, MatchQuality, SuggestionPlant, SuggestionSet,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use extraction::{extract_mentioned_plants, is_recommendation_request, MAX_EXTRACTED_PLANTS};
pub use filter::{FilterPreferences, Keyword, MAX_FILTER_RESULTS};
pub use resolver::{resolve, ResolvedSuggestions};
