use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::plant::{PlantCategory, Space, Sunlight};
use crate::errors::DomainError;

const KEY_DELIMITER: char = '-';

/// The five-dimension grower profile used to key pre-built suggestion sets.
///
/// Construction normalizes every field (trim + lowercase) so the derived key
/// is identical whether the profile arrives from a request or is rebuilt from
/// a persisted suggestion set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationProfile {
    pub space: String,
    pub sunlight: String,
    pub experience: String,
    pub time: String,
    pub purpose: String,
}

impl CombinationProfile {
    pub fn new(
        space: &str,
        sunlight: &str,
        experience: &str,
        time: &str,
        purpose: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            space: required("space", space)?,
            sunlight: required("sunlight", sunlight)?,
            experience: required("experience", experience)?,
            time: required("time", time)?,
            purpose: required("purpose", purpose)?,
        })
    }

    /// The canonical default tuple consulted when neither the exact key nor
    /// the (space, sunlight, experience) triple matches anything.
    pub fn canonical_default() -> Self {
        Self {
            space: "small".to_owned(),
            sunlight: "full_sun".to_owned(),
            experience: "beginner".to_owned(),
            time: "low".to_owned(),
            purpose: "food".to_owned(),
        }
    }

    pub fn key(&self) -> CombinationKey {
        CombinationKey::join([
            self.space.as_str(),
            self.sunlight.as_str(),
            self.experience.as_str(),
            self.time.as_str(),
            self.purpose.as_str(),
        ])
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, DomainError> {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(normalized)
}

/// Deterministic join of the five combination fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinationKey(pub String);

impl CombinationKey {
    fn join(fields: [&str; 5]) -> Self {
        let mut key = String::new();
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                key.push(KEY_DELIMITER);
            }
            key.push_str(&field.trim().to_ascii_lowercase());
        }
        Self(key)
    }
}

impl std::fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a suggestion set was matched to a requested profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Exact,
    /// Matched on (space, sunlight, experience) only; time and purpose were
    /// discarded. Callers must not assume those two dimensions match.
    Fallback,
    Default,
}

impl MatchQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fallback => "fallback",
            Self::Default => "default",
        }
    }
}

/// Denormalized plant entry inside a suggestion set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionPlant {
    pub name: String,
    pub category: PlantCategory,
    pub description: String,
    pub image_url: String,
    pub growing_time: String,
    pub sunlight: Sunlight,
    pub space: Space,
    pub difficulty: String,
    pub price: Decimal,
}

/// A named bundle of plants plus a recommendation message, associated with
/// exactly one combination key. The combination fields are stored discretely
/// (never key-only) so partial-match fallbacks can filter on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub id: String,
    pub space: String,
    pub sunlight: String,
    pub experience: String,
    pub time: String,
    pub purpose: String,
    pub message: String,
    pub plants: Vec<SuggestionPlant>,
    pub active: bool,
}

impl SuggestionSet {
    pub fn profile(&self) -> CombinationProfile {
        CombinationProfile {
            space: self.space.clone(),
            sunlight: self.sunlight.clone(),
            experience: self.experience.clone(),
            time: self.time.clone(),
            purpose: self.purpose.clone(),
        }
    }

    pub fn key(&self) -> CombinationKey {
        self.profile().key()
    }

    pub fn matches_key(&self, key: &CombinationKey) -> bool {
        self.active && &self.key() == key
    }

    pub fn matches_triple(&self, profile: &CombinationProfile) -> bool {
        self.active
            && self.space == profile.space
            && self.sunlight == profile.sunlight
            && self.experience == profile.experience
    }
}

#[cfg(test)]
mod tests {
    use super::{CombinationKey, CombinationProfile};
    use crate::errors::DomainError;

    #[test]
    fn key_is_the_normalized_join_of_all_five_fields() {
        let profile =
            CombinationProfile::new("Small", "FULL_SUN", "Beginner", "low", "Food").unwrap();
        assert_eq!(profile.key(), CombinationKey("small-full_sun-beginner-low-food".to_owned()));
    }

    #[test]
    fn key_is_identical_for_request_and_persisted_paths() {
        let from_request =
            CombinationProfile::new("medium", "partial_sun", "expert", "high", "decor").unwrap();
        let rebuilt = CombinationProfile {
            space: "medium".to_owned(),
            sunlight: "partial_sun".to_owned(),
            experience: "expert".to_owned(),
            time: "high".to_owned(),
            purpose: "decor".to_owned(),
        };
        assert_eq!(from_request.key(), rebuilt.key());
    }

    #[test]
    fn blank_field_is_a_missing_field_error() {
        let result = CombinationProfile::new("small", "  ", "beginner", "low", "food");
        assert_eq!(result.unwrap_err(), DomainError::MissingField("sunlight"));
    }

    #[test]
    fn canonical_default_matches_the_documented_tuple() {
        assert_eq!(
            CombinationProfile::canonical_default().key(),
            CombinationKey("small-full_sun-beginner-low-food".to_owned())
        );
    }
}
