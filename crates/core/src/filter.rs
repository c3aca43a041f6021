//! Keyword filter engine over the plant catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::plant::{PlantCategory, PlantRecord, Space, Sunlight};

/// Result cap for a single filter call.
pub const MAX_FILTER_RESULTS: usize = 12;

/// The fixed keyword enumeration. Anything else parses to `Unrecognized`,
/// which is not an error: it selects the quick-growing OR salad-suitable
/// union, matching the upstream behavior this engine preserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    QuickGrowing,
    SaladSuitable,
    SmoothieSuitable,
    SmallSpace,
    MediumSpace,
    LargeSpace,
    FullSun,
    PartialShade,
    SlowGrowing,
    Indoor,
    Outdoor,
    Herbs,
    Vegetables,
    Fruits,
    Specific,
    Unrecognized,
}

impl Keyword {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "quick_growing" => Self::QuickGrowing,
            "salad_suitable" => Self::SaladSuitable,
            "smoothie_suitable" => Self::SmoothieSuitable,
            "small_space" => Self::SmallSpace,
            "medium_space" => Self::MediumSpace,
            "large_space" => Self::LargeSpace,
            "full_sun" => Self::FullSun,
            "partial_shade" => Self::PartialShade,
            "slow_growing" => Self::SlowGrowing,
            "indoor" => Self::Indoor,
            "outdoor" => Self::Outdoor,
            "herbs" => Self::Herbs,
            "vegetables" => Self::Vegetables,
            "fruits" => Self::Fruits,
            "specific" => Self::Specific,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickGrowing => "quick_growing",
            Self::SaladSuitable => "salad_suitable",
            Self::SmoothieSuitable => "smoothie_suitable",
            Self::SmallSpace => "small_space",
            Self::MediumSpace => "medium_space",
            Self::LargeSpace => "large_space",
            Self::FullSun => "full_sun",
            Self::PartialShade => "partial_shade",
            Self::SlowGrowing => "slow_growing",
            Self::Indoor => "indoor",
            Self::Outdoor => "outdoor",
            Self::Herbs => "herbs",
            Self::Vegetables => "vegetables",
            Self::Fruits => "fruits",
            Self::Specific => "specific",
            Self::Unrecognized => "unrecognized",
        }
    }

    fn selects(&self, plant: &PlantRecord) -> bool {
        match self {
            Self::QuickGrowing => plant.is_quick_growing(),
            Self::SaladSuitable => plant.has_tag("salad"),
            Self::SmoothieSuitable => plant.has_tag("smoothie"),
            Self::SmallSpace => plant.space == Space::Small,
            Self::MediumSpace => plant.space == Space::Medium,
            Self::LargeSpace => plant.space == Space::Large,
            Self::FullSun => plant.sunlight == Sunlight::FullSun,
            Self::PartialShade => plant.sunlight == Sunlight::PartialSun,
            Self::SlowGrowing => plant.is_slow_growing(),
            Self::Indoor => plant.indoor,
            Self::Outdoor => !plant.indoor,
            Self::Herbs => plant.category == PlantCategory::Herb,
            Self::Vegetables => plant.category == PlantCategory::Vegetable,
            Self::Fruits => plant.category == PlantCategory::Fruit,
            Self::Specific => true,
            Self::Unrecognized => plant.is_quick_growing() || plant.has_tag("salad"),
        }
    }
}

/// Optional conjunctive refinements applied after the keyword predicate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPreferences {
    pub space: Option<String>,
    pub sunlight: Option<String>,
    pub max_days: Option<u32>,
    pub indoor_only: Option<bool>,
}

impl FilterPreferences {
    fn admits(&self, plant: &PlantRecord) -> bool {
        if let Some(space) = &self.space {
            if !plant.space.as_str().eq_ignore_ascii_case(space.trim()) {
                return false;
            }
        }
        if let Some(sunlight) = &self.sunlight {
            let matches = Sunlight::parse(sunlight)
                .map(|wanted| plant.sunlight == wanted)
                .unwrap_or_else(|_| plant.sunlight.as_str().eq_ignore_ascii_case(sunlight.trim()));
            if !matches {
                return false;
            }
        }
        if let Some(max_days) = self.max_days {
            if plant.grow_time_days > max_days {
                return false;
            }
        }
        if let Some(indoor_only) = self.indoor_only {
            if indoor_only && !plant.indoor {
                return false;
            }
        }
        true
    }
}

/// Select by keyword, refine by preferences, sort ascending by grow days
/// (stable, so ties keep catalog order), cap at [`MAX_FILTER_RESULTS`].
pub fn filter(
    catalog: &Catalog,
    keyword: Keyword,
    preferences: &FilterPreferences,
) -> Vec<PlantRecord> {
    let mut selected: Vec<PlantRecord> = catalog
        .plants()
        .iter()
        .filter(|plant| keyword.selects(plant))
        .filter(|plant| preferences.admits(plant))
        .cloned()
        .collect();

    selected.sort_by_key(|plant| plant.grow_time_days);
    selected.truncate(MAX_FILTER_RESULTS);
    selected
}

#[cfg(test)]
mod tests {
    use super::{filter, FilterPreferences, Keyword, MAX_FILTER_RESULTS};
    use crate::catalog::Catalog;
    use crate::domain::plant::SLOW_GROWING_MIN_DAYS;

    fn catalog() -> Catalog {
        Catalog::embedded()
    }

    #[test]
    fn parse_maps_known_keywords_and_flags_the_rest() {
        assert_eq!(Keyword::parse("quick_growing"), Keyword::QuickGrowing);
        assert_eq!(Keyword::parse("  Slow_Growing "), Keyword::SlowGrowing);
        assert_eq!(Keyword::parse("specific"), Keyword::Specific);
        assert_eq!(Keyword::parse("bonsai"), Keyword::Unrecognized);
    }

    #[test]
    fn quick_growing_returns_only_quick_plants_sorted_ascending() {
        let results = filter(&catalog(), Keyword::QuickGrowing, &FilterPreferences::default());

        assert!(!results.is_empty());
        assert!(results.len() <= MAX_FILTER_RESULTS);
        assert!(results.iter().all(|plant| plant.is_quick_growing()));
        assert!(results.windows(2).all(|pair| pair[0].grow_time_days <= pair[1].grow_time_days));
    }

    #[test]
    fn slow_growing_means_more_than_ninety_days() {
        let results = filter(&catalog(), Keyword::SlowGrowing, &FilterPreferences::default());

        assert!(!results.is_empty());
        assert!(results.iter().all(|plant| plant.grow_time_days > SLOW_GROWING_MIN_DAYS));
    }

    #[test]
    fn adding_a_preference_never_grows_the_result_set() {
        let unrestricted = filter(&catalog(), Keyword::SaladSuitable, &FilterPreferences::default());
        let restricted = filter(
            &catalog(),
            Keyword::SaladSuitable,
            &FilterPreferences { space: Some("Small".to_string()), ..Default::default() },
        );

        assert!(restricted.len() <= unrestricted.len());
        for plant in &restricted {
            assert!(unrestricted.iter().any(|candidate| candidate.name == plant.name));
            assert_eq!(plant.space.as_str(), "small");
        }
    }

    #[test]
    fn preferences_compose_conjunctively() {
        let results = filter(
            &catalog(),
            Keyword::Specific,
            &FilterPreferences {
                sunlight: Some("full".to_string()),
                max_days: Some(60),
                indoor_only: Some(true),
                ..Default::default()
            },
        );

        assert!(!results.is_empty());
        for plant in &results {
            assert_eq!(plant.sunlight.as_str(), "full_sun");
            assert!(plant.grow_time_days <= 60);
            assert!(plant.indoor);
        }
    }

    #[test]
    fn unrecognized_keyword_selects_the_quick_or_salad_union() {
        let results = filter(&catalog(), Keyword::Unrecognized, &FilterPreferences::default());

        assert!(!results.is_empty());
        assert!(results.iter().all(|plant| plant.is_quick_growing() || plant.has_tag("salad")));
    }

    #[test]
    fn specific_keyword_caps_the_full_catalog_at_twelve() {
        let results = filter(&catalog(), Keyword::Specific, &FilterPreferences::default());
        assert_eq!(results.len(), MAX_FILTER_RESULTS);
    }

    #[test]
    fn ties_keep_catalog_order() {
        // Cherry Tomato and Strawberry both grow in 60 days; the catalog
        // lists the tomato first, so the stable sort must too.
        let results = filter(&catalog(), Keyword::QuickGrowing, &FilterPreferences::default());
        let tomato = results.iter().position(|plant| plant.name == "Cherry Tomato");
        let strawberry = results.iter().position(|plant| plant.name == "Strawberry");

        let (Some(tomato), Some(strawberry)) = (tomato, strawberry) else {
            panic!("embedded catalog should surface both sixty-day plants");
        };
        assert!(tomato < strawberry);
    }
}
