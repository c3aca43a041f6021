//! Recommendation extraction from free-form advice text.
//!
//! The scan is a deliberate heuristic: a short allow-list keyword that is a
//! substring of a longer catalog name may match an unintended record. That
//! imprecision is documented upstream behavior and is pinned by the tests
//! here rather than corrected.

use crate::catalog::Catalog;
use crate::domain::plant::PlantRecord;

/// Cap on structured records surfaced alongside an advice reply.
pub const MAX_EXTRACTED_PLANTS: usize = 4;

/// Edible-plant keywords the advice text is scanned for.
const EDIBLE_PLANT_KEYWORDS: &[&str] = &[
    "tomato",
    "lettuce",
    "basil",
    "mint",
    "pepper",
    "strawberry",
    "spinach",
    "kale",
    "radish",
    "carrot",
    "cucumber",
    "zucchini",
    "blueberry",
    "watermelon",
    "pumpkin",
    "rosemary",
    "thyme",
    "parsley",
    "cilantro",
    "asparagus",
];

/// Phrases that classify an inbound message as a recommendation request.
const RECOMMENDATION_TRIGGERS: &[&str] = &[
    "recommend",
    "suggest",
    "what should i grow",
    "what can i grow",
    "what should i plant",
    "what can i plant",
    "which plants",
    "good plants",
    "best plants",
    "ideas for my garden",
];

pub fn is_recommendation_request(message: &str) -> bool {
    let normalized = message.to_lowercase();
    RECOMMENDATION_TRIGGERS.iter().any(|trigger| normalized.contains(trigger))
}

/// Scan `reply` for allow-listed plant keywords and surface the matching
/// catalog records in order of first keyword occurrence, de-duplicated by
/// record name, capped at [`MAX_EXTRACTED_PLANTS`].
pub fn extract_mentioned_plants(reply: &str, catalog: &Catalog) -> Vec<PlantRecord> {
    let normalized = reply.to_lowercase();

    let mut hits: Vec<(usize, &str)> = EDIBLE_PLANT_KEYWORDS
        .iter()
        .filter_map(|keyword| normalized.find(keyword).map(|position| (position, *keyword)))
        .collect();
    hits.sort_by_key(|(position, _)| *position);

    let mut extracted: Vec<PlantRecord> = Vec::new();
    for (_, keyword) in hits {
        if extracted.len() == MAX_EXTRACTED_PLANTS {
            break;
        }
        let Some(record) = first_catalog_match(catalog, keyword) else {
            continue;
        };
        if extracted.iter().any(|existing| existing.name_matches(&record.name)) {
            continue;
        }
        extracted.push(record.clone());
    }

    extracted
}

/// First catalog entry whose name contains the keyword or vice versa.
fn first_catalog_match<'a>(catalog: &'a Catalog, keyword: &str) -> Option<&'a PlantRecord> {
    catalog.plants().iter().find(|plant| {
        let name = plant.name.to_lowercase();
        name.contains(keyword) || keyword.contains(&name)
    })
}

#[cfg(test)]
mod tests {
    use super::{extract_mentioned_plants, is_recommendation_request, MAX_EXTRACTED_PLANTS};
    use crate::catalog::Catalog;

    #[test]
    fn trigger_phrases_classify_case_insensitively() {
        assert!(is_recommendation_request("Can you RECOMMEND something for my balcony?"));
        assert!(is_recommendation_request("what should I grow in the shade?"));
        assert!(!is_recommendation_request("How often do I water basil?"));
    }

    #[test]
    fn extraction_orders_by_first_occurrence_and_dedupes() {
        let catalog = Catalog::embedded();
        let reply = "Lettuce is a great start. Pair lettuce with a cherry tomato, \
                     and tuck basil between the tomato plants.";

        let plants = extract_mentioned_plants(reply, &catalog);
        let names: Vec<&str> = plants.iter().map(|plant| plant.name.as_str()).collect();

        assert_eq!(names, vec!["Lettuce", "Cherry Tomato", "Sweet Basil"]);
    }

    #[test]
    fn extraction_caps_at_four() {
        let catalog = Catalog::embedded();
        let reply = "Try spinach, kale, radish, carrot, cucumber, and zucchini this spring.";

        let plants = extract_mentioned_plants(reply, &catalog);
        assert_eq!(plants.len(), MAX_EXTRACTED_PLANTS);
        let names: Vec<&str> = plants.iter().map(|plant| plant.name.as_str()).collect();
        assert_eq!(names, vec!["Spinach", "Kale", "Radish", "Carrot"]);
    }

    #[test]
    fn short_keyword_may_hit_a_longer_catalog_name() {
        // "tomato" resolves to the first containing entry, Cherry Tomato.
        // The documented heuristic, not a defect.
        let catalog = Catalog::embedded();
        let plants = extract_mentioned_plants("A beefsteak tomato needs staking.", &catalog);

        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "Cherry Tomato");
    }

    #[test]
    fn reply_without_known_plants_extracts_nothing() {
        let catalog = Catalog::embedded();
        assert!(extract_mentioned_plants("Water deeply and mulch well.", &catalog).is_empty());
    }
}
