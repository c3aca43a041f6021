//! Deterministic seed dataset: the canonical combination suggestion sets and
//! the recommended store items, plus post-load verification.

use rust_decimal::Decimal;
use sqlx::Row;

use trellis_core::domain::plant::{PlantCategory, Space, Sunlight};
use trellis_core::domain::store::StoreItem;
use trellis_core::domain::suggestion::{SuggestionPlant, SuggestionSet};

use crate::repositories::{
    RepositoryError, SqlStoreItemRepository, SqlSuggestionSetRepository, StoreItemRepository,
    SuggestionSetRepository,
};
use crate::DbPool;

pub struct SeedDataset;

#[derive(Clone, Debug)]
pub struct SeedSetInfo {
    pub id: String,
    pub combination_key: String,
    pub plant_count: usize,
}

#[derive(Clone, Debug)]
pub struct SeedResult {
    pub sets: Vec<SeedSetInfo>,
    pub store_items_seeded: usize,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

struct PlantSeed {
    name: &'static str,
    category: PlantCategory,
    description: &'static str,
    image_url: &'static str,
    growing_time: &'static str,
    sunlight: Sunlight,
    space: Space,
    difficulty: &'static str,
    price_cents: i64,
}

struct SetSeed {
    id: &'static str,
    space: &'static str,
    sunlight: &'static str,
    experience: &'static str,
    time: &'static str,
    purpose: &'static str,
    message: &'static str,
    plants: &'static [PlantSeed],
}

const STARTER_PLANTS: &[PlantSeed] = &[
    PlantSeed {
        name: "Cherry Tomato",
        category: PlantCategory::Vegetable,
        description: "Container-friendly tomato with a steady summer crop.",
        image_url: "/images/plants/cherry-tomato.jpg",
        growing_time: "55-65 days",
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 499,
    },
    PlantSeed {
        name: "Strawberry",
        category: PlantCategory::Fruit,
        description: "Everbearing berries for baskets and window boxes.",
        image_url: "/images/plants/strawberry.jpg",
        growing_time: "60 days",
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 599,
    },
    PlantSeed {
        name: "Sweet Basil",
        category: PlantCategory::Herb,
        description: "Fragrant kitchen staple; pinch tops to keep it producing.",
        image_url: "/images/plants/sweet-basil.jpg",
        growing_time: "20-30 days",
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 349,
    },
    PlantSeed {
        name: "Fresh Mint",
        category: PlantCategory::Herb,
        description: "Unstoppable in its own pot; endless tea and garnish.",
        image_url: "/images/plants/fresh-mint.jpg",
        growing_time: "15-25 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 329,
    },
    PlantSeed {
        name: "Bell Pepper",
        category: PlantCategory::Vegetable,
        description: "Sweet peppers that ripen from green to red in full sun.",
        image_url: "/images/plants/bell-pepper.jpg",
        growing_time: "70-80 days",
        sunlight: Sunlight::FullSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 449,
    },
    PlantSeed {
        name: "Lettuce",
        category: PlantCategory::Vegetable,
        description: "Cut-and-come-again salad leaves in any bright corner.",
        image_url: "/images/plants/lettuce.jpg",
        growing_time: "40-50 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 279,
    },
];

const BALCONY_PLANTS: &[PlantSeed] = &[
    PlantSeed {
        name: "Fresh Mint",
        category: PlantCategory::Herb,
        description: "Thrives with only a few hours of gentle sun.",
        image_url: "/images/plants/fresh-mint.jpg",
        growing_time: "15-25 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 329,
    },
    PlantSeed {
        name: "Parsley",
        category: PlantCategory::Herb,
        description: "Slow to start, generous for months afterwards.",
        image_url: "/images/plants/parsley.jpg",
        growing_time: "70-80 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 299,
    },
    PlantSeed {
        name: "Cilantro",
        category: PlantCategory::Herb,
        description: "Quick herb for salsa; sow a fresh pot every few weeks.",
        image_url: "/images/plants/cilantro.jpg",
        growing_time: "40-50 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 299,
    },
    PlantSeed {
        name: "Lettuce",
        category: PlantCategory::Vegetable,
        description: "Happy in shallow troughs out of the midday heat.",
        image_url: "/images/plants/lettuce.jpg",
        growing_time: "40-50 days",
        sunlight: Sunlight::PartialSun,
        space: Space::Small,
        difficulty: "easy",
        price_cents: 279,
    },
];

const BACKYARD_PLANTS: &[PlantSeed] = &[
    PlantSeed {
        name: "Kale",
        category: PlantCategory::Vegetable,
        description: "Hardy greens that sweeten after the first light frost.",
        image_url: "/images/plants/kale.jpg",
        growing_time: "50-60 days",
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        difficulty: "moderate",
        price_cents: 379,
    },
    PlantSeed {
        name: "Cucumber",
        category: PlantCategory::Vegetable,
        description: "Train up a trellis for straight fruit and easy picking.",
        image_url: "/images/plants/cucumber.jpg",
        growing_time: "50-60 days",
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        difficulty: "moderate",
        price_cents: 399,
    },
    PlantSeed {
        name: "Carrot",
        category: PlantCategory::Vegetable,
        description: "Loose, stone-free beds grow the straightest roots.",
        image_url: "/images/plants/carrot.jpg",
        growing_time: "65-75 days",
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        difficulty: "moderate",
        price_cents: 249,
    },
    PlantSeed {
        name: "Bell Pepper",
        category: PlantCategory::Vegetable,
        description: "Steady warmth and feeding bring the sweetest peppers.",
        image_url: "/images/plants/bell-pepper.jpg",
        growing_time: "70-80 days",
        sunlight: Sunlight::FullSun,
        space: Space::Medium,
        difficulty: "moderate",
        price_cents: 449,
    },
];

const HOMESTEAD_PLANTS: &[PlantSeed] = &[
    PlantSeed {
        name: "Zucchini",
        category: PlantCategory::Vegetable,
        description: "Two plants feed a family all summer long.",
        image_url: "/images/plants/zucchini.jpg",
        growing_time: "45-55 days",
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        difficulty: "moderate",
        price_cents: 429,
    },
    PlantSeed {
        name: "Watermelon",
        category: PlantCategory::Fruit,
        description: "Sprawling vines that want heat, room, and patience.",
        image_url: "/images/plants/watermelon.jpg",
        growing_time: "90-100 days",
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        difficulty: "hard",
        price_cents: 549,
    },
    PlantSeed {
        name: "Pumpkin",
        category: PlantCategory::Vegetable,
        description: "Sow after the last frost for an autumn harvest.",
        image_url: "/images/plants/pumpkin.jpg",
        growing_time: "100-120 days",
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        difficulty: "hard",
        price_cents: 479,
    },
    PlantSeed {
        name: "Asparagus",
        category: PlantCategory::Vegetable,
        description: "A perennial bed that produces for twenty years.",
        image_url: "/images/plants/asparagus.jpg",
        growing_time: "1-2 seasons",
        sunlight: Sunlight::FullSun,
        space: Space::Large,
        difficulty: "hard",
        price_cents: 899,
    },
];

const SET_SEEDS: &[SetSeed] = &[
    SetSeed {
        id: "starter-small-sunny",
        space: "small",
        sunlight: "full_sun",
        experience: "beginner",
        time: "low",
        purpose: "food",
        message: "Perfect for small spaces! Here are beginner-friendly, low-maintenance \
                  plants that match your growing conditions.",
        plants: STARTER_PLANTS,
    },
    SetSeed {
        id: "balcony-shade-herbs",
        space: "small",
        sunlight: "partial_sun",
        experience: "beginner",
        time: "low",
        purpose: "decor",
        message: "Shade-tolerant herbs and greens that turn a balcony into a kitchen garden.",
        plants: BALCONY_PLANTS,
    },
    SetSeed {
        id: "backyard-intermediate",
        space: "medium",
        sunlight: "full_sun",
        experience: "intermediate",
        time: "medium",
        purpose: "food",
        message: "A productive backyard rotation for growers ready to plan a season.",
        plants: BACKYARD_PLANTS,
    },
    SetSeed {
        id: "homestead-expert",
        space: "large",
        sunlight: "full_sun",
        experience: "expert",
        time: "high",
        purpose: "food",
        message: "Space-hungry crops with long seasons and serious payoff.",
        plants: HOMESTEAD_PLANTS,
    },
];

struct StoreItemSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    image_url: &'static str,
    price_cents: i64,
    recommended: bool,
}

const STORE_ITEM_SEEDS: &[StoreItemSeed] = &[
    StoreItemSeed {
        id: "watering-can-2l",
        name: "Watering Can (2L)",
        description: "Long-spout can for gentle, precise watering.",
        category: "tools",
        image_url: "/images/store/watering-can.jpg",
        price_cents: 1599,
        recommended: true,
    },
    StoreItemSeed {
        id: "organic-potting-mix",
        name: "Organic Potting Mix",
        description: "Well-drained mix ready for containers and raised beds.",
        category: "soil",
        image_url: "/images/store/potting-mix.jpg",
        price_cents: 1299,
        recommended: true,
    },
    StoreItemSeed {
        id: "seed-starter-trays",
        name: "Seed Starter Trays",
        description: "Reusable trays with humidity domes for early sowing.",
        category: "kits",
        image_url: "/images/store/starter-trays.jpg",
        price_cents: 999,
        recommended: true,
    },
    StoreItemSeed {
        id: "pruning-shears",
        name: "Pruning Shears",
        description: "Bypass shears that stay sharp through a full season.",
        category: "tools",
        image_url: "/images/store/pruning-shears.jpg",
        price_cents: 2199,
        recommended: true,
    },
    StoreItemSeed {
        id: "tomato-fertilizer",
        name: "Tomato Fertilizer",
        description: "Slow-release feed for fruiting vegetables.",
        category: "soil",
        image_url: "/images/store/tomato-fertilizer.jpg",
        price_cents: 899,
        recommended: false,
    },
];

fn build_set(seed: &SetSeed) -> SuggestionSet {
    SuggestionSet {
        id: seed.id.to_owned(),
        space: seed.space.to_owned(),
        sunlight: seed.sunlight.to_owned(),
        experience: seed.experience.to_owned(),
        time: seed.time.to_owned(),
        purpose: seed.purpose.to_owned(),
        message: seed.message.to_owned(),
        plants: seed
            .plants
            .iter()
            .map(|plant| SuggestionPlant {
                name: plant.name.to_owned(),
                category: plant.category,
                description: plant.description.to_owned(),
                image_url: plant.image_url.to_owned(),
                growing_time: plant.growing_time.to_owned(),
                sunlight: plant.sunlight,
                space: plant.space,
                difficulty: plant.difficulty.to_owned(),
                price: Decimal::new(plant.price_cents, 2),
            })
            .collect(),
        active: true,
    }
}

fn build_store_item(seed: &StoreItemSeed) -> StoreItem {
    StoreItem {
        id: seed.id.to_owned(),
        name: seed.name.to_owned(),
        description: seed.description.to_owned(),
        category: seed.category.to_owned(),
        image_url: seed.image_url.to_owned(),
        price: Decimal::new(seed.price_cents, 2),
        recommended: seed.recommended,
    }
}

impl SeedDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let suggestion_repository = SqlSuggestionSetRepository::new(pool.clone());
        let store_repository = SqlStoreItemRepository::new(pool.clone());

        let mut sets = Vec::with_capacity(SET_SEEDS.len());
        for seed in SET_SEEDS {
            let set = build_set(seed);
            let info = SeedSetInfo {
                id: set.id.clone(),
                combination_key: set.key().0,
                plant_count: set.plants.len(),
            };
            suggestion_repository.save(set).await?;
            sets.push(info);
        }

        for seed in STORE_ITEM_SEEDS {
            store_repository.save(build_store_item(seed)).await?;
        }

        Ok(SeedResult { sets, store_items_seeded: STORE_ITEM_SEEDS.len() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let default_sets: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM suggestion_set \
             WHERE combination_key = 'small-full_sun-beginner-low-food' AND active = 1",
        )
        .fetch_one(pool)
        .await?
        .get("count");

        let default_plants: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM suggestion_plant \
             WHERE set_id = 'starter-small-sunny'",
        )
        .fetch_one(pool)
        .await?
        .get("count");

        let recommended_items: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM store_item WHERE recommended = 1")
                .fetch_one(pool)
                .await?
                .get("count");

        let checks = vec![
            ("default-combination", default_sets == 1),
            ("default-plant-count", default_plants == 6),
            ("store-items-recommended", recommended_items >= 4),
        ];
        let all_present = checks.iter().all(|(_, passed)| *passed);

        Ok(VerificationResult { all_present, checks })
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::domain::suggestion::CombinationProfile;
    use trellis_core::resolver::resolve;

    use super::SeedDataset;
    use crate::repositories::{SqlSuggestionSetRepository, SuggestionSetRepository};
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn seed_loads_and_verifies() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let result = SeedDataset::load(&pool).await.expect("seed load");
        assert_eq!(result.sets.len(), 4);
        assert_eq!(result.store_items_seeded, 5);

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.all_present, "failed checks: {:?}", verification.checks);

        pool.close().await;
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        SeedDataset::load(&pool).await.expect("first load");
        SeedDataset::load(&pool).await.expect("second load");

        let verification = SeedDataset::verify(&pool).await.expect("verify");
        assert!(verification.all_present);

        pool.close().await;
    }

    #[tokio::test]
    async fn seeded_default_resolves_to_the_documented_plants() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SeedDataset::load(&pool).await.expect("seed load");

        let repository = SqlSuggestionSetRepository::new(pool.clone());
        let sets = repository.list_active().await.expect("list");

        let profile = CombinationProfile::canonical_default();
        let resolved = resolve(&sets, &profile).expect("default tuple should resolve");

        let names: Vec<&str> =
            resolved.set.plants.iter().map(|plant| plant.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Cherry Tomato", "Strawberry", "Sweet Basil", "Fresh Mint", "Bell Pepper", "Lettuce"]
        );
        assert_eq!(
            resolved.set.message,
            "Perfect for small spaces! Here are beginner-friendly, low-maintenance plants \
             that match your growing conditions."
        );

        pool.close().await;
    }
}
