use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use trellis_core::domain::plant::{PlantCategory, Space, Sunlight};
use trellis_core::domain::suggestion::{SuggestionPlant, SuggestionSet};

use super::{RepositoryError, SuggestionSetRepository};
use crate::DbPool;

pub struct SqlSuggestionSetRepository {
    pool: DbPool,
}

impl SqlSuggestionSetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode<T, E: std::fmt::Display>(result: Result<T, E>) -> Result<T, RepositoryError> {
    result.map_err(|error| RepositoryError::Decode(error.to_string()))
}

fn row_to_plant(row: &sqlx::sqlite::SqliteRow) -> Result<SuggestionPlant, RepositoryError> {
    let category: String = decode(row.try_get("category"))?;
    let sunlight: String = decode(row.try_get("sunlight"))?;
    let space: String = decode(row.try_get("space"))?;
    let price: String = decode(row.try_get("price"))?;

    Ok(SuggestionPlant {
        name: decode(row.try_get("name"))?,
        category: decode(PlantCategory::parse(&category))?,
        description: decode(row.try_get("description"))?,
        image_url: decode(row.try_get("image_url"))?,
        growing_time: decode(row.try_get("growing_time"))?,
        sunlight: decode(Sunlight::parse(&sunlight))?,
        space: decode(Space::parse(&space))?,
        difficulty: decode(row.try_get("difficulty"))?,
        price: decode(price.parse::<Decimal>())?,
    })
}

#[async_trait::async_trait]
impl SuggestionSetRepository for SqlSuggestionSetRepository {
    async fn list_active(&self) -> Result<Vec<SuggestionSet>, RepositoryError> {
        let set_rows = sqlx::query(
            "SELECT id, space, sunlight, experience, time, purpose, message, active
             FROM suggestion_set
             WHERE active = 1
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut sets = Vec::with_capacity(set_rows.len());
        for row in &set_rows {
            let id: String = decode(row.try_get("id"))?;
            let plant_rows = sqlx::query(
                "SELECT name, category, description, image_url, growing_time,
                        sunlight, space, difficulty, price
                 FROM suggestion_plant
                 WHERE set_id = ?
                 ORDER BY position",
            )
            .bind(&id)
            .fetch_all(&self.pool)
            .await?;

            let plants =
                plant_rows.iter().map(row_to_plant).collect::<Result<Vec<_>, _>>()?;

            sets.push(SuggestionSet {
                id,
                space: decode(row.try_get("space"))?,
                sunlight: decode(row.try_get("sunlight"))?,
                experience: decode(row.try_get("experience"))?,
                time: decode(row.try_get("time"))?,
                purpose: decode(row.try_get("purpose"))?,
                message: decode(row.try_get("message"))?,
                plants,
                active: decode(row.try_get::<i64, _>("active"))? != 0,
            });
        }

        Ok(sets)
    }

    async fn save(&self, set: SuggestionSet) -> Result<(), RepositoryError> {
        // The key column is always derived from the discrete fields here, so
        // request-path and persistence-path keys cannot diverge.
        let combination_key = set.key().0;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO suggestion_set
                (id, space, sunlight, experience, time, purpose,
                 combination_key, message, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                space = excluded.space,
                sunlight = excluded.sunlight,
                experience = excluded.experience,
                time = excluded.time,
                purpose = excluded.purpose,
                combination_key = excluded.combination_key,
                message = excluded.message,
                active = excluded.active",
        )
        .bind(&set.id)
        .bind(&set.space)
        .bind(&set.sunlight)
        .bind(&set.experience)
        .bind(&set.time)
        .bind(&set.purpose)
        .bind(&combination_key)
        .bind(&set.message)
        .bind(i64::from(set.active))
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM suggestion_plant WHERE set_id = ?")
            .bind(&set.id)
            .execute(&mut *tx)
            .await?;

        for (position, plant) in set.plants.iter().enumerate() {
            sqlx::query(
                "INSERT INTO suggestion_plant
                    (id, set_id, position, name, category, description, image_url,
                     growing_time, sunlight, space, difficulty, price)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(format!("{}:{position}", set.id))
            .bind(&set.id)
            .bind(position as i64)
            .bind(&plant.name)
            .bind(plant.category.as_str())
            .bind(&plant.description)
            .bind(&plant.image_url)
            .bind(&plant.growing_time)
            .bind(plant.sunlight.as_str())
            .bind(plant.space.as_str())
            .bind(&plant.difficulty)
            .bind(plant.price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use trellis_core::domain::plant::{PlantCategory, Space, Sunlight};
    use trellis_core::domain::suggestion::{CombinationProfile, SuggestionPlant, SuggestionSet};
    use trellis_core::resolver::resolve;

    use super::SqlSuggestionSetRepository;
    use crate::repositories::SuggestionSetRepository;
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlSuggestionSetRepository {
        let pool =
            connect_with_settings("sqlite::memory:", 1, 30).await.expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations should apply");
        SqlSuggestionSetRepository::new(pool)
    }

    fn plant(name: &str, position_price_cents: i64) -> SuggestionPlant {
        SuggestionPlant {
            name: name.to_string(),
            category: PlantCategory::Vegetable,
            description: format!("{name} for the balcony"),
            image_url: format!("/img/{}.jpg", name.to_ascii_lowercase().replace(' ', "-")),
            growing_time: "60 days".to_string(),
            sunlight: Sunlight::FullSun,
            space: Space::Small,
            difficulty: "easy".to_string(),
            price: Decimal::new(position_price_cents, 2),
        }
    }

    fn set(id: &str, space: &str, time: &str) -> SuggestionSet {
        SuggestionSet {
            id: id.to_string(),
            space: space.to_string(),
            sunlight: "full_sun".to_string(),
            experience: "beginner".to_string(),
            time: time.to_string(),
            purpose: "food".to_string(),
            message: format!("message for {id}"),
            plants: vec![plant("Cherry Tomato", 499), plant("Lettuce", 299)],
            active: true,
        }
    }

    #[tokio::test]
    async fn save_and_list_round_trips_sets_with_plants_in_order() {
        let repository = repository().await;

        repository.save(set("starter", "small", "low")).await.expect("save starter");
        repository.save(set("greedy", "large", "high")).await.expect("save greedy");

        let sets = repository.list_active().await.expect("list");
        assert_eq!(sets.len(), 2);

        let starter = sets.iter().find(|set| set.id == "starter").expect("starter present");
        assert_eq!(starter.plants.len(), 2);
        assert_eq!(starter.plants[0].name, "Cherry Tomato");
        assert_eq!(starter.plants[1].name, "Lettuce");
        assert_eq!(starter.plants[0].price, Decimal::new(499, 2));
    }

    #[tokio::test]
    async fn resaving_a_set_replaces_its_plants() {
        let repository = repository().await;

        repository.save(set("starter", "small", "low")).await.expect("first save");

        let mut updated = set("starter", "small", "low");
        updated.plants = vec![plant("Radish", 199)];
        repository.save(updated).await.expect("second save");

        let sets = repository.list_active().await.expect("list");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].plants.len(), 1);
        assert_eq!(sets[0].plants[0].name, "Radish");
    }

    #[tokio::test]
    async fn inactive_sets_are_not_listed() {
        let repository = repository().await;

        let mut retired = set("retired", "medium", "medium");
        retired.active = false;
        repository.save(retired).await.expect("save retired");

        let sets = repository.list_active().await.expect("list");
        assert!(sets.is_empty());
    }

    #[tokio::test]
    async fn listed_sets_feed_the_resolver_for_exact_and_triple_matches() {
        let repository = repository().await;
        repository.save(set("starter", "small", "low")).await.expect("save");

        let sets = repository.list_active().await.expect("list");

        let exact =
            CombinationProfile::new("small", "full_sun", "beginner", "low", "food").unwrap();
        let resolved = resolve(&sets, &exact).expect("exact resolution");
        assert_eq!(resolved.set.id, "starter");
        assert_eq!(resolved.quality.as_str(), "exact");

        let triple_only =
            CombinationProfile::new("small", "full_sun", "beginner", "high", "decor").unwrap();
        let resolved = resolve(&sets, &triple_only).expect("fallback resolution");
        assert_eq!(resolved.set.id, "starter");
        assert_eq!(resolved.quality.as_str(), "fallback");
    }
}
