use rust_decimal::Decimal;
use sqlx::Row;

use trellis_core::domain::store::StoreItem;

use super::{RepositoryError, StoreItemRepository};
use crate::DbPool;

pub struct SqlStoreItemRepository {
    pool: DbPool,
}

impl SqlStoreItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<StoreItem, RepositoryError> {
    let decode = |error: sqlx::Error| RepositoryError::Decode(error.to_string());
    let price: String = row.try_get("price").map_err(decode)?;

    Ok(StoreItem {
        id: row.try_get("id").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        image_url: row.try_get("image_url").map_err(decode)?,
        price: price
            .parse::<Decimal>()
            .map_err(|error| RepositoryError::Decode(error.to_string()))?,
        recommended: row.try_get::<i64, _>("recommended").map_err(decode)? != 0,
    })
}

#[async_trait::async_trait]
impl StoreItemRepository for SqlStoreItemRepository {
    async fn list_recommended(&self, limit: u32) -> Result<Vec<StoreItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, description, category, image_url, price, recommended
             FROM store_item
             WHERE recommended = 1
             ORDER BY id
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_item).collect()
    }

    async fn save(&self, item: StoreItem) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO store_item
                (id, name, description, category, image_url, price, recommended)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                image_url = excluded.image_url,
                price = excluded.price,
                recommended = excluded.recommended",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(item.price.to_string())
        .bind(i64::from(item.recommended))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use trellis_core::domain::store::StoreItem;

    use super::SqlStoreItemRepository;
    use crate::repositories::StoreItemRepository;
    use crate::{connect_with_settings, migrations};

    async fn repository() -> SqlStoreItemRepository {
        let pool =
            connect_with_settings("sqlite::memory:", 1, 30).await.expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations should apply");
        SqlStoreItemRepository::new(pool)
    }

    fn item(id: &str, recommended: bool) -> StoreItem {
        StoreItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "A useful garden product".to_string(),
            category: "tools".to_string(),
            image_url: format!("/images/store/{id}.jpg"),
            price: Decimal::new(1299, 2),
            recommended,
        }
    }

    #[tokio::test]
    async fn list_recommended_honors_flag_and_limit() {
        let repository = repository().await;

        for index in 0..6 {
            repository
                .save(item(&format!("item-{index}"), index % 2 == 0))
                .await
                .expect("save item");
        }

        let recommended = repository.list_recommended(4).await.expect("list");
        assert_eq!(recommended.len(), 3, "only the flagged items qualify");
        assert!(recommended.iter().all(|item| item.recommended));

        let capped = repository.list_recommended(2).await.expect("list capped");
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn save_upserts_on_id() {
        let repository = repository().await;

        repository.save(item("kit", true)).await.expect("insert");
        let mut renamed = item("kit", true);
        renamed.name = "Renamed Kit".to_string();
        repository.save(renamed).await.expect("update");

        let listed = repository.list_recommended(10).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Renamed Kit");
        assert_eq!(listed[0].price, Decimal::new(1299, 2));
    }
}
