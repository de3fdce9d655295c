//! # Pricing Tier Repository
//!
//! Seller tier tables, one per product.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    replace_tiers("mug-classic", rows)                   │
//! │                                                                         │
//! │  validate_product_id ──► TierTable::validated (gaps, overlaps, prices) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    DELETE FROM pricing_tiers WHERE product_id = ?                       │
//! │    INSERT × n (sorted by min_qty)                                       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Readers never see a half-written table.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use wyshkit_core::validation::validate_product_id;
use wyshkit_core::{PricingTier, TierTable};

/// Repository for seller pricing tiers.
#[derive(Debug, Clone)]
pub struct PricingTierRepository {
    pool: SqlitePool,
}

impl PricingTierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PricingTierRepository { pool }
    }

    /// Raw tier rows for a product, ordered by `min_qty`. Empty when the
    /// product has no tiers.
    pub async fn get_tiers(&self, product_id: &str) -> DbResult<Vec<PricingTier>> {
        let tiers = sqlx::query_as::<_, PricingTier>(
            r#"
            SELECT min_qty, max_qty, price_per_item, discount_percent
            FROM pricing_tiers
            WHERE product_id = ?1
            ORDER BY min_qty
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(product_id = %product_id, count = tiers.len(), "Loaded pricing tiers");
        Ok(tiers)
    }

    /// The product's tier table, ready for price resolution.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the product has no tiers.
    pub async fn get_table(&self, product_id: &str) -> DbResult<TierTable> {
        let tiers = self.get_tiers(product_id).await?;
        if tiers.is_empty() {
            return Err(DbError::not_found("Pricing tiers", product_id));
        }
        Ok(TierTable::new(tiers)?)
    }

    /// Replaces a product's whole tier table.
    ///
    /// The new table must pass seller validation; nothing is written
    /// otherwise.
    ///
    /// ## Errors
    /// * `DbError::InvalidData` - blank product id or invalid table
    pub async fn replace_tiers(&self, product_id: &str, tiers: &[PricingTier]) -> DbResult<TierTable> {
        validate_product_id(product_id)?;
        let table = TierTable::validated(tiers.to_vec())?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pricing_tiers WHERE product_id = ?1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for tier in table.tiers() {
            sqlx::query(
                r#"
                INSERT INTO pricing_tiers (
                    product_id, min_qty, max_qty, price_per_item, discount_percent,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(product_id)
            .bind(tier.min_qty)
            .bind(tier.max_qty)
            .bind(tier.price_per_item)
            .bind(tier.discount_percent)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(product_id = %product_id, tiers = table.len(), "Replaced pricing tiers");
        Ok(table)
    }

    /// Removes every tier of a product. Returns the number of rows removed.
    pub async fn delete_tiers(&self, product_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM pricing_tiers WHERE product_id = ?1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        debug!(product_id = %product_id, removed = result.rows_affected(), "Deleted pricing tiers");
        Ok(result.rows_affected())
    }

    /// Products that have a tier table, alphabetically.
    pub async fn list_products(&self) -> DbResult<Vec<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT product_id FROM pricing_tiers ORDER BY product_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }

    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT product_id) FROM pricing_tiers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use wyshkit_core::pricing::default_tiers;
    use wyshkit_core::{CoreError, Money};

    async fn repo() -> PricingTierRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().pricing_tiers()
    }

    fn mug_tiers() -> Vec<PricingTier> {
        vec![
            PricingTier::new(50, None, Money::from_paise(800), 20),
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(10, Some(49), Money::from_paise(900), 10),
        ]
    }

    #[tokio::test]
    async fn test_replace_and_read_back_sorted() {
        let repo = repo().await;
        repo.replace_tiers("mug-classic", &mug_tiers()).await.unwrap();

        let tiers = repo.get_tiers("mug-classic").await.unwrap();
        let mins: Vec<u32> = tiers.iter().map(|t| t.min_qty).collect();
        assert_eq!(mins, vec![1, 10, 50]);
        assert_eq!(tiers[2].max_qty, None);
        assert_eq!(tiers[1].price_per_item, Money::from_paise(900));

        let table = repo.get_table("mug-classic").await.unwrap();
        assert_eq!(table.resolve(25).subtotal, Money::from_paise(22500));
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_table() {
        let repo = repo().await;
        repo.replace_tiers("mug-classic", &mug_tiers()).await.unwrap();
        repo.replace_tiers("mug-classic", default_tiers(Money::from_paise(50000)).tiers())
            .await
            .unwrap();

        let tiers = repo.get_tiers("mug-classic").await.unwrap();
        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers[0].price_per_item, Money::from_paise(50000));
    }

    #[tokio::test]
    async fn test_invalid_table_is_not_written() {
        let repo = repo().await;
        repo.replace_tiers("mug-classic", &mug_tiers()).await.unwrap();

        let gapped = vec![
            PricingTier::new(1, Some(9), Money::from_paise(1000), 0),
            PricingTier::new(20, None, Money::from_paise(900), 10),
        ];
        let err = repo.replace_tiers("mug-classic", &gapped).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData(CoreError::InvalidTierTable(_))));

        assert_eq!(repo.get_tiers("mug-classic").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_band_maps_to_unique_violation() {
        let repo = repo().await;
        repo.replace_tiers("mug-classic", &mug_tiers()).await.unwrap();

        let err: DbError = sqlx::query(
            r#"
            INSERT INTO pricing_tiers
                (product_id, min_qty, max_qty, price_per_item, discount_percent, created_at, updated_at)
            VALUES ('mug-classic', 1, 9, 1000, 0, '2024-01-01', '2024-01-01')
            "#,
        )
        .execute(&repo.pool)
        .await
        .unwrap_err()
        .into();

        match err {
            DbError::UniqueViolation { field, .. } => assert!(field.contains("pricing_tiers.min_qty")),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_product_id_rejected() {
        let repo = repo().await;
        let err = repo.replace_tiers("  ", &mug_tiers()).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let repo = repo().await;
        assert!(repo.get_tiers("nope").await.unwrap().is_empty());
        assert!(matches!(repo.get_table("nope").await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_count_and_delete() {
        let repo = repo().await;
        repo.replace_tiers("mug-classic", &mug_tiers()).await.unwrap();
        repo.replace_tiers("diary-a5", &mug_tiers()).await.unwrap();

        assert_eq!(repo.list_products().await.unwrap(), vec!["diary-a5", "mug-classic"]);
        assert_eq!(repo.count_products().await.unwrap(), 2);

        assert_eq!(repo.delete_tiers("diary-a5").await.unwrap(), 3);
        assert_eq!(repo.count_products().await.unwrap(), 1);
        assert_eq!(repo.delete_tiers("diary-a5").await.unwrap(), 0);
    }
}
