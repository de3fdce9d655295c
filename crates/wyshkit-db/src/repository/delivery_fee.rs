//! # Delivery Fee Repository
//!
//! The admin's delivery fee schedule and the platform free-delivery
//! threshold.
//!
//! Tiers are individually editable (upsert, toggle active) or replaced as
//! a whole. Only whole-schedule replacement checks continuity across
//! tiers; single-tier edits check the tier's own fields.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use wyshkit_core::validation::{validate_delivery_schedule, validate_non_negative, DeliveryIssue};
use wyshkit_core::{
    CoreError, DeliveryFeeSchedule, DeliveryFeeTier, Money, ValidationError,
    DEFAULT_FREE_DELIVERY_THRESHOLD,
};

/// `platform_config` key holding the threshold in paise.
pub const FREE_THRESHOLD_KEY: &str = "free_delivery_threshold";

const SELECT_TIERS: &str = r#"
    SELECT id, rule_name, order_value_min, order_value_max, fee_amount,
           distance_min_km, distance_max_km, distance_surcharge,
           is_active, priority
    FROM delivery_fee_tiers
"#;

/// Repository for delivery fee tiers and platform delivery settings.
#[derive(Debug, Clone)]
pub struct DeliveryFeeRepository {
    pool: SqlitePool,
}

impl DeliveryFeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryFeeRepository { pool }
    }

    // =========================================================================
    // Tiers
    // =========================================================================

    /// Every tier, active or not, by priority.
    pub async fn list_tiers(&self) -> DbResult<Vec<DeliveryFeeTier>> {
        let sql = format!("{SELECT_TIERS} ORDER BY priority, id");
        let tiers = sqlx::query_as::<_, DeliveryFeeTier>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tiers)
    }

    /// Active tiers only, by priority.
    pub async fn list_active(&self) -> DbResult<Vec<DeliveryFeeTier>> {
        let sql = format!("{SELECT_TIERS} WHERE is_active = 1 ORDER BY priority, id");
        let tiers = sqlx::query_as::<_, DeliveryFeeTier>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tiers)
    }

    /// Inserts or updates one tier. A blank `id` gets a fresh UUID.
    ///
    /// ## Returns
    /// The stored tier id.
    ///
    /// ## Errors
    /// * `DbError::InvalidData` - negative fee or surcharge, inverted ranges
    pub async fn upsert_tier(&self, tier: &DeliveryFeeTier) -> DbResult<String> {
        check_tier_fields(tier)?;

        let id = if tier.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            tier.id.clone()
        };
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO delivery_fee_tiers (
                id, rule_name, order_value_min, order_value_max, fee_amount,
                distance_min_km, distance_max_km, distance_surcharge,
                is_active, priority, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            ON CONFLICT(id) DO UPDATE SET
                rule_name          = excluded.rule_name,
                order_value_min    = excluded.order_value_min,
                order_value_max    = excluded.order_value_max,
                fee_amount         = excluded.fee_amount,
                distance_min_km    = excluded.distance_min_km,
                distance_max_km    = excluded.distance_max_km,
                distance_surcharge = excluded.distance_surcharge,
                is_active          = excluded.is_active,
                priority           = excluded.priority,
                updated_at         = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(&tier.rule_name)
        .bind(tier.order_value_min)
        .bind(tier.order_value_max)
        .bind(tier.fee_amount)
        .bind(tier.distance_min_km)
        .bind(tier.distance_max_km)
        .bind(tier.distance_surcharge)
        .bind(tier.is_active)
        .bind(tier.priority)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(id = %id, rule = %tier.rule_name, "Upserted delivery fee tier");
        Ok(id)
    }

    /// Turns a tier on or off without touching its band.
    ///
    /// ## Errors
    /// `DbError::NotFound` when no tier has `id`.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE delivery_fee_tiers SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Delivery fee tier", id));
        }

        info!(id = %id, active, "Delivery fee tier toggled");
        Ok(())
    }

    /// Replaces the whole schedule in one transaction.
    ///
    /// ## Errors
    /// * `DbError::InvalidData` - the schedule has gaps, overlaps, negative
    ///   amounts or no active tier
    pub async fn replace_all(&self, tiers: &[DeliveryFeeTier]) -> DbResult<()> {
        let report = validate_delivery_schedule(tiers);
        if !report.is_valid() {
            return Err(CoreError::InvalidDeliverySchedule(report.issues).into());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM delivery_fee_tiers")
            .execute(&mut *tx)
            .await?;

        for tier in tiers {
            sqlx::query(
                r#"
                INSERT INTO delivery_fee_tiers (
                    id, rule_name, order_value_min, order_value_max, fee_amount,
                    distance_min_km, distance_max_km, distance_surcharge,
                    is_active, priority, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
                "#,
            )
            .bind(&tier.id)
            .bind(&tier.rule_name)
            .bind(tier.order_value_min)
            .bind(tier.order_value_max)
            .bind(tier.fee_amount)
            .bind(tier.distance_min_km)
            .bind(tier.distance_max_km)
            .bind(tier.distance_surcharge)
            .bind(tier.is_active)
            .bind(tier.priority)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(tiers = tiers.len(), "Replaced delivery fee schedule");
        Ok(())
    }

    // =========================================================================
    // Platform Threshold
    // =========================================================================

    /// Free-delivery threshold, or the platform default when unset.
    ///
    /// ## Errors
    /// `DbError::InvalidData` when the stored value is not whole paise.
    pub async fn free_threshold(&self) -> DbResult<Money> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM platform_config WHERE key = ?1")
                .bind(FREE_THRESHOLD_KEY)
                .fetch_optional(&self.pool)
                .await?;

        let Some(value) = value else {
            warn!("Free delivery threshold not configured, using default");
            return Ok(DEFAULT_FREE_DELIVERY_THRESHOLD);
        };

        let paise: i64 = value.trim().parse().map_err(|_| ValidationError::InvalidFormat {
            field: FREE_THRESHOLD_KEY.to_string(),
            reason: format!("'{value}' is not a whole number of paise"),
        })?;
        Ok(Money::from_paise(paise))
    }

    /// Stores a new free-delivery threshold.
    pub async fn set_free_threshold(&self, threshold: Money) -> DbResult<()> {
        validate_non_negative("free_delivery_threshold", threshold)?;

        sqlx::query(
            r#"
            INSERT INTO platform_config (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(FREE_THRESHOLD_KEY)
        .bind(threshold.paise().to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(threshold = %threshold, "Free delivery threshold updated");
        Ok(())
    }

    /// Loads the full schedule ready for resolution.
    pub async fn schedule(&self, fallback_fee: Money) -> DbResult<DeliveryFeeSchedule> {
        let tiers = self.list_tiers().await?;
        let threshold = self.free_threshold().await?;
        Ok(DeliveryFeeSchedule::new(tiers, threshold).with_fallback_fee(fallback_fee))
    }
}

/// Field-level checks for a single tier; continuity is a schedule concern.
fn check_tier_fields(tier: &DeliveryFeeTier) -> DbResult<()> {
    let candidate = DeliveryFeeTier { is_active: true, ..tier.clone() };
    let issues: Vec<DeliveryIssue> = validate_delivery_schedule(std::slice::from_ref(&candidate)).issues;
    if issues.is_empty() {
        Ok(())
    } else {
        Err(DbError::InvalidData(CoreError::InvalidDeliverySchedule(issues)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use wyshkit_core::delivery::default_delivery_tiers;
    use wyshkit_core::DEFAULT_FALLBACK_DELIVERY_FEE;

    async fn repo() -> DeliveryFeeRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().delivery_fees()
    }

    #[tokio::test]
    async fn test_replace_all_and_schedule() {
        let repo = repo().await;
        repo.replace_all(&default_delivery_tiers()).await.unwrap();

        let tiers = repo.list_tiers().await.unwrap();
        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers[0].id, "tier-1");
        assert_eq!(tiers[3].order_value_max, None);

        let schedule = repo.schedule(DEFAULT_FALLBACK_DELIVERY_FEE).await.unwrap();
        assert_eq!(schedule, DeliveryFeeSchedule::default());

        let calc = schedule.resolve(Money::from_paise(450000), 0.0);
        assert_eq!(calc.fee, Money::from_paise(3000));
    }

    #[tokio::test]
    async fn test_invalid_schedule_rejected() {
        let repo = repo().await;
        let mut tiers = default_delivery_tiers();
        tiers[1].order_value_min = Money::from_paise(150000);

        let err = repo.replace_all(&tiers).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData(CoreError::InvalidDeliverySchedule(_))));
        assert!(repo.list_tiers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_assigns_id_and_updates() {
        let repo = repo().await;
        let tier = DeliveryFeeTier::new("", "Metro", Money::zero(), None, Money::from_paise(4000), 1)
            .with_distance_surcharge(10.0, 25.0, Money::from_paise(2000));

        let id = repo.upsert_tier(&tier).await.unwrap();
        assert!(!id.is_empty());

        let updated = DeliveryFeeTier { id: id.clone(), fee_amount: Money::from_paise(3500), ..tier };
        assert_eq!(repo.upsert_tier(&updated).await.unwrap(), id);

        let tiers = repo.list_tiers().await.unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].fee_amount, Money::from_paise(3500));
        assert_eq!(tiers[0].distance_max_km, Some(25.0));
    }

    #[tokio::test]
    async fn test_upsert_rejects_negative_fee() {
        let repo = repo().await;
        let tier = DeliveryFeeTier::new("bad", "Bad", Money::zero(), None, Money::from_paise(-100), 1);
        assert!(matches!(repo.upsert_tier(&tier).await, Err(DbError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_set_active() {
        let repo = repo().await;
        repo.replace_all(&default_delivery_tiers()).await.unwrap();

        repo.set_active("tier-2", false).await.unwrap();
        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|t| t.id != "tier-2"));

        assert!(matches!(repo.set_active("nope", true).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_threshold_roundtrip() {
        let repo = repo().await;
        assert_eq!(repo.free_threshold().await.unwrap(), DEFAULT_FREE_DELIVERY_THRESHOLD);

        repo.set_free_threshold(Money::from_paise(300000)).await.unwrap();
        assert_eq!(repo.free_threshold().await.unwrap(), Money::from_paise(300000));

        assert!(repo.set_free_threshold(Money::from_paise(-1)).await.is_err());
    }

    #[tokio::test]
    async fn test_threshold_defaults_when_row_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("DELETE FROM platform_config").execute(db.pool()).await.unwrap();
        assert_eq!(db.delivery_fees().free_threshold().await.unwrap(), DEFAULT_FREE_DELIVERY_THRESHOLD);

        sqlx::query("INSERT INTO platform_config (key, value, updated_at) VALUES (?1, 'lots', '')")
            .bind(FREE_THRESHOLD_KEY)
            .execute(db.pool())
            .await
            .unwrap();
        assert!(db.delivery_fees().free_threshold().await.is_err());
    }
}
