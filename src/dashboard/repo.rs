use async_trait::async_trait;
use sqlx::PgPool;

use crate::dashboard::repo_types::{MetricTotals, MonthlyCount, MonthlyTotal, NamedValue};
use crate::db::StoreError;

/// Aggregates over the subscription and revenue tables. Months are `YYYY-MM`
/// in UTC, oldest first; sources and plans are in byte order.
#[async_trait]
pub trait MetricsRepo: Send + Sync {
    async fn totals(&self) -> Result<MetricTotals, StoreError>;
    async fn subscriptions_by_month(&self) -> Result<Vec<MonthlyCount>, StoreError>;
    async fn revenue_by_month(&self) -> Result<Vec<MonthlyTotal>, StoreError>;
    async fn revenue_by_source(&self) -> Result<Vec<NamedValue>, StoreError>;
}

#[derive(Clone)]
pub struct PgMetricsRepo {
    db: PgPool,
}

impl PgMetricsRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetricsRepo for PgMetricsRepo {
    async fn totals(&self) -> Result<MetricTotals, StoreError> {
        let (active_subscriptions, total_revenue): (i64, f64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM subscriptions WHERE status = 'active'),
                (SELECT COALESCE(SUM(amount), 0)::float8 FROM revenues)
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let subscriptions_by_plan = sqlx::query_as::<_, NamedValue>(
            r#"
            SELECT plan AS name, COUNT(*)::float8 AS value
            FROM subscriptions
            GROUP BY plan
            ORDER BY plan COLLATE "C"
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(MetricTotals {
            active_subscriptions,
            total_revenue,
            subscriptions_by_plan,
        })
    }

    async fn subscriptions_by_month(&self) -> Result<Vec<MonthlyCount>, StoreError> {
        let rows = sqlx::query_as::<_, MonthlyCount>(
            r#"
            SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM') AS month,
                   COUNT(*) AS count
            FROM subscriptions
            GROUP BY month
            ORDER BY month
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn revenue_by_month(&self) -> Result<Vec<MonthlyTotal>, StoreError> {
        let rows = sqlx::query_as::<_, MonthlyTotal>(
            r#"
            SELECT to_char(date AT TIME ZONE 'UTC', 'YYYY-MM') AS month,
                   SUM(amount) AS total
            FROM revenues
            GROUP BY month
            ORDER BY month
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn revenue_by_source(&self) -> Result<Vec<NamedValue>, StoreError> {
        let rows = sqlx::query_as::<_, NamedValue>(
            r#"
            SELECT source AS name, SUM(amount) AS value
            FROM revenues
            GROUP BY source
            ORDER BY source COLLATE "C"
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
