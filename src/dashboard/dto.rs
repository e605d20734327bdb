use serde::Serialize;
use time::OffsetDateTime;

use crate::auth::repo_types::WebsitePreferences;
use crate::dashboard::repo_types::{MetricTotals, NamedValue};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_users: i64,
    pub total_templates: i64,
    pub active_subscriptions: i64,
    pub total_revenue: f64,
    pub subscriptions_by_plan: Vec<NamedValue>,
}

impl Metrics {
    pub fn new(total_users: i64, total_templates: i64, totals: MetricTotals) -> Self {
        Self {
            total_users,
            total_templates,
            active_subscriptions: totals.active_subscriptions,
            total_revenue: totals.total_revenue,
            subscriptions_by_plan: totals.subscriptions_by_plan,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub email: String,
    pub website_preferences: WebsitePreferences,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: &'static str,
    pub user: DashboardUser,
}
