use serde::Serialize;
use sqlx::FromRow;

/// Chart slice: a label and its total.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: String,
    pub count: i64,
}

/// Subscription and revenue figures for the metrics card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTotals {
    pub active_subscriptions: i64,
    pub total_revenue: f64,
    pub subscriptions_by_plan: Vec<NamedValue>,
}
