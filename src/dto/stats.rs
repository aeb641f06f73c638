use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct OverviewCounts {
    pub users: i64,
    pub producers: i64,
    pub products: i64,
    pub orders: i64,
    pub payments: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RevenueStats {
    pub total_revenue: i64,
    pub avg_order_value: f64,
    pub total_orders: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RecentOrder {
    pub id: Uuid,
    pub status: String,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RecentUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentActivitySnapshot {
    pub orders: Vec<RecentOrder>,
    pub users: Vec<RecentUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Overview {
    pub counts: OverviewCounts,
    pub revenue: RevenueStats,
    pub recent_activity: RecentActivitySnapshot,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingStats {
    pub pending_producers: i64,
    pub pending_products: i64,
    pub pending_orders: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone, FromRow, ToSchema)]
pub struct RealtimeCounts {
    pub new_users_today: i64,
    pub orders_today: i64,
    pub revenue_today: i64,
    pub pending_producers: i64,
    pub pending_products: i64,
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct RealtimeStats {
    #[serde(flatten)]
    pub counts: RealtimeCounts,
    pub timestamp: DateTime<Utc>,
}

/// Raw counts behind the notification badges. The one-hour window on new
/// orders is deliberate; the unbounded pending-order count lives in
/// [`PendingStats`] instead.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct NotificationCounts {
    pub pending_producers: i64,
    pub pending_products: i64,
    pub new_orders_last_hour: i64,
}

/// One badge entry on the admin dashboard. The scheduled broadcaster and the
/// polling endpoint both produce this shape; zero-count entries are dropped.
#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct Notification {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub count: i64,
    pub priority: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct OrderTrend {
    pub date: NaiveDate,
    pub order_count: i64,
    pub daily_revenue: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopProduct {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub order_count: i64,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopProducer {
    pub id: Uuid,
    pub business_name: String,
    pub order_count: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsReport {
    pub period: i64,
    pub order_trends: Vec<OrderTrend>,
    pub top_products: Vec<TopProduct>,
    pub top_producers: Vec<TopProducer>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PaymentTotals {
    pub total_payments: i64,
    pub total_revenue: i64,
    pub pending_amount: i64,
    pub failed_amount: i64,
    pub avg_payment: f64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RecentPayment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatsReport {
    pub stats: PaymentTotals,
    pub recent: Vec<RecentPayment>,
}

/// One row of the merged activity feed.
#[derive(Debug, Serialize, Clone, FromRow, ToSchema)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub reference_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthMetrics {
    pub users: i64,
    pub orders: i64,
    pub products: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemHealth {
    pub status: String,
    pub database: String,
    pub metrics: Option<HealthMetrics>,
    pub timestamp: DateTime<Utc>,
}
