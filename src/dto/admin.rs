use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApprovalRequest {
    pub is_approved: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResult {
    pub is_approved: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserStatusRequest {
    pub is_verified: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatusResult {
    pub is_verified: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusResult {
    pub status: String,
}

/// Pending producer row joined with the owning user account.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PendingProducer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub description: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Pending product row joined with category and producer names.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PendingProduct {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock_quantity: i32,
    pub category_name: Option<String>,
    pub producer_name: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub business_name: Option<String>,
    pub producer_approved: Option<bool>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub producer_id: Uuid,
    pub status: String,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub producer_name: String,
    pub item_count: i64,
    pub product_names: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingProducerList {
    pub items: Vec<PendingProducer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingProductList {
    pub items: Vec<PendingProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummaryList {
    pub items: Vec<UserSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryList {
    pub items: Vec<OrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformInfo {
    pub name: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub maintenance_mode: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeeSettings {
    pub platform_fee_percentage: f64,
    pub payment_processing_fee: f64,
    pub minimum_order_amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LimitSettings {
    pub max_products_per_producer: i64,
    pub max_order_items: i64,
    pub max_file_size_mb: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
}

/// Static platform settings. There is no settings table yet; the endpoint
/// echoes this fixed configuration.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformSettings {
    pub platform: PlatformInfo,
    pub fees: FeeSettings,
    pub limits: LimitSettings,
    pub notifications: NotificationSettings,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            platform: PlatformInfo {
                name: "Harvest Hub".into(),
                description: "Digital Farmers Market Platform".into(),
                email: "admin@harvesthub.com".into(),
                phone: "+1-555-0123".into(),
                maintenance_mode: false,
            },
            fees: FeeSettings {
                platform_fee_percentage: 5.0,
                payment_processing_fee: 2.9,
                minimum_order_amount: 10.0,
            },
            limits: LimitSettings {
                max_products_per_producer: 100,
                max_order_items: 50,
                max_file_size_mb: 10,
            },
            notifications: NotificationSettings {
                email_notifications: true,
                sms_notifications: false,
                push_notifications: true,
            },
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    #[schema(value_type = Option<Object>)]
    pub platform: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub fees: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub limits: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub notifications: Option<serde_json::Value>,
}
