use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::admin::{
        ApprovalRequest, ApprovalResult, OrderStatusResult, OrderSummaryList,
        PendingProducerList, PendingProductList, PlatformSettings, UpdateOrderStatusRequest,
        UpdateSettingsRequest, UserStatusRequest, UserStatusResult, UserSummaryList,
    },
    dto::stats::{
        ActivityItem, AnalyticsReport, Notification, Overview, PaymentStatsReport, PendingStats,
        RealtimeStats, SystemHealth,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::{ActivityQuery, AnalyticsQuery, OrderListQuery, UserListQuery},
    services::{admin_service, stats_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/producers/pending", get(pending_producers))
        .route("/producers/{id}/approval", patch(producer_approval))
        .route("/products/pending", get(pending_products))
        .route("/products/{id}/approval", patch(product_approval))
        .route("/users", get(list_users))
        .route("/users/{id}/status", patch(user_status))
        .route("/analytics", get(analytics))
        .route("/health", get(system_health))
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", patch(order_status))
        .route("/payments/stats", get(payment_stats))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/stats/realtime", get(realtime_stats))
        .route("/notifications", get(notifications))
        .route("/recent-activity", get(recent_activity))
        .route("/pending-stats", get(pending_stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/overview",
    responses(
        (status = 200, description = "Platform overview", body = ApiResponse<Overview>),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Overview>>> {
    ensure_admin(&user)?;
    let data = stats_service::overview(&state.pool).await?;
    Ok(Json(ApiResponse::success("Overview", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/producers/pending",
    responses(
        (status = 200, description = "Producers awaiting approval", body = ApiResponse<PendingProducerList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_producers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PendingProducerList>>> {
    let resp = admin_service::list_pending_producers(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/producers/{id}/approval",
    params(("id" = Uuid, Path, description = "Producer profile ID")),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Approval updated; approval cascades to the producer's products", body = ApiResponse<ApprovalResult>),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn producer_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovalRequest>,
) -> AppResult<Json<ApiResponse<ApprovalResult>>> {
    let resp = admin_service::set_producer_approval(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/pending",
    responses(
        (status = 200, description = "Products awaiting review", body = ApiResponse<PendingProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PendingProductList>>> {
    let resp = admin_service::list_pending_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/approval",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = ApiResponse<ApprovalResult>),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn product_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovalRequest>,
) -> AppResult<Json<ApiResponse<ApprovalResult>>> {
    let resp = admin_service::set_product_approval(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("status" = Option<String>, Query, description = "verified | unverified"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "User management list", body = ApiResponse<UserSummaryList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserSummaryList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "Verified flag updated", body = ApiResponse<UserStatusResult>),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn user_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserStatusRequest>,
) -> AppResult<Json<ApiResponse<UserStatusResult>>> {
    let resp = admin_service::set_user_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    params(("period" = Option<i64>, Query, description = "Trailing window in days, default 30")),
    responses(
        (status = 200, description = "Trend and top-N reports", body = ApiResponse<AnalyticsReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<AnalyticsReport>>> {
    ensure_admin(&user)?;
    let period = query.period.unwrap_or(30).clamp(1, 365);
    let data = stats_service::analytics(&state.pool, period).await?;
    Ok(Json(ApiResponse::success("Analytics", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/health",
    responses(
        (status = 200, description = "Store reachable", body = SystemHealth),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Store unreachable", body = SystemHealth),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn system_health(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<SystemHealth>)> {
    ensure_admin(&user)?;
    match stats_service::system_health(&state.pool).await {
        Ok(health) => Ok((StatusCode::OK, Json(health))),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            let unhealthy = SystemHealth {
                status: "unhealthy".into(),
                database: "disconnected".into(),
                metrics: None,
                timestamp: chrono::Utc::now(),
            };
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(unhealthy)))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Customer or producer name search"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Order management list", body = ApiResponse<OrderSummaryList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderSummaryList>>> {
    let resp = admin_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderStatusResult>),
        (status = 400, description = "Invalid status value"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderStatusResult>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payments/stats",
    responses(
        (status = 200, description = "Payment aggregates and recent payments", body = ApiResponse<PaymentStatsReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn payment_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentStatsReport>>> {
    ensure_admin(&user)?;
    let data = stats_service::payment_stats(&state.pool).await?;
    Ok(Json(ApiResponse::success("Payment stats", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Platform settings", body = ApiResponse<PlatformSettings>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PlatformSettings>>> {
    let resp = admin_service::get_settings(&user)?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings acknowledged"),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    user: AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::update_settings(&user, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/realtime",
    responses(
        (status = 200, description = "Today's activity and pending backlog", body = ApiResponse<RealtimeStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn realtime_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RealtimeStats>>> {
    ensure_admin(&user)?;
    let data = stats_service::realtime_stats(&state.pool).await?;
    Ok(Json(ApiResponse::success("Realtime stats", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    responses(
        (status = 200, description = "Pending-attention badges, zero counts filtered", body = ApiResponse<Vec<Notification>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    ensure_admin(&user)?;
    let data = stats_service::notifications(&state.pool).await?;
    Ok(Json(ApiResponse::success("Notifications", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/recent-activity",
    params(("limit" = Option<i64>, Query, description = "Max entries, default 20")),
    responses(
        (status = 200, description = "Merged activity feed for the last 24 hours", body = ApiResponse<Vec<ActivityItem>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn recent_activity(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<ApiResponse<Vec<ActivityItem>>>> {
    ensure_admin(&user)?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let data = stats_service::recent_activity(&state.pool, limit).await?;
    Ok(Json(ApiResponse::success("Recent activity", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/admin/pending-stats",
    responses(
        (status = 200, description = "Unbounded pending counts", body = ApiResponse<PendingStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PendingStats>>> {
    ensure_admin(&user)?;
    let data = stats_service::pending_stats(&state.pool).await?;
    Ok(Json(ApiResponse::success("Pending stats", data, Some(Meta::empty()))))
}
