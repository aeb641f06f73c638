use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    config::TransitionPolicy,
    dto::admin::{
        ApprovalRequest, ApprovalResult, OrderStatusResult, OrderSummary, OrderSummaryList,
        PendingProducer, PendingProducerList, PendingProduct, PendingProductList,
        PlatformSettings, UpdateOrderStatusRequest, UpdateSettingsRequest, UserStatusRequest,
        UserStatusResult, UserSummary, UserSummaryList,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Entity as Orders},
        producer_profiles::{ActiveModel as ProfileActive, Entity as ProducerProfiles},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    realtime::broadcaster::AdminEvent,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, UserListQuery},
    state::AppState,
};

pub const ORDER_STATUSES: [&str; 5] =
    ["pending", "processing", "shipped", "delivered", "cancelled"];

pub fn validate_order_status(status: &str) -> Result<(), AppError> {
    if ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid order status".into()))
    }
}

/// Whether `from -> to` is an accepted edge under the configured policy.
/// `Permissive` reproduces the historical behavior where any allow-listed
/// value can follow any other, including delivered -> pending.
pub fn transition_allowed(policy: TransitionPolicy, from: &str, to: &str) -> bool {
    match policy {
        TransitionPolicy::Permissive => true,
        TransitionPolicy::Linear => {
            matches!(
                (from, to),
                ("pending", "processing") | ("processing", "shipped") | ("shipped", "delivered")
            ) || (to == "cancelled" && !matches!(from, "delivered" | "cancelled"))
        }
    }
}

/// Approve or reject a producer profile. Approval cascades to every product
/// owned by the producer, unconditionally, inside the same transaction as the
/// profile update. Rejection cascades only when the retract policy is on.
pub async fn set_producer_approval(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ApprovalRequest,
) -> AppResult<ApiResponse<ApprovalResult>> {
    ensure_admin(user)?;
    let approved = payload.is_approved;

    let txn = state.orm.begin().await?;

    let profile = ProducerProfiles::find_by_id(id).one(&txn).await?;
    let profile = match profile {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    let business_name = profile.business_name.clone();

    let mut active: ProfileActive = profile.into();
    active.is_approved = Set(approved);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    if approved {
        Products::update_many()
            .col_expr(ProdCol::IsApproved, Expr::value(true))
            .col_expr(ProdCol::UpdatedAt, Expr::value(Utc::now()))
            .filter(ProdCol::ProducerId.eq(id))
            .exec(&txn)
            .await?;
    } else if state.policy.retract_products_on_rejection {
        Products::update_many()
            .col_expr(ProdCol::IsApproved, Expr::value(false))
            .col_expr(ProdCol::UpdatedAt, Expr::value(Utc::now()))
            .filter(ProdCol::ProducerId.eq(id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    // Activity fanout only on the approved branch; rejections stay quiet.
    if approved {
        state.broadcaster.publish(AdminEvent::ActivityUpdate(serde_json::json!({
            "type": "producer_approval",
            "description": format!("Producer approved: {business_name}"),
            "created_at": Utc::now(),
            "reference_id": id,
        })));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProducerApproval,
        Some(serde_json::json!({
            "producer_id": id,
            "is_approved": approved,
            "reason": payload.reason,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if approved {
        "Producer approved successfully"
    } else {
        "Producer rejected successfully"
    };
    Ok(ApiResponse::success(
        message,
        ApprovalResult {
            is_approved: approved,
        },
        Some(Meta::empty()),
    ))
}

/// Approve or reject a single product. Settable at any time, including for
/// products whose producer is still pending; no cascade in either direction.
pub async fn set_product_approval(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ApprovalRequest,
) -> AppResult<ApiResponse<ApprovalResult>> {
    ensure_admin(user)?;
    let approved = payload.is_approved;

    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    let product_name = product.name.clone();

    let mut active: ProductActive = product.into();
    active.is_approved = Set(approved);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    if approved {
        state.broadcaster.publish(AdminEvent::ActivityUpdate(serde_json::json!({
            "type": "product_approval",
            "description": format!("Product approved: {product_name}"),
            "created_at": Utc::now(),
            "reference_id": id,
        })));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductApproval,
        Some(serde_json::json!({
            "product_id": id,
            "is_approved": approved,
            "reason": payload.reason,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if approved {
        "Product approved successfully"
    } else {
        "Product rejected successfully"
    };
    Ok(ApiResponse::success(
        message,
        ApprovalResult {
            is_approved: approved,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_pending_producers(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PendingProducerList>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, PendingProducer>(
        r#"
        SELECT pp.id, pp.user_id, pp.business_name, pp.description,
               u.first_name, u.last_name, u.email, u.created_at
        FROM producer_profiles pp
        JOIN users u ON pp.user_id = u.id
        WHERE pp.is_approved = FALSE
        ORDER BY u.created_at ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Pending producers",
        PendingProducerList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_pending_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PendingProductList>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, PendingProduct>(
        r#"
        SELECT p.id, p.producer_id, p.name, p.description, p.price, p.stock_quantity,
               c.name AS category_name, pp.business_name AS producer_name,
               u.first_name, u.last_name, p.created_at
        FROM products p
        LEFT JOIN categories c ON p.category_id = c.id
        JOIN producer_profiles pp ON p.producer_id = pp.id
        JOIN users u ON pp.user_id = u.id
        WHERE p.is_approved = FALSE
        ORDER BY p.created_at ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Pending products",
        PendingProductList { items },
        Some(Meta::empty()),
    ))
}

fn push_user_filters(qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, query: &UserListQuery) {
    if let Some(role) = query.role.as_ref().filter(|r| !r.is_empty()) {
        qb.push(" AND u.role = ").push_bind(role.clone());
    }
    match query.status.as_deref() {
        Some("verified") => {
            qb.push(" AND u.is_verified = TRUE");
        }
        Some("unverified") => {
            qb.push(" AND u.is_verified = FALSE");
        }
        _ => {}
    }
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserSummaryList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut count_qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "SELECT COUNT(*) FROM users u WHERE TRUE",
    );
    push_user_filters(&mut count_qb, &query);
    let (total,): (i64,) = count_qb.build_query_as().fetch_one(&state.pool).await?;

    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        r#"
        SELECT u.id, u.email, u.first_name, u.last_name, u.role, u.is_verified, u.created_at,
               pp.business_name, pp.is_approved AS producer_approved
        FROM users u
        LEFT JOIN producer_profiles pp ON u.id = pp.user_id
        WHERE TRUE
        "#,
    );
    push_user_filters(&mut qb, &query);
    qb.push(" ORDER BY u.created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let items: Vec<UserSummary> = qb.build_query_as().fetch_all(&state.pool).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Users",
        UserSummaryList { items },
        Some(meta),
    ))
}

pub async fn set_user_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UserStatusRequest,
) -> AppResult<ApiResponse<UserStatusResult>> {
    ensure_admin(user)?;

    let target = Users::find_by_id(id).one(&state.orm).await?;
    let target = match target {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let mut active: UserActive = target.into();
    active.is_verified = Set(payload.is_verified);
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::UserStatusUpdate,
        Some(serde_json::json!({ "target_id": id, "is_verified": payload.is_verified })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if payload.is_verified {
        "User verified successfully"
    } else {
        "User unverified successfully"
    };
    Ok(ApiResponse::success(
        message,
        UserStatusResult {
            is_verified: payload.is_verified,
        },
        Some(Meta::empty()),
    ))
}

fn push_order_filters(qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, query: &OrderListQuery) {
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        qb.push(" AND o.status = ").push_bind(status.clone());
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (u.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR pp.business_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderSummaryList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    // Count over the order rows only; the item joins below fan out and are
    // collapsed again by the GROUP BY.
    let mut count_qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        r#"
        SELECT COUNT(*)
        FROM orders o
        JOIN users u ON o.customer_id = u.id
        JOIN producer_profiles pp ON o.producer_id = pp.id
        WHERE TRUE
        "#,
    );
    push_order_filters(&mut count_qb, &query);
    let (total,): (i64,) = count_qb.build_query_as().fetch_one(&state.pool).await?;

    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        r#"
        SELECT o.id, o.customer_id, o.producer_id, o.status, o.total_amount,
               o.created_at, o.updated_at,
               u.first_name, u.last_name, u.email,
               pp.business_name AS producer_name,
               COUNT(oi.id) AS item_count,
               COALESCE(STRING_AGG(p.name, ', '), '') AS product_names
        FROM orders o
        JOIN users u ON o.customer_id = u.id
        JOIN producer_profiles pp ON o.producer_id = pp.id
        LEFT JOIN order_items oi ON o.id = oi.order_id
        LEFT JOIN products p ON oi.product_id = p.id
        WHERE TRUE
        "#,
    );
    push_order_filters(&mut qb, &query);
    qb.push(
        " GROUP BY o.id, u.first_name, u.last_name, u.email, pp.business_name \
          ORDER BY o.created_at DESC LIMIT ",
    )
    .push_bind(limit)
    .push(" OFFSET ")
    .push_bind(offset);

    let items: Vec<OrderSummary> = qb.build_query_as().fetch_all(&state.pool).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderSummaryList { items },
        Some(meta),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderStatusResult>> {
    ensure_admin(user)?;
    validate_order_status(&payload.status)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if !transition_allowed(state.policy.order_transitions, &existing.status, &payload.status) {
        return Err(AppError::BadRequest(format!(
            "Transition {} -> {} is not allowed",
            existing.status, payload.status
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.clone());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::OrderStatusUpdate,
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated successfully",
        OrderStatusResult {
            status: order.status,
        },
        Some(Meta::empty()),
    ))
}

pub fn get_settings(user: &AuthUser) -> AppResult<ApiResponse<PlatformSettings>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success(
        "Settings",
        PlatformSettings::default(),
        Some(Meta::empty()),
    ))
}

/// Settings are static for now; the payload is validated and acknowledged but
/// not persisted.
pub fn update_settings(
    user: &AuthUser,
    payload: UpdateSettingsRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    for (name, section) in [
        ("platform", &payload.platform),
        ("fees", &payload.fees),
        ("limits", &payload.limits),
        ("notifications", &payload.notifications),
    ] {
        if let Some(value) = section {
            if !value.is_object() {
                return Err(AppError::BadRequest(format!("{name} must be an object")));
            }
        }
    }
    Ok(ApiResponse::success(
        "Settings updated successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_rejects_unknown_statuses() {
        assert!(validate_order_status("pending").is_ok());
        assert!(validate_order_status("cancelled").is_ok());
        assert!(validate_order_status("paid").is_err());
        assert!(validate_order_status("").is_err());
        assert!(validate_order_status("DELIVERED").is_err());
    }

    #[test]
    fn permissive_policy_accepts_any_listed_pair() {
        for from in ORDER_STATUSES {
            for to in ORDER_STATUSES {
                assert!(transition_allowed(TransitionPolicy::Permissive, from, to));
            }
        }
        // The documented quirk: terminal states can be reopened.
        assert!(transition_allowed(
            TransitionPolicy::Permissive,
            "delivered",
            "pending"
        ));
    }

    #[test]
    fn linear_policy_follows_the_happy_path() {
        let p = TransitionPolicy::Linear;
        assert!(transition_allowed(p, "pending", "processing"));
        assert!(transition_allowed(p, "processing", "shipped"));
        assert!(transition_allowed(p, "shipped", "delivered"));
        assert!(transition_allowed(p, "pending", "cancelled"));
        assert!(transition_allowed(p, "shipped", "cancelled"));
        assert!(!transition_allowed(p, "delivered", "pending"));
        assert!(!transition_allowed(p, "delivered", "cancelled"));
        assert!(!transition_allowed(p, "cancelled", "processing"));
        assert!(!transition_allowed(p, "pending", "shipped"));
    }
}
