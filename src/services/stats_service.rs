use chrono::{Duration, Utc};

use crate::{
    db::DbPool,
    dto::stats::{
        ActivityItem, AnalyticsReport, HealthMetrics, Notification, NotificationCounts,
        OrderTrend, Overview, OverviewCounts, PaymentStatsReport, PaymentTotals, PendingStats,
        RealtimeCounts, RealtimeStats, RecentActivitySnapshot, RecentOrder, RecentPayment,
        RecentUser, RevenueStats, SystemHealth, TopProducer, TopProduct,
    },
    error::AppResult,
    realtime::notifier::build_notifications,
};

async fn count(pool: &DbPool, sql: &str) -> AppResult<i64> {
    let (n,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await?;
    Ok(n)
}

/// Platform-wide dashboard snapshot. Every number is derived live from the
/// store; nothing is cached or denormalized.
pub async fn overview(pool: &DbPool) -> AppResult<Overview> {
    let counts = OverviewCounts {
        users: count(pool, "SELECT COUNT(*) FROM users").await?,
        producers: count(
            pool,
            "SELECT COUNT(*) FROM producer_profiles WHERE is_approved = TRUE",
        )
        .await?,
        products: count(
            pool,
            "SELECT COUNT(*) FROM products WHERE is_available = TRUE AND is_approved = TRUE",
        )
        .await?,
        orders: count(pool, "SELECT COUNT(*) FROM orders").await?,
        payments: count(pool, "SELECT COUNT(*) FROM payments WHERE status = 'completed'").await?,
    };

    let revenue = sqlx::query_as::<_, RevenueStats>(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)::BIGINT AS total_revenue,
               COALESCE(AVG(total_amount), 0)::DOUBLE PRECISION AS avg_order_value,
               COUNT(*) AS total_orders
        FROM orders
        WHERE status = 'completed'
        "#,
    )
    .fetch_one(pool)
    .await?;

    let orders = sqlx::query_as::<_, RecentOrder>(
        r#"
        SELECT o.id, o.status, o.total_amount, o.created_at,
               u.first_name, u.last_name, pp.business_name
        FROM orders o
        JOIN users u ON o.customer_id = u.id
        JOIN producer_profiles pp ON o.producer_id = pp.id
        ORDER BY o.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    let users = sqlx::query_as::<_, RecentUser>(
        r#"
        SELECT id, first_name, last_name, email, role, created_at
        FROM users
        ORDER BY created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(Overview {
        counts,
        revenue,
        recent_activity: RecentActivitySnapshot { orders, users },
    })
}

/// Unbounded pending counts for the dashboard badges.
pub async fn pending_stats(pool: &DbPool) -> AppResult<PendingStats> {
    let pending_producers = count(
        pool,
        "SELECT COUNT(*) FROM producer_profiles WHERE is_approved = FALSE",
    )
    .await?;
    let pending_products =
        count(pool, "SELECT COUNT(*) FROM products WHERE is_approved = FALSE").await?;
    let pending_orders =
        count(pool, "SELECT COUNT(*) FROM orders WHERE status = 'pending'").await?;

    Ok(PendingStats {
        pending_producers,
        pending_products,
        pending_orders,
        timestamp: Utc::now(),
    })
}

/// Counts feeding the notification list. Unlike [`pending_stats`], the order
/// count is windowed to the trailing hour.
pub async fn notification_counts(pool: &DbPool) -> AppResult<NotificationCounts> {
    let counts = sqlx::query_as::<_, NotificationCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM producer_profiles WHERE is_approved = FALSE) AS pending_producers,
            (SELECT COUNT(*) FROM products WHERE is_approved = FALSE) AS pending_products,
            (SELECT COUNT(*) FROM orders
             WHERE status = 'pending' AND created_at >= NOW() - INTERVAL '1 hour') AS new_orders_last_hour
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

pub async fn notifications(pool: &DbPool) -> AppResult<Vec<Notification>> {
    let counts = notification_counts(pool).await?;
    Ok(build_notifications(&counts, Utc::now()))
}

/// Today's activity plus pending backlog, as five independent scalar
/// subqueries rather than one conditional aggregate over a cross join.
pub async fn realtime_stats(pool: &DbPool) -> AppResult<RealtimeStats> {
    let counts = sqlx::query_as::<_, RealtimeCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users
             WHERE CAST(created_at AS DATE) = CURRENT_DATE) AS new_users_today,
            (SELECT COUNT(*) FROM orders
             WHERE CAST(created_at AS DATE) = CURRENT_DATE) AS orders_today,
            (SELECT COALESCE(SUM(total_amount), 0) FROM orders
             WHERE CAST(created_at AS DATE) = CURRENT_DATE)::BIGINT AS revenue_today,
            (SELECT COUNT(*) FROM producer_profiles WHERE is_approved = FALSE) AS pending_producers,
            (SELECT COUNT(*) FROM products WHERE is_approved = FALSE) AS pending_products
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(RealtimeStats {
        counts,
        timestamp: Utc::now(),
    })
}

/// Trend and top-N reports over the trailing `period_days` window, inclusive
/// at second granularity.
pub async fn analytics(pool: &DbPool, period_days: i64) -> AppResult<AnalyticsReport> {
    let end = Utc::now();
    let start = end - Duration::days(period_days);

    let order_trends = sqlx::query_as::<_, OrderTrend>(
        r#"
        SELECT CAST(created_at AS DATE) AS date,
               COUNT(*) AS order_count,
               COALESCE(SUM(total_amount), 0)::BIGINT AS daily_revenue
        FROM orders
        WHERE created_at >= $1 AND created_at <= $2
        GROUP BY CAST(created_at AS DATE)
        ORDER BY date ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let top_products = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT p.id, p.name, c.name AS category,
               COUNT(oi.id) AS order_count,
               COALESCE(SUM(oi.quantity), 0)::BIGINT AS total_quantity
        FROM products p
        JOIN order_items oi ON p.id = oi.product_id
        JOIN orders o ON oi.order_id = o.id
        LEFT JOIN categories c ON p.category_id = c.id
        WHERE o.created_at >= $1 AND o.created_at <= $2
        GROUP BY p.id, p.name, c.name
        ORDER BY order_count DESC
        LIMIT 10
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let top_producers = sqlx::query_as::<_, TopProducer>(
        r#"
        SELECT pp.id, pp.business_name,
               COUNT(o.id) AS order_count,
               COALESCE(SUM(o.total_amount), 0)::BIGINT AS total_revenue
        FROM producer_profiles pp
        JOIN orders o ON pp.id = o.producer_id
        WHERE o.created_at >= $1 AND o.created_at <= $2
        GROUP BY pp.id, pp.business_name
        ORDER BY total_revenue DESC
        LIMIT 10
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(AnalyticsReport {
        period: period_days,
        order_trends,
        top_products,
        top_producers,
    })
}

pub async fn payment_stats(pool: &DbPool) -> AppResult<PaymentStatsReport> {
    let stats = sqlx::query_as::<_, PaymentTotals>(
        r#"
        SELECT COUNT(*) AS total_payments,
               COALESCE(SUM(CASE WHEN status = 'completed' THEN amount ELSE 0 END), 0)::BIGINT AS total_revenue,
               COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::BIGINT AS pending_amount,
               COALESCE(SUM(CASE WHEN status = 'failed' THEN amount ELSE 0 END), 0)::BIGINT AS failed_amount,
               COALESCE(AVG(CASE WHEN status = 'completed' THEN amount END), 0)::DOUBLE PRECISION AS avg_payment
        FROM payments
        "#,
    )
    .fetch_one(pool)
    .await?;

    let recent = sqlx::query_as::<_, RecentPayment>(
        r#"
        SELECT pay.id, pay.order_id, pay.amount, pay.status, pay.created_at,
               u.first_name, u.last_name
        FROM payments pay
        JOIN orders o ON pay.order_id = o.id
        JOIN users u ON o.customer_id = u.id
        ORDER BY pay.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(PaymentStatsReport { stats, recent })
}

/// Merged activity feed over the trailing 24 hours: registrations, approvals,
/// orders placed, and order status changes, newest first.
pub async fn recent_activity(pool: &DbPool, limit: i64) -> AppResult<Vec<ActivityItem>> {
    let mut activities: Vec<ActivityItem> = Vec::new();

    let new_users = sqlx::query_as::<_, ActivityItem>(
        r#"
        SELECT 'user_registration' AS type,
               'New user registered: ' || first_name || ' ' || last_name AS description,
               created_at,
               id AS reference_id
        FROM users
        WHERE created_at >= NOW() - INTERVAL '24 hours'
        ORDER BY created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    let producer_approvals = sqlx::query_as::<_, ActivityItem>(
        r#"
        SELECT 'producer_approval' AS type,
               'Producer approved: ' || business_name AS description,
               updated_at AS created_at,
               id AS reference_id
        FROM producer_profiles
        WHERE is_approved = TRUE AND updated_at >= NOW() - INTERVAL '24 hours'
        ORDER BY updated_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    let product_approvals = sqlx::query_as::<_, ActivityItem>(
        r#"
        SELECT 'product_approval' AS type,
               'Product approved: ' || name AS description,
               updated_at AS created_at,
               id AS reference_id
        FROM products
        WHERE is_approved = TRUE AND updated_at >= NOW() - INTERVAL '24 hours'
        ORDER BY updated_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    let new_orders = sqlx::query_as::<_, ActivityItem>(
        r#"
        SELECT 'order_placed' AS type,
               'New order ' || o.id::TEXT || ' placed by ' || u.first_name || ' ' || u.last_name AS description,
               o.created_at,
               o.id AS reference_id
        FROM orders o
        JOIN users u ON o.customer_id = u.id
        WHERE o.created_at >= NOW() - INTERVAL '24 hours'
        ORDER BY o.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    let order_updates = sqlx::query_as::<_, ActivityItem>(
        r#"
        SELECT 'order_status_change' AS type,
               'Order ' || id::TEXT || ' marked as ' || status AS description,
               updated_at AS created_at,
               id AS reference_id
        FROM orders
        WHERE updated_at >= NOW() - INTERVAL '24 hours' AND updated_at <> created_at
        ORDER BY updated_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    activities.extend(new_users);
    activities.extend(producer_approvals);
    activities.extend(product_approvals);
    activities.extend(new_orders);
    activities.extend(order_updates);

    activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    activities.truncate(limit.max(0) as usize);

    Ok(activities)
}

/// Store ping plus coarse row counts.
pub async fn system_health(pool: &DbPool) -> AppResult<SystemHealth> {
    sqlx::query("SELECT 1").execute(pool).await?;

    let metrics = HealthMetrics {
        users: count(pool, "SELECT COUNT(*) FROM users").await?,
        orders: count(pool, "SELECT COUNT(*) FROM orders").await?,
        products: count(pool, "SELECT COUNT(*) FROM products").await?,
    };

    Ok(SystemHealth {
        status: "healthy".into(),
        database: "connected".into(),
        metrics: Some(metrics),
        timestamp: Utc::now(),
    })
}
