use harvest_hub_api::{
    config::TransitionPolicy,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::admin::{ApprovalRequest, UpdateOrderStatusRequest},
    entity::{
        orders::ActiveModel as OrderActive, producer_profiles::ActiveModel as ProfileActive,
        products::ActiveModel as ProductActive, users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    routes::params::{OrderListQuery, Pagination, UserListQuery},
    realtime::broadcaster::{AdminBroadcaster, AdminEvent},
    services::{admin_service, stats_service},
    state::{AppState, ApprovalPolicy},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

// Each test truncates the shared database, so they must not interleave.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

// Integration flow: pending producer with pending products -> admin approves,
// the approval cascades and exactly one activity event goes out.
#[tokio::test]
async fn producer_approval_cascades_and_broadcasts_once() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let admin = admin_auth(&state).await?;
    let producer = create_producer(&state, "farm1@example.com", "North Field Farm").await?;
    let mut product_ids = Vec::new();
    for name in ["Kale", "Leeks", "Beets"] {
        product_ids.push(create_product(&state, producer, name, false).await?);
    }

    let mut rx = state.broadcaster.subscribe();

    let resp = admin_service::set_producer_approval(
        &state,
        &admin,
        producer,
        ApprovalRequest {
            is_approved: true,
            reason: None,
        },
    )
    .await?;
    assert_eq!(resp.message, "Producer approved successfully");
    assert!(resp.data.unwrap().is_approved);

    for id in &product_ids {
        let product = harvest_hub_api::entity::products::Entity::find_by_id(*id)
            .one(&state.orm)
            .await?
            .expect("product");
        assert!(product.is_approved, "cascade should approve {}", product.name);
    }

    let event = rx.recv().await.expect("activity event");
    match event {
        AdminEvent::ActivityUpdate(data) => {
            assert_eq!(data["type"], "producer_approval");
        }
        other => panic!("unexpected event {}", other.name()),
    }
    assert!(rx.try_recv().is_err(), "expected exactly one event");

    Ok(())
}

// Rejection with the default policy leaves previously approved products alone
// and stays silent on the broadcast channel.
#[tokio::test]
async fn producer_rejection_does_not_retract_by_default() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let admin = admin_auth(&state).await?;
    let producer = create_producer(&state, "farm2@example.com", "South Field Farm").await?;
    let product_id = create_product(&state, producer, "Honey", true).await?;

    let mut rx = state.broadcaster.subscribe();

    let resp = admin_service::set_producer_approval(
        &state,
        &admin,
        producer,
        ApprovalRequest {
            is_approved: false,
            reason: Some("Incomplete paperwork".into()),
        },
    )
    .await?;
    assert_eq!(resp.message, "Producer rejected successfully");

    let product = harvest_hub_api::entity::products::Entity::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert!(product.is_approved, "rejection must not retract products");
    assert!(rx.try_recv().is_err(), "rejections do not broadcast");

    Ok(())
}

#[tokio::test]
async fn product_approval_emits_one_event_per_call() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let admin = admin_auth(&state).await?;
    let producer = create_producer(&state, "farm3@example.com", "East Field Farm").await?;
    let product_id = create_product(&state, producer, "Cider", false).await?;

    let mut rx = state.broadcaster.subscribe();

    for _ in 0..2 {
        let resp = admin_service::set_product_approval(
            &state,
            &admin,
            product_id,
            ApprovalRequest {
                is_approved: true,
                reason: None,
            },
        )
        .await?;
        assert_eq!(resp.message, "Product approved successfully");
    }

    // Idempotent on state, but each call still announces.
    for _ in 0..2 {
        let event = rx.recv().await.expect("activity event");
        assert_eq!(event.name(), "activityUpdate");
    }
    assert!(rx.try_recv().is_err());

    Ok(())
}

#[tokio::test]
async fn pending_stats_match_direct_counts() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let producer = create_producer(&state, "farm4@example.com", "West Field Farm").await?;
    create_product(&state, producer, "Eggs", false).await?;
    create_product(&state, producer, "Milk", false).await?;
    let customer = create_user(&state, "buyer@example.com", "customer").await?;
    create_order(&state, customer, producer, "pending").await?;
    create_order(&state, customer, producer, "delivered").await?;

    let stats = stats_service::pending_stats(&state.pool).await?;
    assert_eq!(stats.pending_producers, 1);
    assert_eq!(stats.pending_products, 2);
    assert_eq!(stats.pending_orders, 1);

    Ok(())
}

#[tokio::test]
async fn order_status_updates_follow_the_allow_list() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let admin = admin_auth(&state).await?;
    let producer = create_producer(&state, "farm5@example.com", "Hill Farm").await?;
    let customer = create_user(&state, "buyer2@example.com", "customer").await?;
    let order_id = create_order(&state, customer, producer, "pending").await?;

    // Permissive policy: every listed value is reachable from any prior one.
    for status in ["processing", "shipped", "delivered", "pending", "cancelled"] {
        let resp = admin_service::update_order_status(
            &state,
            &admin,
            order_id,
            UpdateOrderStatusRequest {
                status: status.into(),
            },
        )
        .await?;
        assert_eq!(resp.data.unwrap().status, status);
    }

    let err = admin_service::update_order_status(
        &state,
        &admin,
        order_id,
        UpdateOrderStatusRequest {
            status: "paid".into(),
        },
    )
    .await
    .expect_err("unknown status must be rejected");
    assert!(matches!(
        err,
        harvest_hub_api::error::AppError::BadRequest(_)
    ));

    let err = admin_service::update_order_status(
        &state,
        &admin,
        Uuid::new_v4(),
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await
    .expect_err("missing order must 404");
    assert!(matches!(err, harvest_hub_api::error::AppError::NotFound));

    Ok(())
}

// meta.total must report the full matching row count, not the page length.
#[tokio::test]
async fn list_totals_span_all_pages() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let admin = admin_auth(&state).await?;
    for i in 0..24 {
        create_user(&state, &format!("member{i}@example.com"), "customer").await?;
    }

    // 25 users total including the admin.
    let page1 = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            role: None,
            status: None,
        },
    )
    .await?;
    let meta = page1.meta.expect("meta");
    assert_eq!(meta.total, Some(25));
    assert_eq!(page1.data.unwrap().items.len(), 20);

    let page2 = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            pagination: Pagination {
                page: Some(2),
                per_page: Some(20),
            },
            role: None,
            status: None,
        },
    )
    .await?;
    assert_eq!(page2.meta.expect("meta").total, Some(25));
    assert_eq!(page2.data.unwrap().items.len(), 5);

    // Filters apply to the total too.
    let customers = admin_service::list_users(
        &state,
        &admin,
        UserListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            role: Some("customer".into()),
            status: None,
        },
    )
    .await?;
    assert_eq!(customers.meta.expect("meta").total, Some(24));

    let producer = create_producer(&state, "farm6@example.com", "River Farm").await?;
    let customer = create_user(&state, "buyer4@example.com", "customer").await?;
    for _ in 0..3 {
        create_order(&state, customer, producer, "pending").await?;
    }

    let orders = admin_service::list_orders(
        &state,
        &admin,
        OrderListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(2),
            },
            status: None,
            search: None,
        },
    )
    .await?;
    let meta = orders.meta.expect("meta");
    assert_eq!(meta.total, Some(3));
    assert_eq!(orders.data.unwrap().items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn notifications_are_empty_when_nothing_is_pending() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let items = stats_service::notifications(&state.pool).await?;
    assert!(items.is_empty());

    Ok(())
}

#[tokio::test]
async fn non_admin_callers_are_rejected() -> anyhow::Result<()> {
    let Some((state, _guard)) = setup_state().await? else {
        return Ok(());
    };

    let customer_id = create_user(&state, "buyer3@example.com", "customer").await?;
    let customer = AuthUser {
        user_id: customer_id,
        role: "customer".into(),
    };

    let err = admin_service::list_pending_producers(&state, &customer)
        .await
        .expect_err("customer must not list pending producers");
    assert!(matches!(err, harvest_hub_api::error::AppError::Forbidden));

    Ok(())
}

// Returns None when no database is configured, so tests skip instead of fail.
// The returned guard keeps other tests off the database until drop.
async fn setup_state() -> anyhow::Result<Option<(AppState, MutexGuard<'static, ()>)>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let guard = DB_LOCK.lock().await;
    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE payments, order_items, orders, products, producer_profiles, audit_logs, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let state = AppState {
        pool,
        orm,
        broadcaster: AdminBroadcaster::default(),
        policy: ApprovalPolicy {
            retract_products_on_rejection: false,
            order_transitions: TransitionPolicy::Permissive,
        },
    };
    Ok(Some((state, guard)))
}

async fn admin_auth(state: &AppState) -> anyhow::Result<AuthUser> {
    let id = create_user(state, "admin@example.com", "admin").await?;
    Ok(AuthUser {
        user_id: id,
        role: "admin".into(),
    })
}

async fn create_user(state: &AppState, email: &str, role: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        role: Set(role.into()),
        is_verified: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_producer(
    state: &AppState,
    email: &str,
    business_name: &str,
) -> anyhow::Result<Uuid> {
    let user_id = create_user(state, email, "producer").await?;
    let profile = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        business_name: Set(business_name.into()),
        description: Set(None),
        is_approved: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(profile.id)
}

async fn create_product(
    state: &AppState,
    producer_id: Uuid,
    name: &str,
    approved: bool,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        producer_id: Set(producer_id),
        category_id: Set(None),
        name: Set(name.into()),
        description: Set(None),
        price: Set(500),
        stock_quantity: Set(10),
        is_available: Set(true),
        is_approved: Set(approved),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}

async fn create_order(
    state: &AppState,
    customer_id: Uuid,
    producer_id: Uuid,
    status: &str,
) -> anyhow::Result<Uuid> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        producer_id: Set(producer_id),
        status: Set(status.into()),
        total_amount: Set(1500),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(order.id)
}
