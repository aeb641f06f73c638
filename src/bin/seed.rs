use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use harvest_hub_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@harvesthub.com", "admin123", "Ava", "Stone", "admin").await?;
    let customer_id = ensure_user(&pool, "customer@example.com", "customer123", "Casey", "Reed", "customer").await?;
    let producer_user = ensure_user(&pool, "farm@example.com", "producer123", "Rowan", "Hale", "producer").await?;
    let producer_id = ensure_producer(&pool, producer_user, "Green Valley Farm").await?;
    seed_categories_and_products(&pool, producer_id).await?;

    println!("Seed completed. Admin: {admin_id}, Customer: {customer_id}, Producer profile: {producer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, role, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(row.0)
}

async fn ensure_producer(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    business_name: &str,
) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM producer_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO producer_profiles (id, user_id, business_name, description, is_approved)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(business_name)
    .bind("Family-run farm growing seasonal produce")
    .fetch_one(pool)
    .await?;

    println!("Ensured producer profile {business_name}");
    Ok(row.0)
}

async fn seed_categories_and_products(
    pool: &sqlx::PgPool,
    producer_id: Uuid,
) -> anyhow::Result<()> {
    let categories = ["Vegetables", "Fruits", "Dairy", "Preserves"];
    for name in categories {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(name)
            .execute(pool)
            .await?;
    }

    let vegetables: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = 'Vegetables'")
        .fetch_one(pool)
        .await?;

    let products = vec![
        ("Heirloom Tomatoes", "Vine-ripened heirloom mix", 450, 40, true),
        ("Rainbow Carrots", "Bunched rainbow carrots", 300, 60, true),
        ("Butternut Squash", "Cured butternut squash", 250, 30, false),
    ];

    for (name, desc, price, stock, approved) in products {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM products WHERE producer_id = $1 AND name = $2")
                .bind(producer_id)
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO products (id, producer_id, category_id, name, description, price, stock_quantity, is_approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(producer_id)
        .bind(vegetables.0)
        .bind(name)
        .bind(desc)
        .bind(price as i64)
        .bind(stock)
        .bind(approved)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories and products");
    Ok(())
}
