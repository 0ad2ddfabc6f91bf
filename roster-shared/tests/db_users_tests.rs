/// Integration tests for the user statements
///
/// These tests require a running PostgreSQL database and are ignored by default.
/// Run with: cargo test --test db_users_tests -- --ignored --test-threads=1
///
/// Database URL should be set via DATABASE_URL environment variable:
/// export DATABASE_URL="postgresql://postgres@localhost:5432/roster_test"

use roster_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use roster_shared::db::users::{find_user, save_as_new};
use roster_shared::db::{PgPool, RepositoryError};
use roster_shared::models::{EncodeError, User};
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        user_id    UUID PRIMARY KEY,
        owner_id   UUID,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS user_organization_join (
        user_id         UUID NOT NULL,
        organization_id UUID NOT NULL,
        role            TEXT NOT NULL,
        owner_id        UUID NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at      TIMESTAMPTZ
    )",
];

fn get_test_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://postgres@localhost:5432/roster_test".to_string())
}

async fn setup() -> PgPool {
    let pool = create_pool(DatabaseConfig {
        url: get_test_database_url(),
        max_connections: 2,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create schema");
    }
    pool
}

async fn insert_user_with_memberships(pool: &PgPool, roles: &[&str]) -> (Uuid, Uuid) {
    let user_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    sqlx::query("INSERT INTO users (user_id, owner_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .expect("Failed to insert user");

    for role in roles {
        sqlx::query(
            "INSERT INTO user_organization_join (user_id, organization_id, role, owner_id)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(Uuid::new_v4())
        .bind(*role)
        .bind(owner_id)
        .execute(pool)
        .await
        .expect("Failed to insert membership");
    }

    (user_id, owner_id)
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_user_with_memberships() {
    let pool = setup().await;
    let (user_id, owner_id) = insert_user_with_memberships(&pool, &["admin", "member"]).await;

    let user = find_user(&pool, user_id)
        .await
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(user.id, user_id);
    assert_eq!(user.metadata.owner_id(), Some(owner_id));
    assert_eq!(user.organizations.len(), 2);
    assert!(user.organizations.iter().all(|m| m.user_id == user_id));
    assert!(user.metadata.timestamps.unwrap().deleted_at.is_none());

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_user_without_memberships() {
    let pool = setup().await;
    let (user_id, _) = insert_user_with_memberships(&pool, &[]).await;

    let user = find_user(&pool, user_id)
        .await
        .expect("Query failed")
        .expect("User not found");
    assert!(user.organizations.is_empty());

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_missing_user() {
    let pool = setup().await;

    let user = find_user(&pool, Uuid::new_v4()).await.expect("Query failed");
    assert!(user.is_none());

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_as_new_inserts_copy() {
    let pool = setup().await;
    let (user_id, owner_id) = insert_user_with_memberships(&pool, &["admin"]).await;

    let mut user = find_user(&pool, user_id).await.unwrap().unwrap();
    let insert = save_as_new(&pool, &mut user).await.expect("Insert failed");

    assert_ne!(insert.user_id, user_id);
    assert_eq!(insert.owner_id, owner_id);

    let copy = find_user(&pool, insert.user_id).await.unwrap().unwrap();
    assert_eq!(copy.metadata.owner_id(), Some(owner_id));
    assert!(copy.organizations.is_empty());

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_save_as_new_without_owner() {
    let pool = setup().await;
    let mut user = User::new(Uuid::new_v4());

    let err = save_as_new(&pool, &mut user).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Encode(EncodeError::MissingOwner)
    ));

    close_pool(pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_user_when_url_asks_for_sql_date_style() {
    let pool = setup().await;
    let (user_id, owner_id) = insert_user_with_memberships(&pool, &["admin"]).await;

    let base = get_test_database_url();
    let separator = if base.contains('?') { '&' } else { '?' };
    let url = format!("{base}{separator}options=-c%20DateStyle%3DSQL%2CMDY");

    // Without the pinned settings the URL's style takes effect
    let plain = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect");
    let date_style: String = sqlx::query_scalar("SHOW DateStyle")
        .fetch_one(&plain)
        .await
        .unwrap();
    assert!(date_style.starts_with("SQL"), "{date_style}");
    plain.close().await;

    let pinned = create_pool(DatabaseConfig {
        url,
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    let user = find_user(&pinned, user_id)
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(user.metadata.owner_id(), Some(owner_id));
    assert_eq!(user.organizations.len(), 1);

    close_pool(pinned).await;
    close_pool(pool).await;
}
