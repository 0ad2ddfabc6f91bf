/// User statements
///
/// Two fixed statements: read one user with its organization memberships
/// aggregated into an array of `user_organization_join` composites, and insert
/// a user from [`UserInsert`] column values.
///
/// # Example
///
/// ```no_run
/// use roster_shared::db::users::{find_user, save_as_new};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(mut user) = find_user(&pool, Uuid::nil()).await? {
///     println!("{}", serde_json::to_string_pretty(&user)?);
///     let insert = save_as_new(&pool, &mut user).await?;
///     println!("Inserted copy as {}", insert.user_id);
/// }
/// # Ok(())
/// # }
/// ```

use super::rows::to_cell_row;
use super::RepositoryError;
use crate::models::user::{User, UserInsert};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

const FIND_USER: &str = r#"
SELECT
    u.user_id::text    AS user_id,
    u.owner_id::text   AS owner_id,
    (array_agg(uoj) FILTER (WHERE uoj.user_id IS NOT NULL))::text
                       AS organization_memberships,
    u.created_at::text AS created_at,
    u.updated_at::text AS updated_at,
    u.deleted_at::text AS deleted_at
FROM users u
LEFT JOIN user_organization_join uoj
    USING (user_id)
WHERE u.user_id = $1
GROUP BY u.user_id
"#;

const INSERT_USER: &str = r#"
INSERT INTO users (
    user_id,
    owner_id
) VALUES (
    $1,
    $2
)
"#;

/// Fetches one user with its organization memberships
///
/// # Returns
///
/// `None` if no user has that identifier
///
/// # Errors
///
/// Returns an error if the query fails or any column fails to decode
pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
    debug!(%user_id, "Fetching user");

    let Some(row) = sqlx::query(FIND_USER)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let cells = to_cell_row(&row)?;
    let user = User::from_row(&cells)?;

    debug!(
        %user_id,
        organizations = user.organizations.len(),
        "Decoded user"
    );
    Ok(Some(user))
}

/// Inserts a user row
pub async fn insert_user(pool: &PgPool, insert: &UserInsert) -> Result<(), RepositoryError> {
    sqlx::query(INSERT_USER)
        .bind(insert.user_id)
        .bind(insert.owner_id)
        .execute(pool)
        .await?;

    info!(
        user_id = %insert.user_id,
        owner_id = %insert.owner_id,
        "Inserted user"
    );
    Ok(())
}

/// Gives `user` a fresh identifier and inserts it
///
/// # Errors
///
/// Fails without touching the database if `user` has no owner.
pub async fn save_as_new(pool: &PgPool, user: &mut User) -> Result<UserInsert, RepositoryError> {
    let insert = user.prepare_insert()?;
    insert_user(pool, &insert).await?;
    Ok(insert)
}
