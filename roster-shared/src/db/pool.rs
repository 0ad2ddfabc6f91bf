/// Database connection pool
///
/// Every column the decoders read arrives as text, including timestamps nested
/// inside composites and arrays. PostgreSQL renders those according to the
/// session's `DateStyle`, so each connection is opened with the settings in
/// [`SESSION_SETTINGS`] regardless of the server or role defaults. The health
/// check confirms the server accepted them.
///
/// # Example
///
/// ```no_run
/// use roster_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig {
///     url: "postgresql://postgres@localhost:5432/roster".to_string(),
///     ..Default::default()
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Startup parameters sent on every connection
///
/// `DateStyle` fixes the `YYYY-MM-DD HH:MM:SS` text form the timestamp parser
/// reads. `TimeZone` makes `timestamptz` text carry a `+00` offset. Values must
/// not contain spaces: they travel in the space-separated `options` parameter.
pub const SESSION_SETTINGS: [(&str, &str); 2] = [("DateStyle", "ISO,YMD"), ("TimeZone", "UTC")];

/// Pool sizing and connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool
    pub connect_timeout_seconds: u64,

    /// Idle time before a connection is closed; `None` keeps it forever
    pub idle_timeout_seconds: Option<u64>,

    pub max_lifetime_seconds: Option<u64>,

    /// Reported in `pg_stat_activity`
    pub application_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            application_name: "roster".to_string(),
        }
    }
}

/// Parses the URL and pins the session settings the decoders depend on
///
/// Settings already present in the URL's `options` parameter are kept, but
/// [`SESSION_SETTINGS`] come after them and win.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.url)?
        .application_name(&config.application_name)
        .options(SESSION_SETTINGS);
    Ok(options)
}

/// Creates the pool and runs a health check against it
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable, or the
/// session did not take the ISO date style.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let connect_options = connect_options(&config)?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        application_name = %config.application_name,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
    }
    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
    }

    let pool = pool_options.connect_with(connect_options).await?;
    health_check(&pool).await?;

    info!("Database connection pool ready");
    Ok(pool)
}

/// Checks the database answers and that the session renders ISO timestamps
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let date_style: String = sqlx::query_scalar("SHOW DateStyle").fetch_one(pool).await?;
    debug!(%date_style, "Database health check");

    if date_style.starts_with("ISO") {
        Ok(())
    } else {
        warn!(%date_style, "Session ignored the ISO date style");
        Err(sqlx::Error::Protocol(format!(
            "unexpected DateStyle {:?}; timestamps would not decode",
            date_style
        )))
    }
}

/// Closes every connection; call on shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
