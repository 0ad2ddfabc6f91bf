/// PostgreSQL access
///
/// The decoders in `codec` and `models` never touch a connection. This module is
/// the only place that does: it owns the pool, runs the fixed user statements,
/// and hands text columns over as [`crate::codec::CellRow`]s.
///
/// # Modules
///
/// - `pool`: connection pool with a health check
/// - `rows`: `PgRow` to `CellRow`
/// - `users`: fetch one user with its memberships, insert a user

pub mod pool;
pub mod rows;
pub mod users;

pub use sqlx::PgPool;

use crate::codec::DecodeError;
use crate::models::EncodeError;
use thiserror::Error;

/// Errors from the database adapter
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}
