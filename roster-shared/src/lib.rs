//! # Roster Shared Library
//!
//! Domain model for users, organizations, teams and payment plans, together with
//! the decoders that turn PostgreSQL composite and array text into that model and
//! the encoders that turn it back into JSON.
//!
//! ## Module Organization
//!
//! - `codec`: Cell values, composite/array literal grammars, timestamp text, errors
//! - `models`: Domain entities and their row decoders / JSON encoders
//! - `db`: PostgreSQL pool and the user repository
//! - `config`: Environment-driven configuration

pub mod codec;
pub mod config;
pub mod db;
pub mod models;

/// Current version of the roster shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
