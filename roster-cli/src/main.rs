//! # Roster CLI
//!
//! Reads a user with its organization memberships from PostgreSQL and prints
//! it as JSON, or stores a copy of it under a fresh identifier.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://postgres@localhost:5432/roster roster show
//! roster clone-user --user-id 00000000-0000-0000-0000-000000000000
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_shared::config::Config;
use roster_shared::db::pool::{close_pool, create_pool};
use roster_shared::db::PgPool;
use roster_shared::db::users::{find_user, save_as_new};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Inspect users stored in PostgreSQL")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a user as JSON
    Show {
        /// User to fetch
        #[arg(long, default_value_t = Uuid::nil())]
        user_id: Uuid,
    },

    /// Insert a copy of a user under a fresh identifier
    CloneUser {
        /// User to copy
        #[arg(long, default_value_t = Uuid::nil())]
        user_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("roster v{} starting", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(config.database.clone())
        .await
        .context("error connect to db")?;

    let result = run(&pool, cli.command).await;
    close_pool(pool).await;
    result
}

async fn run(pool: &PgPool, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Show { user_id } => {
            let user = find_user(pool, user_id)
                .await
                .context("error get user")?
                .with_context(|| format!("user {} not found", user_id))?;

            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::CloneUser { user_id } => {
            let mut user = find_user(pool, user_id)
                .await
                .context("error get user")?
                .with_context(|| format!("user {} not found", user_id))?;

            let insert = save_as_new(pool, &mut user)
                .await
                .context("error insert user")?;

            println!("{}", serde_json::to_string_pretty(&insert)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_defaults_to_nil_user() {
        let cli = Cli::try_parse_from(["roster", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { user_id } if user_id.is_nil()));
    }

    #[test]
    fn test_clone_user_parses_id() {
        let cli = Cli::try_parse_from([
            "roster",
            "clone-user",
            "--user-id",
            "11111111-1111-1111-1111-111111111111",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::CloneUser { user_id } if user_id.to_string() == "11111111-1111-1111-1111-111111111111"
        ));
    }
}
