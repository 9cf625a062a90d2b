//! Operator CLI: apply migrations and create accounts without going through
//! the HTTP surface (there is no public sign-up).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tiledash_api::auth::password::hash_password;
use tiledash_core::roles::{validate_role, ROLE_ADMIN};
use tiledash_core::users::{normalize_email, MIN_PASSWORD_LENGTH};
use tiledash_db::models::user::CreateUser;
use tiledash_db::repositories::UserRepo;

#[derive(Parser, Debug)]
#[command(name = "tiledash-provision", version, about = "Tiledash provisioning tool")]
struct Cli {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Create a user account.
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = ROLE_ADMIN)]
        role: String,
        #[arg(long, env = "PROVISION_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let pool = tiledash_db::create_pool(&cli.database_url)
        .await
        .context("connecting to database")?;

    match cli.command {
        Command::Migrate => {
            tiledash_db::run_migrations(&pool)
                .await
                .context("running migrations")?;
            tracing::info!("Migrations applied");
        }
        Command::CreateUser {
            email,
            name,
            role,
            password,
        } => {
            validate_role(&role)?;
            if password.chars().count() < MIN_PASSWORD_LENGTH {
                bail!("password must be at least {MIN_PASSWORD_LENGTH} characters");
            }
            let email = normalize_email(&email);
            if UserRepo::find_by_email(&pool, &email).await?.is_some() {
                bail!("a user with email {email} already exists");
            }

            let password_hash =
                hash_password(&password).map_err(|e| anyhow::anyhow!("hashing password: {e}"))?;
            let user = UserRepo::create(
                &pool,
                &CreateUser {
                    email,
                    user_name: name.trim().to_string(),
                    password_hash,
                    role,
                },
            )
            .await
            .context("inserting user")?;

            tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "User created");
        }
    }

    Ok(())
}
