mod config;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_completion::CompletionClient;
use platform_db::{DbPool, connect};
use platform_mail::Mailer;
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{HrService, SeaOrmEmployeeStore};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-onboarding", version, about = "HR onboarding service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Migrate(action) => {
            let pool = setup_pool(&config).await?;
            match action {
                MigrateCommand::Up => {
                    Migrator::up(&pool, None).await?;
                    info!("database migrations applied");
                }
                MigrateCommand::Down => {
                    Migrator::down(&pool, Some(1)).await?;
                    info!("most recent migration rolled back");
                }
            }
            Ok(())
        }
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database)
        .await
        .context("failed to connect to the employee store")
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;

    let completion =
        CompletionClient::new(config.completion.clone()).context("failed to build completion client")?;
    if !completion.has_key() {
        warn!("TOGETHER_API_KEY not set; welcome emails use templated text");
    }
    let mailer = Mailer::new(config.mail.clone());
    if !mailer.is_configured() {
        warn!("EMAIL_ADDRESS/EMAIL_PASSWORD not set; welcome emails will not be sent");
    }

    let hr = HrService::new(
        Arc::new(SeaOrmEmployeeStore::new(pool.clone())),
        Arc::new(completion),
        Arc::new(mailer),
    );
    let state = AppState {
        pool,
        hr,
        cors_allowed_origins: config.cors_allowed_origins,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() {
        if !allow_dirty {
            anyhow::bail!(
                "pending migrations detected; run `hr-onboarding migrate up` or pass --allow-dirty"
            );
        }
        warn!(pending = pending.len(), "starting with pending migrations");
    }
    Ok(())
}
