use std::sync::Arc;

use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::{error, info, warn};

use configs::{AppConfig, DatabaseConfig};
use service::message::{repo::SeaOrmMessageRepository, MessageRepository};

/// Config file first, then `DATABASE_URL`. The load error is returned so it can
/// be logged once tracing is up.
fn load_config() -> (AppConfig, Option<anyhow::Error>) {
    match AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig { database: DatabaseConfig::from_env(), ..AppConfig::default() }, Some(e)),
    }
}

async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    cfg.database.validate()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(service = "bootstrap", event = "migrated", "message schema is up to date");

    let repo = Arc::new(SeaOrmMessageRepository::new(db));
    let total = repo.count().await?;
    info!(service = "bootstrap", event = "ready", messages = total, "message store ready");
    Ok(())
}

fn main() -> std::process::ExitCode {
    // Load .env first so RUST_LOG and DATABASE_URL take effect
    dotenv().ok();
    let (cfg, load_err) = load_config();
    common::utils::logging::init_logging(cfg.logging.json);
    if let Some(e) = load_err {
        warn!(service = "bootstrap", event = "config_fallback", error = %e, "config.toml unusable, using DATABASE_URL");
    }

    std::panic::set_hook(Box::new(|info| {
        error!(service = "bootstrap", event = "panic", message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "bootstrap", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "bootstrap", event = "start", pid = std::process::id(), version = env!("CARGO_PKG_VERSION"), "bootstrap starting");
    match rt.block_on(run(&cfg)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "bootstrap", event = "run_failed", error = %e, "bootstrap failed");
            std::process::ExitCode::FAILURE
        }
    }
}
