use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Уровень по умолчанию, если не задан RUST_LOG
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";
const LOG_FILE: &str = "backend.log";

/// logs/ рядом с exe; если путь к exe не узнать, target/logs
fn log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from("target").join("logs"))
}

/// Два слоя: консоль с цветом и файл без ANSI-кодов
pub fn initialize() -> anyhow::Result<()> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow::anyhow!("Cannot create log directory {}: {}", dir.display(), e))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| anyhow::anyhow!("Cannot open log file {}: {}", path.display(), e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let level = filter.to_string();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .init();

    tracing::info!(filter = %level, file = %path.display(), "Logging initialized");
    Ok(())
}
