use super::db::build_sqlite_url;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

const MIGRATIONS_DIR: &str = "migrations";

/// Каталог миграций ищется рядом с exe (так раскладывается поставка),
/// затем в рабочем каталоге и двух уровнях выше (запуск из crates/backend).
fn find_migrations_dir() -> Option<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let cwd_ancestors = std::env::current_dir()
        .ok()
        .into_iter()
        .flat_map(|cwd| cwd.ancestors().take(3).map(Path::to_path_buf).collect::<Vec<_>>());

    exe_dir
        .into_iter()
        .chain(cwd_ancestors)
        .map(|dir| dir.join(MIGRATIONS_DIR))
        .find(|dir| dir.is_dir())
}

/// Прогоняет SQL-миграции sqlx до открытия основного соединения sea-orm
pub async fn run_migrations(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = find_migrations_dir()
        .ok_or_else(|| anyhow::anyhow!("'{}' directory not found", MIGRATIONS_DIR))?;
    tracing::info!("Applying migrations from {}", dir.display());

    let migrator = Migrator::new(dir.as_path()).await?;
    let pool = SqlitePool::connect(&build_sqlite_url(db_path)).await?;
    let result = migrator.run(&pool).await;
    pool.close().await;
    result?;

    tracing::info!("Database schema is up to date ({} migrations)", migrator.iter().count());
    Ok(())
}
