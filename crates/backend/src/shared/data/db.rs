use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// `sqlite://` URL с созданием файла при отсутствии
pub fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    // Windows: C:/... -> /C:/...
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Открывает соединение sea-orm. Схема к этому моменту уже создана миграциями.
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut options = ConnectOptions::new(build_sqlite_url(db_path));
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    tracing::info!("Database connected: {}", db_path.display());

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/srv/helpdesk.db")),
            "sqlite:///srv/helpdesk.db?mode=rwc"
        );
    }

    #[test]
    fn test_windows_url_gets_leading_slash() {
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\helpdesk.db")),
            "sqlite:///C:/data/helpdesk.db?mode=rwc"
        );
    }
}
