use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub inquiries: InquiriesConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/helpdesk.db".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Каталог со сборкой фронтенда
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: "dist".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    pub allow_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_hours: 24,
            refresh_token_days: 90,
            allow_registration: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InquiriesConfig {
    pub max_reopens: i32,
    pub reopen_window_days: i64,
}

impl Default for InquiriesConfig {
    fn default() -> Self {
        Self {
            max_reopens: 3,
            reopen_window_days: 14,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Прочитанные уведомления старше этого срока удаляются при старте
    pub retention_days: i64,
    /// Интервал опроса счётчика непрочитанных клиентом
    pub poll_interval_secs: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            retention_days: 60,
            poll_interval_secs: 30,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/helpdesk.db"

[server]
port = 3000
static_dir = "dist"

[auth]
access_token_hours = 24
refresh_token_days = 90
allow_registration = true

[inquiries]
max_reopens = 3
reopen_window_days = 14

[notifications]
retention_days = 60
poll_interval_secs = 30
"#;

/// Переменная окружения с явным путём к config.toml
pub const CONFIG_ENV: &str = "HELPDESK_CONFIG";

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Где искать config.toml: `$HELPDESK_CONFIG`, затем рядом с exe
fn config_candidates() -> Vec<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(exe_dir().map(|dir| dir.join("config.toml")))
        .collect()
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Первый найденный config.toml; если файла нет, встроенные значения.
/// Битый файл это ошибка запуска, а не повод тихо взять умолчания.
pub fn load_config() -> anyhow::Result<Config> {
    match config_candidates().into_iter().find(|p| p.is_file()) {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            let contents = std::fs::read_to_string(&path)?;
            parse_config(&contents)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
        }
        None => {
            tracing::warn!("config.toml not found, using embedded defaults");
            parse_config(DEFAULT_CONFIG)
        }
    }
}

/// Загружает конфигурацию один раз за время жизни процесса
pub fn init() -> anyhow::Result<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Текущая конфигурация; до `init()` возвращает значения по умолчанию
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Путь к файлу БД; относительный путь считается от каталога exe
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let path = PathBuf::from(&config.database.path);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(exe_dir().map(|dir| dir.join(&path)).unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/helpdesk.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.inquiries.max_reopens, 3);
        assert_eq!(config.notifications.retention_days, 60);
        assert_eq!(config.notifications.poll_interval_secs, 30);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/helpdesk.db"

            [auth]
            allow_registration = false
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, "/var/lib/helpdesk.db");
        assert!(!config.auth.allow_registration);
        assert_eq!(config.auth.access_token_hours, 24);
        assert_eq!(config.inquiries.reopen_window_days, 14);
        assert_eq!(config.server.static_dir, "dist");
    }

    #[test]
    fn test_absolute_database_path_kept() {
        let mut config = Config::default();
        config.database.path = "/tmp/helpdesk.db".into();
        let path = get_database_path(&config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/helpdesk.db"));
    }
}
