use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub database_url: String,
    pub storage_namespace: String,
    /// Any non-empty email/password pair logs in as a player when no
    /// predefined account matches.
    pub allow_fallback_login: bool,
    /// Logging out also deletes the user's stored availability.
    pub clear_availability_on_logout: bool,
    pub login_delay: Duration,
    pub save_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: PathBuf::from("build"),
            database_url: "planner.db".to_string(),
            storage_namespace: "velora".to_string(),
            allow_fallback_login: true,
            clear_availability_on_logout: false,
            login_delay: Duration::from_millis(1000),
            save_delay: Duration::from_millis(800),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            storage_namespace: env::var("STORAGE_NAMESPACE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.storage_namespace),
            allow_fallback_login: env_flag("ALLOW_FALLBACK_LOGIN")
                .unwrap_or(defaults.allow_fallback_login),
            clear_availability_on_logout: env_flag("CLEAR_AVAILABILITY_ON_LOGOUT")
                .unwrap_or(defaults.clear_availability_on_logout),
            login_delay: env_millis("LOGIN_DELAY_MS").unwrap_or(defaults.login_delay),
            save_delay: env_millis("SAVE_DELAY_MS").unwrap_or(defaults.save_delay),
        }
    }

    /// Same as the defaults but without artificial latency and with an
    /// in-memory database.
    pub fn for_tests() -> Self {
        Self {
            database_url: ":memory:".to_string(),
            login_delay: Duration::ZERO,
            save_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
