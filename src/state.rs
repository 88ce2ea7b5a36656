use crate::config::AppConfig;
use crate::storage::{Persistence, SqliteStore};

pub struct AppState {
    pub config: AppConfig,
    pub persistence: Persistence<SqliteStore>,
}
