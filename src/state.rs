use crate::auth::password::{Argon2Scheme, PasswordScheme};
use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared state of the detection API.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub passwords: Arc<dyn PasswordScheme>,
}

impl AppState {
    /// Connect and migrate the configured database.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url, config.max_connections).await?;
        db::migrate(&db).await?;

        let passwords = Arc::new(Argon2Scheme::default()) as Arc<dyn PasswordScheme>;
        Ok(Self::from_parts(db, Arc::new(config), passwords))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        passwords: Arc<dyn PasswordScheme>,
    ) -> Self {
        Self {
            db,
            config,
            passwords,
        }
    }

    /// Migrated in-memory database; nothing outlives the returned state.
    pub async fn ephemeral(passwords: Arc<dyn PasswordScheme>) -> anyhow::Result<Self> {
        let db = db::connect_in_memory().await?;
        db::migrate(&db).await?;

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
        });
        Ok(Self::from_parts(db, config, passwords))
    }
}
