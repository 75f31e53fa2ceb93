use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Pool, Sqlite,
};
use std::{fs, path::Path, str::FromStr, time::Duration};
use tracing::info;

mod cache;
mod error;
mod models;
mod repo;

pub use cache::AnimeCatalog;
pub use error::StoreError;
pub use repo::comments::CascadeSummary;
pub use repo::likes::LikeDrift;

pub type StoreResult<T> = Result<T, StoreError>;

const DEFAULT_MAX_CONNECTIONS: u32 = 8;

#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
    pub(crate) week_zone: FixedOffset,
}

impl Db {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        Self::connect(db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn connect(db_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let in_memory = db_url.contains(":memory:");
        if db_url.starts_with("sqlite://") && !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://");
            let path = Path::new(path_str);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database url: {}", db_url))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));

        // 内存库只能有一个常驻连接，连接关闭即数据丢失
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .context("Failed to apply database migrations")?;
        info!("Database ready: {}", db_url);

        Ok(Self {
            pool,
            week_zone: Utc.fix(),
        })
    }

    pub fn with_week_zone(mut self, zone: FixedOffset) -> Self {
        self.week_zone = zone;
        self
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
