use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "ENGAGE_";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub analytics: AnalyticsSettings,
    pub catalog: CatalogSettings,
    pub pagination: PaginationSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    /// 点赞身份令牌的盐
    pub identity_salt: String,
    pub admin_token: String,
}

#[derive(Deserialize, Clone)]
pub struct AnalyticsSettings {
    /// Offset of the reference timezone for week boundaries.
    pub utc_offset_minutes: i32,
    /// 0 disables the in-process purge of stale weekly rows.
    pub reset_interval_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct CatalogSettings {
    pub seed_path: Option<String>,
}

#[derive(Deserialize, Clone, Copy)]
pub struct PaginationSettings {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();
        let env_json = serde_json::to_string(&env_map)
            .map_err(|e| ConfigError::Message(format!("Failed to encode environment: {}", e)))?;

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("database.url", "sqlite://data/engagement.db")?
            .set_default("database.max_connections", 8)?
            .set_default("security.identity_salt", "change_me_please")?
            .set_default("security.admin_token", "admin_secret_123")?
            .set_default("analytics.utc_offset_minutes", 0)?
            .set_default("analytics.reset_interval_secs", 3600)?
            .set_default("pagination.default_limit", 20)?
            .set_default("pagination.max_limit", 50)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(&env_json, config::FileFormat::Json))
            .build()?;

        s.try_deserialize()
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches(ENV_PREFIX)
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
