use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// PIN given to the seeded bootstrap admin. No account is seeded
    /// when unset.
    pub bootstrap_admin_pin: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for stored images.
    pub root: String,
    pub max_upload_bytes: u64,
    /// MIME types accepted for uploads.
    pub accepted_media_types: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContestConfig {
    /// Uploads allowed per photographer per contest.
    pub max_entries_per_user: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub tick_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub contest: ContestConfig,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Development fallback; override in config or environment.
            .set_default("auth.jwt_secret", "darkroom-dev-secret")?
            .set_default("auth.token_ttl_days", 30)?
            .set_default("storage.root", "./data/images")?
            .set_default("storage.max_upload_bytes", 1024 * 1024)?
            .set_default("storage.accepted_media_types", vec!["image/jpeg"])?
            .set_default("contest.max_entries_per_user", 3)?
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.tick_interval_secs", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DARKROOM__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("DARKROOM").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
