use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Shared secret the game-server plugin sends as `X-API-Key`.
    pub api_key: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Fallback top-up link when the `discord_link` setting is empty.
    pub default_referral_link: String,
    pub server_name: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://store.db?mode=rwc".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(5);
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let api_key = env::var("API_KEY")?;
        let admin_username = env::var("ADMIN_USERNAME")?;
        let admin_password = env::var("ADMIN_PASSWORD")?;
        let default_referral_link = env::var("DEFAULT_REFERRAL_LINK")
            .unwrap_or_else(|_| "https://discord.gg/".to_string());
        let server_name = env::var("SERVER_NAME").unwrap_or_else(|_| "The server".to_string());
        Ok(Self {
            port,
            database_url,
            db_max_connections,
            host,
            jwt_secret,
            api_key,
            admin_username,
            admin_password,
            default_referral_link,
            server_name,
        })
    }

    /// In-memory configuration for tests and local tooling.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            api_key: "test-api-key".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin-password".to_string(),
            default_referral_link: "https://discord.gg/store".to_string(),
            server_name: "TestCraft".to_string(),
        }
    }
}
