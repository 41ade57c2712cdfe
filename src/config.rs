use serde::{Deserialize, Serialize};

/// Application configuration, constructed once at startup and injected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Optional Postgres URL. Absent means the in-memory demo store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Token-verification settings. With no verify URL the server runs in demo
/// mode and accepts a single fixed dev token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub verify_url: Option<String>,
    pub dev_token: String,
    pub dev_uid: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig { url: None },
            auth: AuthConfig {
                verify_url: None,
                dev_token: "demo-token".to_string(),
                dev_uid: "demo-user".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").ok(),
            },
            auth: AuthConfig {
                verify_url: std::env::var("AUTH_VERIFY_URL").ok(),
                dev_token: std::env::var("AUTH_DEV_TOKEN")
                    .unwrap_or_else(|_| "demo-token".to_string()),
                dev_uid: std::env::var("AUTH_DEV_UID")
                    .unwrap_or_else(|_| "demo-user".to_string()),
            },
        }
    }
}
