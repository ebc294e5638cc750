//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;

const DEFAULT_DB_HOST: &str = "ecotrack0.zoz8wuc.mongodb.net";
const DEFAULT_DB_NAME: &str = "ecoTrackDB";
const DEFAULT_PORT: u16 = 5000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the document store
    pub mongodb_uri: String,
    /// Database holding all collections
    pub database_name: String,
    /// Server port
    pub port: u16,
    /// Hosted/serverless deployment: the binary must not bind a listener
    pub serverless: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "ecoTrackTest".to_string(),
            port: DEFAULT_PORT,
            serverless: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `MONGODB_URI` wins when present; otherwise the URI is assembled from
    /// `DB_USER`, `DB_PASS` and `DB_HOST`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mongodb_uri = match env::var("MONGODB_URI") {
            Ok(uri) => uri.trim().to_string(),
            Err(_) => {
                let user = env::var("DB_USER").map_err(|_| ConfigError::Missing("DB_USER"))?;
                let pass = env::var("DB_PASS").map_err(|_| ConfigError::Missing("DB_PASS"))?;
                let host = env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string());
                atlas_uri(&user, &pass, &host)
            }
        };

        Ok(Self {
            mongodb_uri,
            database_name: env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            serverless: env::var("VERCEL").is_ok() || env::var("SERVERLESS").is_ok(),
        })
    }
}

/// Build an SRV connection string for a hosted cluster.
fn atlas_uri(user: &str, pass: &str, host: &str) -> String {
    let app_name = host.split('.').next().unwrap_or("ecotrack");
    format!("mongodb+srv://{user}:{pass}@{host}/?appName={app_name}")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
