use crate::utils::AppError;
use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "practica-database";
pub const DEFAULT_COLLECTION: &str = "users";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
    /// Empty means any origin is accepted
    pub cors_allowed_origins: Vec<String>,
}

impl Settings {
    /// Loads settings from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Unset or blank keys fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT").map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("PORT must be a valid port number, got '{}'", raw)))?,
            _ => DEFAULT_PORT,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("HOST", DEFAULT_HOST),
            port,
            mongodb_uri: get("MONGODB_URI", DEFAULT_MONGODB_URI),
            database: get("MONGODB_DATABASE", DEFAULT_DATABASE),
            collection: get("USERS_COLLECTION", DEFAULT_COLLECTION),
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
