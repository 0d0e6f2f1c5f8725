//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the server starts with zero configuration
//! for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use mentorlink_shared::constants::{DEFAULT_HTTP_PORT, MAX_PHOTO_SIZE};
use mentorlink_store::RatingWriteMode;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: none, meaning the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Directory holding uploaded profile photos.
    /// Env: `PHOTO_STORAGE_PATH`
    /// Default: `./photos`
    pub photo_storage_path: PathBuf,

    /// Externally visible base URL, used to build photo download URLs.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080`
    pub public_base_url: String,

    /// Maximum photo size in bytes.
    /// Env: `MAX_PHOTO_SIZE`
    /// Default: 5 MiB
    pub max_photo_size: usize,

    /// How review submissions write the aggregate rating.
    /// Env: `RATING_WRITE_MODE` (`last_write_wins` or `conditional`)
    /// Default: `last_write_wins`
    pub rating_write_mode: RatingWriteMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            photo_storage_path: PathBuf::from("./photos"),
            public_base_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            max_photo_size: MAX_PHOTO_SIZE,
            rating_write_mode: RatingWriteMode::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(path) = var("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = var("PHOTO_STORAGE_PATH") {
            config.photo_storage_path = PathBuf::from(path);
        }

        if let Some(url) = var("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(val) = var("MAX_PHOTO_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_photo_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_PHOTO_SIZE, using default"),
            }
        }

        if let Some(val) = var("RATING_WRITE_MODE") {
            match val.parse::<RatingWriteMode>() {
                Ok(mode) => config.rating_write_mode = mode,
                Err(e) => tracing::warn!(error = %e, "Invalid RATING_WRITE_MODE, using default"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.max_photo_size, 5 * 1024 * 1024);
        assert_eq!(config.rating_write_mode, RatingWriteMode::LastWriteWins);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/m.db"),
            ("PUBLIC_BASE_URL", "https://mentors.example/"),
            ("RATING_WRITE_MODE", "conditional"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/m.db")));
        assert_eq!(config.public_base_url, "https://mentors.example");
        assert_eq!(config.rating_write_mode, RatingWriteMode::Conditional);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_map(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("MAX_PHOTO_SIZE", "0"),
            ("RATING_WRITE_MODE", "whatever"),
        ]);
        let default = ServerConfig::default();
        assert_eq!(config.http_addr, default.http_addr);
        assert_eq!(config.max_photo_size, default.max_photo_size);
        assert_eq!(config.rating_write_mode, default.rating_write_mode);
    }
}
