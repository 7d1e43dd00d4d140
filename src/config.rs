use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub tmdb: TmdbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// 0 lets the runtime pick one thread per core.
    pub worker_threads: usize,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
            worker_threads: 0,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "sqlite:./cinarr.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,
    pub bearer_token: String,
    pub language: String,
    pub request_timeout_seconds: u64,
    pub enrich_concurrency: usize,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            bearer_token: String::new(),
            language: "fr-FR".to_string(),
            request_timeout_seconds: 30,
            enrich_concurrency: 10,
        }
    }
}

impl Config {
    /// Loads the first config file found: `CINARR_CONFIG`, then
    /// `./config.toml`, then the platform config directory. Falls back
    /// to defaults, then applies environment overrides on top.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }

    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CINARR_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from("config.toml");
        if local.exists() {
            return Some(local);
        }

        let system = dirs::config_dir()?.join("cinarr").join("config.toml");
        if system.exists() {
            return Some(system);
        }

        None
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("TMDB_BEARER_TOKEN") {
            self.tmdb.bearer_token = token;
        }
        if let Ok(base_url) = std::env::var("TMDB_BASE_URL") {
            self.tmdb.base_url = base_url;
        }
        if let Ok(path) = std::env::var("CINARR_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Ok(port) = std::env::var("CINARR_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(origins) = std::env::var("CINARR_CORS_ORIGINS") {
            self.server.cors_allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tmdb.bearer_token.trim().is_empty() {
            bail!("tmdb.bearer_token is not set (TMDB_BEARER_TOKEN)");
        }
        if self.server.port == 0 {
            bail!("server.port must not be 0");
        }
        if self.tmdb.enrich_concurrency == 0 {
            bail!("tmdb.enrich_concurrency must be at least 1");
        }
        url::Url::parse(&self.tmdb.base_url)
            .with_context(|| format!("tmdb.base_url is not a valid URL: {}", self.tmdb.base_url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.tmdb.language, "fr-FR");
        assert_eq!(config.tmdb.enrich_concurrency, 10);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [tmdb]
            bearer_token = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.tmdb.bearer_token, "secret");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn validate_rejects_missing_token_and_bad_url() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tmdb.bearer_token = "secret".to_string();
        config.tmdb.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tmdb.bearer_token = "secret".to_string();
        assert!(config.validate().is_ok());
    }
}
