//! Application configuration.
//!
//! Settings are layered: `config/default.toml` first, then environment
//! variables prefixed `PRODUCTO__` (e.g. `PRODUCTO__UPLOADS__PATH`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    /// Directory where uploaded product photos are stored.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub uploads: UploadsConfig,
    #[cfg(feature = "database")]
    #[serde(default)]
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("uploads.path", "uploads")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("PRODUCTO").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let cfg = AppConfig::load().expect("defaults should load");
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.uploads.path.is_empty());
    }

    #[test]
    fn env_var_overrides_the_uploads_path() {
        std::env::set_var("PRODUCTO__UPLOADS__PATH", "/tmp/fotos-productos");
        let cfg = AppConfig::load().expect("la configuracion debe cargar");
        std::env::remove_var("PRODUCTO__UPLOADS__PATH");
        assert_eq!(cfg.uploads.path, "/tmp/fotos-productos");
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let cfg = AppConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9000,
            },
            uploads: UploadsConfig {
                path: "uploads".to_string(),
            },
            #[cfg(feature = "database")]
            database_url: None,
        };
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
    }
}
