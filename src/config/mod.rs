use std::env;
use std::path::PathBuf;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Extra template files layered over the built-in catalog
    pub templates_dir: Option<PathBuf>,
    pub catalog_poll_secs: u64,
    /// Origin allowed by CORS; any origin when unset
    pub frontend_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            templates_dir: None,
            catalog_poll_secs: 30,
            frontend_origin: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            templates_dir: get_optional_env("TEMPLATES_DIR").map(PathBuf::from),
            catalog_poll_secs: get_env("CATALOG_POLL_SECS", "30")
                .parse()
                .unwrap_or(30),
            frontend_origin: get_optional_env("FRONTEND_ORIGIN"),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
