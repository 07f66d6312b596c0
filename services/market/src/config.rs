use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use campus_core::config::Config;

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_market_port() -> u16 {
    3120
}

fn default_session_idle_secs() -> u64 {
    DEFAULT_SESSION_IDLE_TTL.as_secs()
}

/// Sessions unused for this long are forgotten.
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Market service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Directory holding `users.json` and `products.json`. Env var: `DATA_DIR`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// TCP port for the HTTP server (default 3120). Env var: `MARKET_PORT`.
    #[serde(default = "default_market_port")]
    pub market_port: u16,
    /// Idle lifetime of a login session in seconds. Env var: `SESSION_IDLE_SECS`.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Config for MarketConfig {}

impl MarketConfig {
    /// Defaults for everything but the data directory.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            market_port: default_market_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn products_file(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_FILE)
    }
}

const USERS_FILE: &str = "users.json";
const PRODUCTS_FILE: &str = "products.json";
