//! CLI configuration from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//!
//! - `TERRACOTA_API_URL` - Base URL of the Terracota API
//!   (default: `http://127.0.0.1:3000`, the server's default bind)
//! - `TERRACOTA_STATE_PATH` - Where the state snapshot (cart, session, site
//!   config) lives (default: `terracota/state.json` under the platform data
//!   directory)
//! - `TERRACOTA_STORE_NAME` - Business name greeting the shop in the
//!   WhatsApp order message (default: `Terracota`)

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_STORE_NAME: &str = "Terracota";

/// Errors resolving the CLI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no data directory and no explicit path was given.
    #[error("no platform data directory available; set TERRACOTA_STATE_PATH")]
    NoStateDir,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Base URL of the Terracota API.
    pub api_url: String,
    /// Path of the JSON state snapshot.
    pub state_path: PathBuf,
    /// Business name used in the WhatsApp order greeting.
    pub store_name: String,
}

impl CliConfig {
    /// Read configuration from the environment, loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_url =
            env::var("TERRACOTA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let state_path = match env::var_os("TERRACOTA_STATE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_state_path()?,
        };
        let store_name =
            env::var("TERRACOTA_STORE_NAME").unwrap_or_else(|_| DEFAULT_STORE_NAME.to_owned());

        Ok(Self {
            api_url,
            state_path,
            store_name,
        })
    }
}

fn default_state_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(data_dir.join("terracota").join("state.json"))
}
