use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::status::DEFAULT_PROBE_TIMEOUT;
use crate::tmdb::TMDB_BASE;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub probe_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tmdb_api_key = get("TMDB_API_KEY")
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let tmdb_base_url = get("TMDB_BASE_URL").unwrap_or_else(|| TMDB_BASE.to_string());
        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", v))?,
            None => DEFAULT_PORT,
        };
        let static_dir = get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let probe_timeout = match get("MIRROR_PROBE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse::<u64>().with_context(|| {
                format!("MIRROR_PROBE_TIMEOUT_SECS must be whole seconds, got '{}'", v)
            })?),
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            port,
            static_dir,
            probe_timeout,
        })
    }
}
