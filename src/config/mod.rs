use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_size_mb: usize,
    /// Parent directory for per-request working directories.
    pub temp_root: PathBuf,
    /// External optimizer executable (Ghostscript's ps2pdf wrapper).
    pub optimizer_bin: String,
    /// External archiver executable.
    pub archiver_bin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config {
            server_host: env::var("HOST").unwrap_or_else(|_| {
                info!("HOST not set, using default: 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            server_port: Self::parse_env_var("PORT", 3000)
                .context("Failed to parse PORT")?,
            max_upload_size_mb: Self::parse_env_var("MAX_UPLOAD_SIZE_MB", 1024)
                .context("Failed to parse MAX_UPLOAD_SIZE_MB")?,
            temp_root: env::var("TEMP_ROOT").map(PathBuf::from).unwrap_or_else(|_| {
                let dir = env::temp_dir();
                info!("TEMP_ROOT not set, using system temp dir: {}", dir.display());
                dir
            }),
            optimizer_bin: env::var("OPTIMIZER_BIN").unwrap_or_else(|_| "ps2pdf".to_string()),
            archiver_bin: env::var("ARCHIVER_BIN").unwrap_or_else(|_| "zip".to_string()),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.max_upload_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.optimizer_bin.is_empty() {
            return Err(anyhow::anyhow!("OPTIMIZER_BIN must not be empty"));
        }
        if self.archiver_bin.is_empty() {
            return Err(anyhow::anyhow!("ARCHIVER_BIN must not be empty"));
        }
        Ok(())
    }
}
