//! Server configuration from an optional TOML file plus environment overrides.
//!
//! Env variables:
//!   UNIPLANNER_CONFIG   : path to a TOML file (all keys optional)
//!   UNIPLANNER_ADDR     : bind address, overrides `bind_addr`
//!   UNIPLANNER_DATA_DIR : snapshot directory, overrides `data_dir`

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load from `UNIPLANNER_CONFIG` if set, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var("UNIPLANNER_CONFIG") {
            Ok(path) => {
                let cfg = Self::from_file(Path::new(&path))?;
                info!(target: "uniplanner", %path, "loaded config (TOML)");
                cfg
            }
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(
            std::env::var("UNIPLANNER_ADDR").ok(),
            std::env::var("UNIPLANNER_DATA_DIR").ok(),
        );
        Ok(cfg)
    }

    fn apply_overrides(&mut self, addr: Option<String>, data_dir: Option<String>) {
        if let Some(addr) = addr {
            self.bind_addr = addr;
        }
        if let Some(dir) = data_dir {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(self.bind_addr.clone()))
    }
}
