use clap::Parser;
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use std::fs;
use std::path::PathBuf;

use crate::Result;
use crate::error::{ConfigFileSnafu, ConfigParseSnafu, ConfigSnafu};

const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub api_url: String,
    pub max_sessions: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
    pub max_sessions: usize,
}

impl Config {
    pub fn build(filename: &PathBuf) -> Result<Config> {
        let toml_string = fs::read_to_string(filename).context(ConfigFileSnafu)?;
        Self::parse(toml_string.as_str())
    }

    pub fn parse(toml_string: &str) -> Result<Config> {
        let config: AppConfig = toml::from_str(toml_string).context(ConfigParseSnafu)?;

        // Validate config values
        ensure!(
            !config.api_url.is_empty(),
            ConfigSnafu {
                msg: "API URL is required.".to_string()
            }
        );
        ensure!(
            config.port > 0,
            ConfigSnafu {
                msg: "Server port is required.".to_string()
            }
        );

        let max_sessions = config.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS);
        ensure!(
            max_sessions > 0,
            ConfigSnafu {
                msg: "Max sessions must be greater than zero.".to_string()
            }
        );

        Ok(Config {
            port: config.port,
            api_url: config.api_url,
            max_sessions,
        })
    }
}

/// Guestbook website, a client for the guestbook API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, value_name = "config.toml")]
    pub config: PathBuf,
}
