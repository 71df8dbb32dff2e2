//! Configuration management for the PDF Converter Server

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Filter string passed to `--convert-to`: PDF export with embedded fonts.
pub const DEFAULT_FILTER: &str = "pdf:writer_pdf_Export:ExportFonts=1";

/// Smallest accepted sweep age; younger files may belong to a running job.
pub const MIN_SWEEP_MAX_AGE: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{var} must be at least {min_secs} seconds, got {value}")]
    TooSmall {
        var: &'static str,
        value: u64,
        min_secs: u64,
    },

    #[error("Invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub converter: ConverterConfig,
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// Include the failure description in 500 responses.
    pub expose_error_context: bool,
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub program: String,
    pub filter: String,
    pub scratch_dir: PathBuf,
}

/// Periodic removal of staged files orphaned by a crash.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub interval: Option<Duration>,
    pub max_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_body_bytes: 100 * 1024 * 1024,
                expose_error_context: true,
            },
            converter: ConverterConfig {
                program: "soffice".to_string(),
                filter: DEFAULT_FILTER.to_string(),
                scratch_dir: PathBuf::from("/tmp"),
            },
            sweep: SweepConfig {
                interval: None,
                max_age: Duration::from_secs(3600),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT")?.unwrap_or(defaults.server.port),
                max_body_bytes: parse_var("MAX_BODY_BYTES")?
                    .unwrap_or(defaults.server.max_body_bytes),
                expose_error_context: parse_bool_var("EXPOSE_ERROR_CONTEXT")?
                    .unwrap_or(defaults.server.expose_error_context),
            },
            converter: ConverterConfig {
                program: env::var("CONVERTER_PROGRAM").unwrap_or(defaults.converter.program),
                filter: env::var("CONVERTER_FILTER").unwrap_or(defaults.converter.filter),
                scratch_dir: env::var_os("SCRATCH_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.converter.scratch_dir),
            },
            sweep: SweepConfig {
                interval: parse_var::<u64>("SCRATCH_SWEEP_INTERVAL_SECS")?
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
                max_age: parse_max_age("SCRATCH_MAX_AGE_SECS")?
                    .unwrap_or(defaults.sweep.max_age),
            },
        })
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = IpAddr::from_str(&self.host).map_err(|_| ConfigError::InvalidAddress {
            host: self.host.clone(),
            port: self.port,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Read an optional variable, rejecting values that are set but unparseable.
fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_value(var, &value).map(Some),
        Err(_) => Ok(None),
    }
}

/// Booleans also accept `1`/`0`, `yes`/`no` and `on`/`off`.
fn parse_bool_var(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_bool(var, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_max_age(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(secs) = parse_var::<u64>(var)? else {
        return Ok(None);
    };
    if secs < MIN_SWEEP_MAX_AGE.as_secs() {
        return Err(ConfigError::TooSmall {
            var,
            value: secs,
            min_secs: MIN_SWEEP_MAX_AGE.as_secs(),
        });
    }
    Ok(Some(Duration::from_secs(secs)))
}

fn parse_value<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}
