use std::fs;
use std::net::SocketAddr;

use log::{debug, info, trace, LevelFilter};
use pingora::server::configuration::{Opt, ServerConf};
use pingora_error::{ErrorType::*, OrErr, Result};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Default, Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "Config::validate_listeners"))]
pub struct Config {
    #[serde(default)]
    pub pingora: ServerConf,

    #[validate(nested)]
    #[serde(default)]
    pub api: Api,

    #[validate(nested)]
    pub status: Option<Status>,

    #[validate(nested)]
    pub log: Option<Log>,

    #[validate(nested)]
    #[serde(default)]
    pub limits: Limits,
}

// Config file load and validation
impl Config {
    pub fn load_from_yaml<P>(path: P) -> Result<Self>
    where
        P: AsRef<std::path::Path> + std::fmt::Display,
    {
        let conf_str = fs::read_to_string(&path).or_err_with(ReadError, || {
            format!("Unable to read conf file from {path}")
        })?;
        debug!("Conf file read from {path}");
        Self::from_yaml(&conf_str)
    }

    // config file load entry point; no `-c` means built-in defaults
    pub fn load_yaml_with_opt_override(opt: &Opt) -> Result<Self> {
        let mut conf = match &opt.conf {
            Some(path) => Self::load_from_yaml(path)?,
            None => {
                info!("No conf file given, using defaults");
                Self::default()
            }
        };
        conf.merge_with_opt(opt);
        Ok(conf)
    }

    pub fn from_yaml(conf_str: &str) -> Result<Self> {
        trace!("Read conf file: {conf_str}");
        let conf: Config = serde_yaml::from_str(conf_str).or_err_with(ReadError, || {
            format!("Unable to parse yaml conf {conf_str}")
        })?;

        trace!("Loaded conf: {conf:?}");

        conf.validate()
            .or_err_with(FileReadError, || "Conf file valid failed")?;

        Ok(conf)
    }

    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_default()
    }

    pub fn merge_with_opt(&mut self, opt: &Opt) {
        if opt.daemon {
            self.pingora.daemon = true;
        }
    }

    fn validate_listeners(&self) -> Result<(), ValidationError> {
        match &self.status {
            Some(status) if status.address == self.api.address => {
                Err(ValidationError::new("status_address_conflicts_with_api"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Api {
    #[serde(default = "Api::default_address")]
    pub address: SocketAddr,

    /// Value of `Access-Control-Allow-Origin` on every response.
    #[serde(default = "Api::default_allowed_origins")]
    #[validate(length(min = 1))]
    pub allowed_origins: String,

    #[serde(default = "Api::default_max_body_bytes")]
    #[validate(range(min = 1))]
    pub max_body_bytes: usize,
}

impl Api {
    fn default_address() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 8888))
    }

    fn default_allowed_origins() -> String {
        "*".to_string()
    }

    fn default_max_body_bytes() -> usize {
        1024 * 1024
    }
}

impl Default for Api {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            allowed_origins: Self::default_allowed_origins(),
            max_body_bytes: Self::default_max_body_bytes(),
        }
    }
}

/// Separate listener serving only the probe endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Status {
    pub address: SocketAddr,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Log {
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Limits {
    #[serde(default = "Limits::default_median_batch_max")]
    #[validate(range(min = 1, max = 10000))]
    pub median_batch_max: usize,

    #[serde(default = "Limits::default_palindrome_batch_max")]
    #[validate(range(min = 1, max = 10000))]
    pub palindrome_batch_max: usize,
}

impl Limits {
    fn default_median_batch_max() -> usize {
        100
    }

    fn default_palindrome_batch_max() -> usize {
        50
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            median_batch_max: Self::default_median_batch_max(),
            palindrome_batch_max: Self::default_palindrome_batch_max(),
        }
    }
}
