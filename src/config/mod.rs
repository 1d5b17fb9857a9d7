use std::time::Duration;

use serde::{Serialize, Deserialize};
use url::Url;

use crate::gallery::error::Error;

pub mod local_config;

pub const DEFAULT_ENDPOINT: &'static str = "https://api.flickr.com/services/rest/";
pub const API_KEY_VAR: &'static str = "PHOTOGALLERY_API_KEY";
const MAX_PER_PAGE: u32 = 500;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoint: Url,
    pub api_key: String,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            api_key: String::new(),
            per_page: 100,
            timeout_secs: 15,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Takes the api key from the environment when it is set there.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_VAR) {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(Error::Config(format!("Unsupported endpoint scheme: {}", self.endpoint.scheme())));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!("per_page must be between 1 and {}, got {}", MAX_PER_PAGE, self.per_page)));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
