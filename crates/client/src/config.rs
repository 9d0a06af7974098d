use std::env;

use api::tasks::DEFAULT_PAGE_LIMIT;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: Url,
    pub page_limit: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("environment variable `{0}` is not a valid base URL")]
    InvalidUrl(&'static str),
}

impl ClientConfig {
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let raw =
            env::var("TASKS_API_BASE").map_err(|_| ConfigError::MissingVar("TASKS_API_BASE"))?;
        let api_base =
            Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl("TASKS_API_BASE"))?;

        let page_limit = env::var("TASKS_PAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);

        Ok(Self {
            api_base,
            page_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_page_limit() {
        let config = ClientConfig::new(Url::parse("http://localhost:3000").unwrap());
        assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
    }
}
