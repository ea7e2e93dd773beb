//! Interceptor configuration
//!
//! The configuration is decoded once at startup and then handed to the
//! [`Interceptor`](crate::engine::Interceptor), which only reads it.

use crate::types::rule::InterceptorRule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) mod params;

/// Metadata tag read from event definitions when none is configured
pub const DEFAULT_TAG_NAME: &str = "EvTp";

/// Errors raised while decoding a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid interceptor configuration: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Tag name must not be empty")]
    EmptyTagName,
}

/// Static configuration: tag name plus the ordered rule list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorConfig {
    #[serde(default = "default_tag_name", deserialize_with = "params::string")]
    pub tag_name: String,
    /// Evaluated in order, first match wins
    #[serde(default, deserialize_with = "params::struct_list")]
    pub interceptor_list: Vec<InterceptorRule>,
}

fn default_tag_name() -> String {
    DEFAULT_TAG_NAME.to_string()
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            tag_name: default_tag_name(),
            interceptor_list: Vec::new(),
        }
    }
}

impl InterceptorConfig {
    pub fn new(tag_name: impl Into<String>, interceptor_list: Vec<InterceptorRule>) -> Self {
        Self {
            tag_name: tag_name.into(),
            interceptor_list,
        }
    }

    /// Config with the default tag name
    pub fn with_rules(interceptor_list: Vec<InterceptorRule>) -> Self {
        Self::new(DEFAULT_TAG_NAME, interceptor_list)
    }

    /// Decode from JSON text, accepting editor-style string encoding
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.tag_name.is_empty() {
            return Err(ConfigError::EmptyTagName);
        }
        log::debug!(
            "Loaded {} interceptor rule(s) for tag <{}>",
            self.interceptor_list.len(),
            self.tag_name
        );
        Ok(self)
    }
}
