//! Codec configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use wallet_messages::domain::{CodecConfigBuilder, KeyPolicy};
//!
//! let config = CodecConfigBuilder::new()
//!     .dictionary_keys(KeyPolicy::Ascending)
//!     .max_action_chain(255)
//!     .build()
//!     .expect("Valid config");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How highload dictionary keys are checked on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Keys must be exactly `0..n`; any gap is a structural error
    #[default]
    Contiguous,
    /// Gaps are accepted; messages come out in ascending key order
    Ascending,
}

/// Invalid configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid codec parameters: {0}")]
    InvalidParameters(String),
}

/// Decoder and verifier configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Key check applied to highload dictionaries
    pub dictionary_keys: KeyPolicy,
    /// Optional cap on decoded action-chain length (`None` = no cap)
    pub max_action_chain: Option<usize>,
    /// Route V5 through the trailing-signature scheme in `verify_signature`
    pub unified_v5_verification: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            dictionary_keys: KeyPolicy::Contiguous,
            max_action_chain: None,
            unified_v5_verification: true,
        }
    }
}

impl CodecConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_action_chain == Some(0) {
            return Err(ConfigError::InvalidParameters(
                "max_action_chain must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the dictionary key policy
    pub fn with_dictionary_keys(mut self, policy: KeyPolicy) -> Self {
        self.dictionary_keys = policy;
        self
    }

    /// Builder-style method to cap action-chain length
    pub fn with_max_action_chain(mut self, max: usize) -> Self {
        self.max_action_chain = Some(max);
        self
    }
}

/// Builder for CodecConfig with validation
#[derive(Default)]
pub struct CodecConfigBuilder {
    dictionary_keys: Option<KeyPolicy>,
    max_action_chain: Option<usize>,
    unified_v5_verification: Option<bool>,
}

impl CodecConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highload dictionary key policy
    pub fn dictionary_keys(mut self, policy: KeyPolicy) -> Self {
        self.dictionary_keys = Some(policy);
        self
    }

    /// Cap decoded action chains at `max` actions
    pub fn max_action_chain(mut self, max: usize) -> Self {
        self.max_action_chain = Some(max);
        self
    }

    /// Choose whether `verify_signature` handles V5 messages
    pub fn unified_v5_verification(mut self, enabled: bool) -> Self {
        self.unified_v5_verification = Some(enabled);
        self
    }

    /// Build the CodecConfig, validating all parameters
    pub fn build(self) -> Result<CodecConfig, ConfigError> {
        let defaults = CodecConfig::default();

        let config = CodecConfig {
            dictionary_keys: self.dictionary_keys.unwrap_or(defaults.dictionary_keys),
            max_action_chain: self.max_action_chain.or(defaults.max_action_chain),
            unified_v5_verification: self
                .unified_v5_verification
                .unwrap_or(defaults.unified_v5_verification),
        };

        config.validate()?;
        Ok(config)
    }
}
