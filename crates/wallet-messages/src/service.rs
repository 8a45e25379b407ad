//! # Wallet Message Service
//!
//! Application service layer that implements the `WalletMessageApi` trait.
//!
//! This is the hexagonal "application service" that:
//! - Holds the validated `CodecConfig`
//! - Delegates decoding and verification to the domain layer
//! - Logs failures at the API boundary

use shared_cell::Cell;
use shared_crypto::Ed25519PublicKey;
use tracing::{debug, warn};

use crate::domain::config::{CodecConfig, ConfigError};
use crate::domain::dispatch;
use crate::domain::entities::RawMessage;
use crate::domain::errors::MessageError;
use crate::domain::fixed_slot::{MessageV3, MessageV4};
use crate::domain::highload::HighloadV2Message;
use crate::domain::v5::MessageV5;
use crate::domain::verifier;
use crate::domain::version::WalletVersion;
use crate::ports::inbound::WalletMessageApi;

/// Wallet Message Service.
#[derive(Debug, Clone, Default)]
pub struct WalletMessageService {
    config: CodecConfig,
}

impl WalletMessageService {
    /// Create a service with a validated configuration.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

fn log_failure<T>(operation: &str, result: Result<T, MessageError>) -> Result<T, MessageError> {
    if let Err(err) = &result {
        match err {
            MessageError::SignatureMismatch => debug!(operation, "signature mismatch"),
            other => warn!(operation, error = %other, "wallet message rejected"),
        }
    }
    result
}

impl WalletMessageApi for WalletMessageService {
    fn extract_raw_messages(
        &self,
        version: WalletVersion,
        body: &Cell,
    ) -> Result<Vec<RawMessage>, MessageError> {
        log_failure(
            "extract_raw_messages",
            dispatch::extract_raw_messages(version, body, &self.config),
        )
    }

    fn verify_signature(
        &self,
        version: WalletVersion,
        body: &Cell,
        public_key: &Ed25519PublicKey,
    ) -> Result<(), MessageError> {
        log_failure(
            "verify_signature",
            dispatch::verify_signature(version, body, public_key, &self.config),
        )
    }

    fn verify_v5_signature(
        &self,
        body: &Cell,
        public_key: &Ed25519PublicKey,
    ) -> Result<(), MessageError> {
        log_failure(
            "verify_v5_signature",
            verifier::verify_trailing_signature(body, public_key),
        )
    }

    fn decode_v3(&self, body: &Cell) -> Result<MessageV3, MessageError> {
        log_failure("decode_v3", dispatch::decode_v3(body))
    }

    fn decode_v4(&self, body: &Cell) -> Result<MessageV4, MessageError> {
        log_failure("decode_v4", dispatch::decode_v4(body))
    }

    fn decode_highload_v2(&self, body: &Cell) -> Result<HighloadV2Message, MessageError> {
        log_failure(
            "decode_highload_v2",
            dispatch::decode_highload_v2(body, self.config.dictionary_keys),
        )
    }

    fn decode_v5(&self, body: &Cell) -> Result<MessageV5, MessageError> {
        log_failure(
            "decode_v5",
            dispatch::decode_v5(body, self.config.max_action_chain),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::CodecConfigBuilder;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = CodecConfig {
            max_action_chain: Some(0),
            ..Default::default()
        };
        assert!(WalletMessageService::new(config).is_err());
    }

    #[test]
    fn test_new_keeps_config() {
        let config = CodecConfigBuilder::new().max_action_chain(8).build().unwrap();
        let service = WalletMessageService::new(config.clone()).unwrap();
        assert_eq!(service.config(), &config);
    }

    #[test]
    fn test_unsupported_version() {
        let service = WalletMessageService::default();
        assert!(matches!(
            service.extract_raw_messages(WalletVersion::HighloadV1R1, &Cell::empty()),
            Err(MessageError::UnsupportedGeneration(_))
        ));
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WalletMessageService>();
    }
}
