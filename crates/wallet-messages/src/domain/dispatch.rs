//! # Raw-Message Façade
//!
//! Routes a message body to the codec of its wallet version and projects the
//! result onto the uniform [`RawMessage`] list. The version is checked
//! before any cell data is read.

use shared_cell::Cell;
use shared_crypto::Ed25519PublicKey;
use tracing::debug;

use super::config::{CodecConfig, KeyPolicy};
use super::entities::RawMessage;
use super::envelope::SignedEnvelope;
use super::errors::MessageError;
use super::fixed_slot::{MessageV3, MessageV4};
use super::highload::HighloadV2Message;
use super::v5::MessageV5;
use super::verifier;
use super::version::{Generation, WalletVersion};

/// Decode a signed V3 body.
pub fn decode_v3(body: &Cell) -> Result<MessageV3, MessageError> {
    let envelope = SignedEnvelope::extract(body)?;
    MessageV3::decode(&envelope.payload)
}

/// Decode a signed V4 body.
pub fn decode_v4(body: &Cell) -> Result<MessageV4, MessageError> {
    let envelope = SignedEnvelope::extract(body)?;
    MessageV4::decode(&envelope.payload)
}

/// Decode a signed Highload V2 body.
pub fn decode_highload_v2(body: &Cell, policy: KeyPolicy) -> Result<HighloadV2Message, MessageError> {
    let envelope = SignedEnvelope::extract(body)?;
    HighloadV2Message::decode(&envelope.payload, policy)
}

/// Decode a V5 body.
pub fn decode_v5(body: &Cell, limit: Option<usize>) -> Result<MessageV5, MessageError> {
    MessageV5::decode_with_limit(body, limit)
}

/// Extract the outgoing messages of an external message body.
pub fn extract_raw_messages(
    version: WalletVersion,
    body: &Cell,
    config: &CodecConfig,
) -> Result<Vec<RawMessage>, MessageError> {
    let generation = version.generation()?;
    let messages = match generation {
        Generation::V3 => decode_v3(body)?.raw_messages,
        Generation::V4 => decode_v4(body)?.raw_messages,
        Generation::HighloadV2 => decode_highload_v2(body, config.dictionary_keys)?.raw_messages,
        Generation::V5 => decode_v5(body, config.max_action_chain)?.into_raw_messages(),
    };
    debug!(%version, count = messages.len(), "extracted raw messages");
    Ok(messages)
}

/// Check that `body` was signed by `public_key` for a wallet of `version`.
///
/// V5 bodies use the trailing-signature scheme unless
/// `config.unified_v5_verification` is off, in which case they are
/// reported as unsupported here and must go through
/// [`verifier::verify_trailing_signature`] directly.
pub fn verify_signature(
    version: WalletVersion,
    body: &Cell,
    public_key: &Ed25519PublicKey,
    config: &CodecConfig,
) -> Result<(), MessageError> {
    match version.generation()? {
        Generation::V3 | Generation::V4 | Generation::HighloadV2 => {
            SignedEnvelope::extract(body)?.verify(public_key)
        }
        Generation::V5 if config.unified_v5_verification => {
            verifier::verify_trailing_signature(body, public_key)
        }
        Generation::V5 => Err(MessageError::UnsupportedGeneration(version.to_string())),
    }
}
