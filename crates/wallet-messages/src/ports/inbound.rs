//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this crate.

use shared_cell::Cell;
use shared_crypto::Ed25519PublicKey;

use crate::domain::entities::RawMessage;
use crate::domain::errors::MessageError;
use crate::domain::fixed_slot::{MessageV3, MessageV4};
use crate::domain::highload::HighloadV2Message;
use crate::domain::v5::MessageV5;
use crate::domain::version::WalletVersion;

/// Primary wallet message API.
///
/// Every operation is synchronous and reads only the cell it is given.
/// Implementations must be thread-safe (`Send + Sync`).
pub trait WalletMessageApi: Send + Sync {
    /// Extract the outgoing messages of an external message body, in order.
    ///
    /// # Errors
    /// * `UnsupportedGeneration` - no codec for `version`; the cell is not read
    /// * `StructuralDecode` - the body does not match the version's layout
    fn extract_raw_messages(
        &self,
        version: WalletVersion,
        body: &Cell,
    ) -> Result<Vec<RawMessage>, MessageError>;

    /// Verify the body signature with the scheme of `version`.
    fn verify_signature(
        &self,
        version: WalletVersion,
        body: &Cell,
        public_key: &Ed25519PublicKey,
    ) -> Result<(), MessageError>;

    /// Verify a V5 body whose last 512 bits sign the rest.
    fn verify_v5_signature(
        &self,
        body: &Cell,
        public_key: &Ed25519PublicKey,
    ) -> Result<(), MessageError>;

    /// Decode a signed V3 body.
    fn decode_v3(&self, body: &Cell) -> Result<MessageV3, MessageError>;

    /// Decode a signed V4 body.
    fn decode_v4(&self, body: &Cell) -> Result<MessageV4, MessageError>;

    /// Decode a signed Highload V2 body.
    fn decode_highload_v2(&self, body: &Cell) -> Result<HighloadV2Message, MessageError>;

    /// Decode a V5 body.
    fn decode_v5(&self, body: &Cell) -> Result<MessageV5, MessageError>;
}
