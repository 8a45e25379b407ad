//! # Signed Envelope
//!
//! V3, V4 and Highload V2 bodies share one outer wrapper: a 512-bit
//! signature followed inline by the payload bits and refs.
//!
//! ```text
//! signature:bits512 payload:Any
//! ```

use shared_cell::{Cell, CellBuilder};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

use super::errors::MessageError;
use super::verifier;

/// Signature plus the payload it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Signature over `payload.hash()`
    pub signature: Ed25519Signature,
    /// Everything after the signature, as a standalone cell
    pub payload: Cell,
}

impl SignedEnvelope {
    /// Peel the signature off a message body. No verification happens here.
    pub fn extract(body: &Cell) -> Result<Self, MessageError> {
        let mut slice = body.parse();
        let signature = Ed25519Signature::from_bytes(slice.load_bytes::<64>()?);
        Ok(Self {
            signature,
            payload: slice.to_cell(),
        })
    }

    /// Sign `payload` with `keypair`.
    pub fn sign(payload: Cell, keypair: &Ed25519KeyPair) -> Self {
        let signature = keypair.sign(&payload.hash());
        Self { signature, payload }
    }

    /// Serialize as a message body.
    pub fn to_cell(&self) -> Result<Cell, MessageError> {
        let mut builder = CellBuilder::new();
        builder.store_bytes(self.signature.as_bytes())?;
        builder.store_cell_contents(&self.payload)?;
        Ok(builder.build())
    }

    /// Check the signature against the payload hash.
    pub fn verify(&self, public_key: &Ed25519PublicKey) -> Result<(), MessageError> {
        verifier::verify_whole_body(&self.payload, &self.signature, public_key)
    }
}
