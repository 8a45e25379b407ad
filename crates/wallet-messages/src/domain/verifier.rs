//! # Signature Verification
//!
//! Two canonical forms are signed, depending on the wallet generation:
//!
//! - **Whole body** (V3, V4, Highload V2): the payload cell following the
//!   512-bit signature is hashed as-is.
//! - **Trailing signature** (V5): the signature is the last 512 bits of the
//!   body. The signed cell is the body with those bits removed and every
//!   ref kept in order.
//!
//! Both report [`MessageError::SignatureMismatch`] when the check runs and
//! fails. A body too short to hold a signature is a structural error.

use shared_cell::{Cell, CellBuilder, CellError};
use shared_crypto::{Ed25519PublicKey, Ed25519Signature, SIGNATURE_BITS};
use tracing::debug;

use super::errors::MessageError;

/// Verify `signature` over the representation hash of `payload`.
pub fn verify_whole_body(
    payload: &Cell,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), MessageError> {
    let hash = payload.hash();
    public_key.verify(&hash, signature).map_err(|err| {
        debug!(error = %err, "whole-body signature rejected");
        MessageError::SignatureMismatch
    })
}

/// Split `body` into the cell that was signed and its trailing signature.
pub fn strip_trailing_signature(body: &Cell) -> Result<(Cell, Ed25519Signature), MessageError> {
    let total = body.bit_len();
    if total < SIGNATURE_BITS {
        return Err(CellError::NotEnoughBits {
            requested: SIGNATURE_BITS,
            available: total,
        }
        .into());
    }

    let mut slice = body.parse();
    let signed_bits = slice.load_bits(total - SIGNATURE_BITS)?;
    let signature = Ed25519Signature::from_bytes(slice.load_bytes::<64>()?);

    let mut builder = CellBuilder::new();
    builder.store_bits(signed_bits)?;
    for child in body.refs() {
        builder.store_ref(child.clone())?;
    }
    Ok((builder.build(), signature))
}

/// Verify a body whose last 512 bits are a signature over the rest.
pub fn verify_trailing_signature(
    body: &Cell,
    public_key: &Ed25519PublicKey,
) -> Result<(), MessageError> {
    let (signed, signature) = strip_trailing_signature(body)?;
    verify_whole_body(&signed, &signature, public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::Ed25519KeyPair;
    use std::sync::Arc;

    fn payload() -> Cell {
        let mut builder = CellBuilder::new();
        builder.store_u32(0xCAFE_BABE).unwrap();
        builder.store_ref(Arc::new(Cell::empty())).unwrap();
        builder.build()
    }

    fn signed_body(keypair: &Ed25519KeyPair) -> Cell {
        let unsigned = payload();
        let signature = keypair.sign(&unsigned.hash());

        let mut builder = CellBuilder::new();
        builder.store_bits(unsigned.bits()).unwrap();
        builder.store_bytes(signature.as_bytes()).unwrap();
        for child in unsigned.refs() {
            builder.store_ref(child.clone()).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_whole_body_accepts_matching_key() {
        let keypair = Ed25519KeyPair::from_seed([1u8; 32]);
        let cell = payload();
        let signature = keypair.sign(&cell.hash());

        assert!(verify_whole_body(&cell, &signature, &keypair.public_key()).is_ok());
    }

    #[test]
    fn test_whole_body_rejects_other_key() {
        let keypair = Ed25519KeyPair::from_seed([1u8; 32]);
        let other = Ed25519KeyPair::from_seed([2u8; 32]);
        let cell = payload();
        let signature = keypair.sign(&cell.hash());

        assert_eq!(
            verify_whole_body(&cell, &signature, &other.public_key()),
            Err(MessageError::SignatureMismatch)
        );
    }

    #[test]
    fn test_strip_keeps_refs_and_leading_bits() {
        let keypair = Ed25519KeyPair::from_seed([3u8; 32]);
        let body = signed_body(&keypair);

        let (signed, signature) = strip_trailing_signature(&body).unwrap();
        assert_eq!(signed, payload());
        assert_eq!(signature, keypair.sign(&payload().hash()));
    }

    #[test]
    fn test_trailing_signature_roundtrip() {
        let keypair = Ed25519KeyPair::from_seed([3u8; 32]);
        let other = Ed25519KeyPair::from_seed([4u8; 32]);
        let body = signed_body(&keypair);

        assert!(verify_trailing_signature(&body, &keypair.public_key()).is_ok());
        assert_eq!(
            verify_trailing_signature(&body, &other.public_key()),
            Err(MessageError::SignatureMismatch)
        );
    }

    #[test]
    fn test_short_body_is_structural() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(&[0u8; 63]).unwrap();
        builder.store_uint(0, 7).unwrap();
        let body = builder.build();

        let keypair = Ed25519KeyPair::from_seed([5u8; 32]);
        assert_eq!(
            verify_trailing_signature(&body, &keypair.public_key()),
            Err(MessageError::from(CellError::NotEnoughBits {
                requested: 512,
                available: 511
            }))
        );
    }
}
