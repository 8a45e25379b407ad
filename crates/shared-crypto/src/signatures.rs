//! # Ed25519 Signatures
//!
//! Wallet contracts authenticate external messages with Ed25519 over the
//! representation hash of the signed cell.
//!
//! ## Security Properties
//!
//! - No RNG dependency (deterministic nonce from message)
//! - Public keys are rejected at construction if they are not valid points
//! - The secret key wipes itself on drop (`ed25519-dalek` `zeroize` feature)

use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Width of a wallet signature in bits.
pub const SIGNATURE_BITS: usize = 512;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify a signature over `message`.
    ///
    /// Uses strict verification, so small-order keys and non-canonical
    /// signatures never validate.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);

        verifying_key
            .verify_strict(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature (64 bytes, 512 bits on the wire).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl Default for Ed25519Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::generate();
        let mut hasher = crate::Sha256Hasher::new();
        hasher.update(b"cell representation");
        let digest = hasher.finalize();

        let signature = keypair.sign(&digest);

        assert!(keypair.public_key().verify(&digest, &signature).is_ok());
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair1 = Ed25519KeyPair::from_seed([1u8; 32]);
        let keypair2 = Ed25519KeyPair::from_seed([2u8; 32]);

        let signature = keypair1.sign(b"test");
        let result = keypair2.public_key().verify(b"test", &signature);

        assert_eq!(result, Err(CryptoError::SignatureVerificationFailed));
    }

    #[test]
    fn test_deterministic_signatures() {
        let keypair = Ed25519KeyPair::from_seed([0xABu8; 32]);

        let sig1 = keypair.sign(b"deterministic test");
        let sig2 = keypair.sign(b"deterministic test");

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_small_order_key_never_verifies() {
        // Identity point as key, identity R and zero s: valid under the
        // cofactorless equation for every message.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let key = Ed25519PublicKey::from_bytes(identity).unwrap();

        let mut raw = [0u8; 64];
        raw[0] = 1;
        let signature = Ed25519Signature::from_bytes(raw);

        assert_eq!(
            key.verify(b"any message", &signature),
            Err(CryptoError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn test_secret_key_wiped_on_drop() {
        fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<SigningKey>();
    }

    #[test]
    fn test_public_key_roundtrip() {
        let keypair = Ed25519KeyPair::from_seed([9u8; 32]);
        let public = keypair.public_key();

        let restored = Ed25519PublicKey::from_bytes(*public.as_bytes()).unwrap();
        assert_eq!(public, restored);
    }
}
