//! # Wallet Message Errors
//!
//! Every failure is terminal. Decoding never yields a partial result.

use shared_cell::CellError;
use thiserror::Error;

/// Errors surfaced by the wallet message codecs and verifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The cell does not have the shape the wallet layout requires
    #[error("Structural decode error: {0}")]
    StructuralDecode(#[from] StructuralError),

    /// Too many messages for the wallet layout (encode time, or a
    /// configured action-chain cap)
    #[error("Capacity exceeded: {count} messages, at most {max} supported")]
    CapacityExceeded { count: usize, max: usize },

    /// The wallet version has no codec
    #[error("Wallet version is not supported: {0}")]
    UnsupportedGeneration(String),

    /// The signature was checked and did not validate
    #[error("Failed to verify msg signature")]
    SignatureMismatch,
}

impl From<CellError> for MessageError {
    fn from(err: CellError) -> Self {
        Self::StructuralDecode(StructuralError::Cell(err))
    }
}

/// The specific way a cell failed to match its layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructuralError {
    /// Bit or ref count mismatch reported by the cell reader
    #[error("{0}")]
    Cell(#[from] CellError),

    /// An action-chain node had neither 40 nor 0 unread bits
    #[error("Unexpected bits available in action chain: {0}")]
    UnexpectedChainBits(usize),

    /// An action-chain node had the wrong number of refs for its kind
    #[error("Unexpected refs in action chain node: expected {expected}, got {actual}")]
    UnexpectedChainRefs { expected: usize, actual: usize },

    /// The leading tag of a signed request matched no variant
    #[error("Unknown signed request tag: {0:#010x}")]
    UnknownRequestTag(u32),

    /// An action carried a tag other than send-message
    #[error("Unknown action tag: {0:#010x}")]
    UnknownActionTag(u32),

    /// Dictionary keys were not exactly 0..n-1
    #[error("Non-contiguous message index: expected {expected}, found {found}")]
    NonContiguousKey { expected: u64, found: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_error_is_structural() {
        let err: MessageError = CellError::NotEnoughRefs.into();
        assert!(matches!(
            err,
            MessageError::StructuralDecode(StructuralError::Cell(CellError::NotEnoughRefs))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = MessageError::CapacityExceeded { count: 5, max: 4 };
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('4'));

        let err: MessageError = StructuralError::UnknownRequestTag(0x1234_5678).into();
        assert!(err.to_string().contains("0x12345678"));
    }
}
