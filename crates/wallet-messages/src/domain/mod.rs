//! # Domain Layer
//!
//! Pure codec and verification logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod config;
pub mod dispatch;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod fixed_slot;
pub mod highload;
pub mod v5;
pub mod verifier;
pub mod version;

pub use config::{CodecConfig, CodecConfigBuilder, ConfigError, KeyPolicy};
pub use entities::RawMessage;
pub use envelope::SignedEnvelope;
pub use errors::{MessageError, StructuralError};
pub use fixed_slot::{MessageV3, MessageV4, V4Op};
pub use highload::HighloadV2Message;
pub use v5::{MessageV5, SendMessageAction, SignedRequest};
pub use version::{Generation, WalletVersion};
