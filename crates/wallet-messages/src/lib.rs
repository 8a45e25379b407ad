//! # Wallet Messages
//!
//! Decodes, encodes and verifies the signed external messages that clients
//! send to wallet contracts.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Per-version codecs and signature schemes, no I/O
//! - **Ports Layer** (`ports/`): The `WalletMessageApi` inbound port
//! - **Service Layer** (`service.rs`): Wires configuration to the domain layer
//!
//! ## Wire Layouts
//!
//! | Version | Header | Messages |
//! |---------|--------|----------|
//! | V3R1, V3R2 | `subwallet:32 valid_until:32 seqno:32` | up to 4 × `mode:8 ^msg` |
//! | V4R1, V4R2 | as V3, then `op:8` | up to 4 × `mode:8 ^msg` |
//! | Highload V2R2 | `subwallet:32 query_id:64` | `HashmapE 16`, up to 254 |
//! | V5R1 | `tag:32 wallet_id:80 valid_until:32 seqno:32 flag:1 sig:512` | action chain |
//!
//! V3, V4 and Highload bodies start with a 512-bit signature over the rest
//! of the cell. V5 bodies end with a signature over everything before it.
//!
//! ## Usage Example
//!
//! ```ignore
//! use wallet_messages::{WalletMessageApi, WalletMessageService, WalletVersion};
//!
//! let service = WalletMessageService::default();
//! service.verify_signature(WalletVersion::V4R2, &body, &public_key)?;
//! for msg in service.extract_raw_messages(WalletVersion::V4R2, &body)? {
//!     println!("mode {} -> {:?}", msg.mode, msg.message.hash());
//! }
//! ```

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::dispatch::{
    decode_highload_v2, decode_v3, decode_v4, decode_v5, extract_raw_messages, verify_signature,
};
pub use domain::v5::{decode_action_chain, encode_action_chain};
pub use domain::verifier::{strip_trailing_signature, verify_trailing_signature, verify_whole_body};
pub use domain::{
    CodecConfig, CodecConfigBuilder, ConfigError, Generation, HighloadV2Message, KeyPolicy,
    MessageError, MessageV3, MessageV4, MessageV5, RawMessage, SendMessageAction, SignedEnvelope,
    SignedRequest, StructuralError, V4Op, WalletVersion,
};
pub use ports::inbound::WalletMessageApi;
pub use service::WalletMessageService;
