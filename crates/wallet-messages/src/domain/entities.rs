//! # Domain Entities
//!
//! The uniform output of every wallet codec.

use std::sync::Arc;

use shared_cell::Cell;

/// One outgoing payment instruction: the message cell the wallet will send
/// and the send-mode flags it is sent with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMessage {
    /// Message to be resent by the wallet contract
    pub message: Arc<Cell>,
    /// Send-mode byte (fee and bounce handling), passed through untouched
    pub mode: u8,
}

impl RawMessage {
    /// Create a raw message.
    pub fn new(message: Arc<Cell>, mode: u8) -> Self {
        Self { message, mode }
    }
}
