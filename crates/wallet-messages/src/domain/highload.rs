//! # Dictionary Payloads (Highload V2)
//!
//! Highload wallets index their outgoing messages in a dictionary keyed by
//! position, which lifts the four-ref limit of a single cell.
//!
//! ```text
//! subwallet:uint32 query_id:uint64 messages:(HashmapE 16 (mode:uint8 ^Message))
//! ```

use std::collections::BTreeMap;

use shared_cell::dictionary::{load_hashmap_e, store_hashmap_e};
use shared_cell::{Cell, CellBuilder, CellSlice};
use tracing::warn;

use super::config::KeyPolicy;
use super::entities::RawMessage;
use super::errors::{MessageError, StructuralError};

/// Most messages one highload request may carry.
pub const MAX_HIGHLOAD_MESSAGES: usize = 254;

/// Width of the message index.
pub const HIGHLOAD_KEY_BITS: usize = 16;

/// Write `messages` as a dictionary keyed by 0-based position.
///
/// More than 254 messages is rejected before any cell is built. An empty
/// list is written as an empty dictionary (a single `0` bit).
pub fn encode_dictionary(
    builder: &mut CellBuilder,
    messages: &[RawMessage],
) -> Result<(), MessageError> {
    if messages.len() > MAX_HIGHLOAD_MESSAGES {
        return Err(MessageError::CapacityExceeded {
            count: messages.len(),
            max: MAX_HIGHLOAD_MESSAGES,
        });
    }

    let mut entries = BTreeMap::new();
    for (index, msg) in messages.iter().enumerate() {
        let mut value = CellBuilder::new();
        value.store_u8(msg.mode)?;
        value.store_ref(msg.message.clone())?;
        entries.insert(index as u64, value.build());
    }
    store_hashmap_e(builder, HIGHLOAD_KEY_BITS, &entries)?;
    Ok(())
}

/// Read the dictionary and return its messages in ascending key order.
///
/// With [`KeyPolicy::Contiguous`] the keys must be exactly `0..n`.
/// With [`KeyPolicy::Ascending`] gaps are accepted and keys are dropped
/// after ordering.
pub fn decode_dictionary(
    slice: &mut CellSlice<'_>,
    policy: KeyPolicy,
) -> Result<Vec<RawMessage>, MessageError> {
    let entries = load_hashmap_e(slice, HIGHLOAD_KEY_BITS)?;

    let mut messages = Vec::with_capacity(entries.len());
    for (expected, (key, value)) in entries.into_iter().enumerate() {
        let expected = expected as u64;
        if key != expected {
            match policy {
                KeyPolicy::Contiguous => {
                    return Err(StructuralError::NonContiguousKey {
                        expected,
                        found: key,
                    }
                    .into());
                }
                KeyPolicy::Ascending => {
                    warn!(expected, found = key, "highload message index gap");
                }
            }
        }
        messages.push(decode_value(&value)?);
    }
    Ok(messages)
}

fn decode_value(value: &Cell) -> Result<RawMessage, MessageError> {
    let mut slice = value.parse();
    let mode = slice.load_u8()?;
    let message = slice.load_ref()?;
    slice.ensure_empty()?;
    Ok(RawMessage { message, mode })
}

/// Payload of a Highload V2 external message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighloadV2Message {
    pub subwallet_id: u32,
    /// Query id; the contract bounds it by its expiry time
    pub bounded_query_id: u64,
    pub raw_messages: Vec<RawMessage>,
}

impl HighloadV2Message {
    /// Decode the payload cell (the part after the signature).
    pub fn decode(payload: &Cell, policy: KeyPolicy) -> Result<Self, MessageError> {
        let mut slice = payload.parse();
        let subwallet_id = slice.load_u32()?;
        let bounded_query_id = slice.load_u64()?;
        let raw_messages = decode_dictionary(&mut slice, policy)?;
        slice.ensure_empty()?;
        Ok(Self {
            subwallet_id,
            bounded_query_id,
            raw_messages,
        })
    }

    /// Encode as a payload cell.
    pub fn to_cell(&self) -> Result<Cell, MessageError> {
        let mut builder = CellBuilder::new();
        builder
            .store_u32(self.subwallet_id)?
            .store_u64(self.bounded_query_id)?;
        encode_dictionary(&mut builder, &self.raw_messages)?;
        Ok(builder.build())
    }
}
