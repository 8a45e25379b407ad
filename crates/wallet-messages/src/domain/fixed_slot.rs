//! # Fixed-Slot Payloads (V3, V4)
//!
//! The outgoing messages of V3 and V4 wallets sit directly in the payload
//! cell: one 8-bit mode and one ref per message, at most four (the cell ref
//! limit). Header fields come first.
//!
//! ```text
//! V3: subwallet:uint32 valid_until:uint32 seqno:uint32 (mode:uint8 ^Message)*
//! V4: subwallet:uint32 valid_until:uint32 seqno:uint32 op:int8 (mode:uint8 ^Message)*
//! ```

use shared_cell::{Cell, CellBuilder, CellSlice};

use super::entities::RawMessage;
use super::errors::MessageError;

/// Most messages a fixed-slot payload can carry.
pub const MAX_FIXED_SLOT_MESSAGES: usize = 4;

/// Write `messages` as `mode + ref` pairs in order.
///
/// More than four messages is rejected before anything is written.
pub fn encode_fixed_slot(
    builder: &mut CellBuilder,
    messages: &[RawMessage],
) -> Result<(), MessageError> {
    if messages.len() > MAX_FIXED_SLOT_MESSAGES {
        return Err(MessageError::CapacityExceeded {
            count: messages.len(),
            max: MAX_FIXED_SLOT_MESSAGES,
        });
    }
    for msg in messages {
        builder.store_u8(msg.mode)?;
        builder.store_ref(msg.message.clone())?;
    }
    Ok(())
}

/// Read `ref + mode` pairs until no ref remains. Leftover bits after the
/// last ref are a structural error.
pub fn decode_fixed_slot(slice: &mut CellSlice<'_>) -> Result<Vec<RawMessage>, MessageError> {
    let mut messages = Vec::with_capacity(slice.refs_remaining());
    while slice.refs_remaining() > 0 {
        let message = slice.load_ref()?;
        let mode = slice.load_u8()?;
        messages.push(RawMessage { message, mode });
    }
    slice.ensure_empty()?;
    Ok(messages)
}

/// Operation selector carried by V4 messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum V4Op {
    SimpleSend,
    DeployAndInstallPlugin,
    InstallPlugin,
    RemovePlugin,
}

impl TryFrom<i8> for V4Op {
    type Error = i8;

    fn try_from(op: i8) -> Result<Self, Self::Error> {
        match op {
            0 => Ok(Self::SimpleSend),
            1 => Ok(Self::DeployAndInstallPlugin),
            2 => Ok(Self::InstallPlugin),
            3 => Ok(Self::RemovePlugin),
            other => Err(other),
        }
    }
}

impl From<V4Op> for i8 {
    fn from(op: V4Op) -> Self {
        match op {
            V4Op::SimpleSend => 0,
            V4Op::DeployAndInstallPlugin => 1,
            V4Op::InstallPlugin => 2,
            V4Op::RemovePlugin => 3,
        }
    }
}

/// Payload of a V3 external message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageV3 {
    pub subwallet_id: u32,
    pub valid_until: u32,
    pub seqno: u32,
    pub raw_messages: Vec<RawMessage>,
}

impl MessageV3 {
    /// Decode the payload cell (the part after the signature).
    pub fn decode(payload: &Cell) -> Result<Self, MessageError> {
        let mut slice = payload.parse();
        Ok(Self {
            subwallet_id: slice.load_u32()?,
            valid_until: slice.load_u32()?,
            seqno: slice.load_u32()?,
            raw_messages: decode_fixed_slot(&mut slice)?,
        })
    }

    /// Encode as a payload cell.
    pub fn to_cell(&self) -> Result<Cell, MessageError> {
        let mut builder = CellBuilder::new();
        builder
            .store_u32(self.subwallet_id)?
            .store_u32(self.valid_until)?
            .store_u32(self.seqno)?;
        encode_fixed_slot(&mut builder, &self.raw_messages)?;
        Ok(builder.build())
    }
}

/// Payload of a V4 external message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageV4 {
    pub subwallet_id: u32,
    pub valid_until: u32,
    pub seqno: u32,
    /// Raw op byte; see [`MessageV4::op_kind`]
    pub op: i8,
    pub raw_messages: Vec<RawMessage>,
}

impl MessageV4 {
    /// Decode the payload cell (the part after the signature).
    pub fn decode(payload: &Cell) -> Result<Self, MessageError> {
        let mut slice = payload.parse();
        Ok(Self {
            subwallet_id: slice.load_u32()?,
            valid_until: slice.load_u32()?,
            seqno: slice.load_u32()?,
            op: slice.load_i8()?,
            raw_messages: decode_fixed_slot(&mut slice)?,
        })
    }

    /// Encode as a payload cell.
    pub fn to_cell(&self) -> Result<Cell, MessageError> {
        let mut builder = CellBuilder::new();
        builder
            .store_u32(self.subwallet_id)?
            .store_u32(self.valid_until)?
            .store_u32(self.seqno)?
            .store_i8(self.op)?;
        encode_fixed_slot(&mut builder, &self.raw_messages)?;
        Ok(builder.build())
    }

    /// The op as a known operation, or `None` for an unrecognized value.
    pub fn op_kind(&self) -> Option<V4Op> {
        V4Op::try_from(self.op).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_cell::CellError;
    use std::sync::Arc;

    fn destination(tag: u8) -> Arc<Cell> {
        let mut builder = CellBuilder::new();
        builder.store_u8(tag).unwrap();
        Arc::new(builder.build())
    }

    fn messages(count: usize) -> Vec<RawMessage> {
        (0..count)
            .map(|i| RawMessage::new(destination(i as u8), 3 + i as u8))
            .collect()
    }

    #[test]
    fn test_fixed_slot_roundtrip_preserves_order() {
        for count in 0..=MAX_FIXED_SLOT_MESSAGES {
            let original = messages(count);
            let mut builder = CellBuilder::new();
            encode_fixed_slot(&mut builder, &original).unwrap();
            let cell = builder.build();

            assert_eq!(cell.bit_len(), 8 * count);
            let decoded = decode_fixed_slot(&mut cell.parse()).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_five_messages_rejected_before_writing() {
        let mut builder = CellBuilder::new();
        let result = encode_fixed_slot(&mut builder, &messages(5));

        assert_eq!(
            result,
            Err(MessageError::CapacityExceeded { count: 5, max: 4 })
        );
        assert_eq!(builder.bits_used(), 0);
        assert_eq!(builder.refs_used(), 0);
    }

    #[test]
    fn test_ref_without_mode_is_structural() {
        let mut builder = CellBuilder::new();
        builder.store_ref(destination(1)).unwrap();
        let cell = builder.build();

        assert_eq!(
            decode_fixed_slot(&mut cell.parse()),
            Err(MessageError::from(CellError::NotEnoughBits {
                requested: 8,
                available: 0
            }))
        );
    }

    #[test]
    fn test_bits_without_ref_are_structural() {
        let mut builder = CellBuilder::new();
        builder.store_u8(3).unwrap();
        builder.store_ref(destination(1)).unwrap();
        builder.store_u8(3).unwrap();
        let cell = builder.build();

        assert_eq!(
            decode_fixed_slot(&mut cell.parse()),
            Err(MessageError::from(CellError::TrailingData { bits: 8, refs: 0 }))
        );
    }

    #[test]
    fn test_v3_layout() {
        let msg = MessageV3 {
            subwallet_id: 698_983_191,
            valid_until: 1_700_000_000,
            seqno: 42,
            raw_messages: messages(2),
        };
        let cell = msg.to_cell().unwrap();

        assert_eq!(cell.bit_len(), 96 + 16);
        assert_eq!(cell.refs().len(), 2);
        assert_eq!(MessageV3::decode(&cell).unwrap(), msg);
    }

    #[test]
    fn test_v4_layout_and_op() {
        let msg = MessageV4 {
            subwallet_id: 698_983_191,
            valid_until: 1_700_000_000,
            seqno: 7,
            op: 0,
            raw_messages: messages(4),
        };
        let cell = msg.to_cell().unwrap();

        assert_eq!(cell.bit_len(), 104 + 32);
        let decoded = MessageV4::decode(&cell).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.op_kind(), Some(V4Op::SimpleSend));
    }

    #[test]
    fn test_v4_unknown_op_preserved() {
        let msg = MessageV4 {
            subwallet_id: 1,
            valid_until: 2,
            seqno: 3,
            op: -1,
            raw_messages: vec![],
        };
        let decoded = MessageV4::decode(&msg.to_cell().unwrap()).unwrap();

        assert_eq!(decoded.op, -1);
        assert_eq!(decoded.op_kind(), None);
    }

    #[test]
    fn test_v4_op_conversions() {
        for op in [
            V4Op::SimpleSend,
            V4Op::DeployAndInstallPlugin,
            V4Op::InstallPlugin,
            V4Op::RemovePlugin,
        ] {
            assert_eq!(V4Op::try_from(i8::from(op)), Ok(op));
        }
        assert_eq!(V4Op::try_from(4), Err(4));
    }

    #[test]
    fn test_truncated_header_is_structural() {
        let mut builder = CellBuilder::new();
        builder.store_u32(1).unwrap().store_u32(2).unwrap();
        let cell = builder.build();

        assert!(matches!(
            MessageV3::decode(&cell),
            Err(MessageError::StructuralDecode(_))
        ));
    }
}
