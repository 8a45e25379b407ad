//! # Signed Requests and Action Chains (V5)
//!
//! A V5 body is one of two tagged variants with an identical layout:
//!
//! ```text
//! signed_internal#73696e74 / signed_external#7369676e
//!   wallet_id:bits80 valid_until:uint32 seqno:uint32 flag:Bool
//!   signature:bits512 actions:^ActionChain
//! ```
//!
//! The actions are a linked list of cells. Every non-terminal node holds
//! exactly one action (`action_send_msg#0ec3c86d mode:uint8`) and two refs:
//! the next node first, then the outgoing message. The terminal node is
//! empty.

use std::sync::Arc;

use shared_cell::{Cell, CellBuilder, CellSlice};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use tracing::debug;

use super::entities::RawMessage;
use super::errors::{MessageError, StructuralError};
use super::verifier;

/// Tag of a request authenticated inside an internal message.
pub const SIGNED_INTERNAL_TAG: u32 = 0x7369_6e74;

/// Tag of a request authenticated inside an external message.
pub const SIGNED_EXTERNAL_TAG: u32 = 0x7369_676e;

/// Tag of the send-message action.
pub const SEND_MSG_TAG: u32 = 0x0ec3_c86d;

/// Unread bits of a chain node that carries an action: tag + mode.
pub const ACTION_NODE_BITS: usize = 32 + 8;

/// One send-message action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendMessageAction {
    pub mode: u8,
    pub message: Arc<Cell>,
}

impl SendMessageAction {
    /// Read `tag + mode + ^message`, requiring the send-message tag.
    fn decode(slice: &mut CellSlice<'_>) -> Result<Self, MessageError> {
        let tag = slice.load_u32()?;
        if tag != SEND_MSG_TAG {
            return Err(StructuralError::UnknownActionTag(tag).into());
        }
        let mode = slice.load_u8()?;
        let message = slice.load_ref()?;
        Ok(Self { mode, message })
    }
}

impl From<SendMessageAction> for RawMessage {
    fn from(action: SendMessageAction) -> Self {
        RawMessage {
            message: action.message,
            mode: action.mode,
        }
    }
}

/// Walk the chain starting at `head` and collect its actions in order.
///
/// A node with 40 unread bits carries an action, a node with 0 unread bits
/// ends the chain; anything else is a structural error. `limit` caps the
/// number of actions accepted.
pub fn decode_action_chain(
    head: Arc<Cell>,
    limit: Option<usize>,
) -> Result<Vec<SendMessageAction>, MessageError> {
    let mut actions = Vec::new();
    let mut current = head;
    loop {
        let mut slice = current.parse();
        match slice.bits_remaining() {
            0 => {
                if slice.refs_remaining() != 0 {
                    return Err(StructuralError::UnexpectedChainRefs {
                        expected: 0,
                        actual: slice.refs_remaining(),
                    }
                    .into());
                }
                return Ok(actions);
            }
            ACTION_NODE_BITS => {
                if slice.refs_remaining() != 2 {
                    return Err(StructuralError::UnexpectedChainRefs {
                        expected: 2,
                        actual: slice.refs_remaining(),
                    }
                    .into());
                }
                if let Some(max) = limit {
                    if actions.len() == max {
                        return Err(MessageError::CapacityExceeded {
                            count: max + 1,
                            max,
                        });
                    }
                }
                let next = slice.load_ref()?;
                actions.push(SendMessageAction::decode(&mut slice)?);
                current = next;
            }
            other => return Err(StructuralError::UnexpectedChainBits(other).into()),
        }
    }
}

/// Build a chain whose head yields `actions` in order.
pub fn encode_action_chain(actions: &[SendMessageAction]) -> Result<Cell, MessageError> {
    let mut node = Cell::empty();
    for action in actions.iter().rev() {
        let mut builder = CellBuilder::new();
        builder.store_u32(SEND_MSG_TAG)?.store_u8(action.mode)?;
        builder.store_ref(Arc::new(node))?;
        builder.store_ref(action.message.clone())?;
        node = builder.build();
    }
    Ok(node)
}

/// Body shared by both V5 variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// 80-bit wallet scoping identifier
    pub wallet_id: [u8; 10],
    pub valid_until: u32,
    pub seqno: u32,
    pub flag: bool,
    pub signature: Ed25519Signature,
    pub actions: Vec<SendMessageAction>,
}

impl SignedRequest {
    fn decode(slice: &mut CellSlice<'_>, limit: Option<usize>) -> Result<Self, MessageError> {
        let wallet_id = slice.load_bytes::<10>()?;
        let valid_until = slice.load_u32()?;
        let seqno = slice.load_u32()?;
        let flag = slice.load_bit()?;
        let signature = Ed25519Signature::from_bytes(slice.load_bytes::<64>()?);
        let head = slice.load_ref()?;
        slice.ensure_empty()?;
        Ok(Self {
            wallet_id,
            valid_until,
            seqno,
            flag,
            signature,
            actions: decode_action_chain(head, limit)?,
        })
    }

    /// Write every field before the signature and build the action chain
    /// the request refers to.
    fn store_unsigned(&self, builder: &mut CellBuilder, tag: u32) -> Result<Cell, MessageError> {
        builder
            .store_u32(tag)?
            .store_bytes(&self.wallet_id)?
            .store_u32(self.valid_until)?
            .store_u32(self.seqno)?
            .store_bit(self.flag)?;
        encode_action_chain(&self.actions)
    }
}

/// A decoded V5 body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageV5 {
    /// `signed_internal#73696e74`
    SignedInternal(SignedRequest),
    /// `signed_external#7369676e`
    SignedExternal(SignedRequest),
}

impl MessageV5 {
    /// Decode a V5 body with no cap on chain length.
    pub fn decode(body: &Cell) -> Result<Self, MessageError> {
        Self::decode_with_limit(body, None)
    }

    /// Decode a V5 body, rejecting chains longer than `limit` actions.
    pub fn decode_with_limit(body: &Cell, limit: Option<usize>) -> Result<Self, MessageError> {
        let mut slice = body.parse();
        let tag = slice.load_u32()?;
        let message = match tag {
            SIGNED_INTERNAL_TAG => Self::SignedInternal(SignedRequest::decode(&mut slice, limit)?),
            SIGNED_EXTERNAL_TAG => Self::SignedExternal(SignedRequest::decode(&mut slice, limit)?),
            other => return Err(StructuralError::UnknownRequestTag(other).into()),
        };
        debug!(
            tag,
            actions = message.request().actions.len(),
            "decoded v5 request"
        );
        Ok(message)
    }

    /// Leading tag of this variant.
    pub fn tag(&self) -> u32 {
        match self {
            Self::SignedInternal(_) => SIGNED_INTERNAL_TAG,
            Self::SignedExternal(_) => SIGNED_EXTERNAL_TAG,
        }
    }

    /// The request body, whichever variant carries it.
    pub fn request(&self) -> &SignedRequest {
        match self {
            Self::SignedInternal(request) | Self::SignedExternal(request) => request,
        }
    }

    fn request_mut(&mut self) -> &mut SignedRequest {
        match self {
            Self::SignedInternal(request) | Self::SignedExternal(request) => request,
        }
    }

    /// Serialize, signature included as stored.
    pub fn to_cell(&self) -> Result<Cell, MessageError> {
        let request = self.request();
        let mut builder = CellBuilder::new();
        let chain = request.store_unsigned(&mut builder, self.tag())?;
        builder.store_bytes(request.signature.as_bytes())?;
        builder.store_ref(Arc::new(chain))?;
        Ok(builder.build())
    }

    /// Sign over the body with the signature stripped and return the
    /// serialized body.
    pub fn sign(&mut self, keypair: &Ed25519KeyPair) -> Result<Cell, MessageError> {
        let mut unsigned = CellBuilder::new();
        let chain = Arc::new(self.request().store_unsigned(&mut unsigned, self.tag())?);
        unsigned.store_ref(chain)?;
        let signature = keypair.sign(&unsigned.build().hash());

        self.request_mut().signature = signature;
        self.to_cell()
    }

    /// Verify the trailing signature of `body` against `public_key`.
    pub fn verify_signature(body: &Cell, public_key: &Ed25519PublicKey) -> Result<(), MessageError> {
        verifier::verify_trailing_signature(body, public_key)
    }

    /// The actions as raw messages, in chain order.
    pub fn raw_messages(&self) -> Vec<RawMessage> {
        self.request()
            .actions
            .iter()
            .cloned()
            .map(RawMessage::from)
            .collect()
    }

    /// Consume the message, yielding its actions as raw messages.
    pub fn into_raw_messages(self) -> Vec<RawMessage> {
        let request = match self {
            Self::SignedInternal(request) | Self::SignedExternal(request) => request,
        };
        request.actions.into_iter().map(RawMessage::from).collect()
    }
}
