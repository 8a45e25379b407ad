//! Cell error types.

use thiserror::Error;

/// Errors raised while building, reading or interpreting cells.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CellError {
    /// A read asked for more bits than remain in the slice
    #[error("Not enough bits: requested {requested}, available {available}")]
    NotEnoughBits {
        /// Bits requested by the read
        requested: usize,
        /// Bits left unread
        available: usize,
    },

    /// A read asked for a reference but none remain
    #[error("Not enough refs")]
    NotEnoughRefs,

    /// A write would exceed the cell bit capacity
    #[error("Cell bit overflow: requested {requested}, free {available}")]
    BitOverflow {
        /// Bits the write needed
        requested: usize,
        /// Bits still free in the builder
        available: usize,
    },

    /// A write would exceed the cell reference capacity
    #[error("Cell ref overflow")]
    RefOverflow,

    /// Attaching the child would make the tree deeper than allowed
    #[error("Cell depth overflow: child depth {depth}, max {max}")]
    DepthOverflow {
        /// Depth of the rejected child
        depth: u16,
        /// Deepest tree allowed
        max: u16,
    },

    /// An integer does not fit in the requested width
    #[error("Value {value} does not fit in {bits} bits")]
    IntegerOverflow {
        /// Value being stored
        value: u64,
        /// Width requested
        bits: usize,
    },

    /// Data left over after a layout was fully consumed
    #[error("Unexpected trailing data: {bits} bits, {refs} refs")]
    TrailingData {
        /// Unread bits
        bits: usize,
        /// Unread refs
        refs: usize,
    },

    /// Dictionary edge label longer than the remaining key width
    #[error("Invalid dictionary label: length {len} exceeds {max}")]
    InvalidLabel {
        /// Decoded label length
        len: usize,
        /// Remaining key width
        max: usize,
    },

    /// The same key appeared twice in a dictionary
    #[error("Duplicate dictionary key: {0}")]
    DuplicateKey(u64),

    /// A key does not fit the dictionary key width
    #[error("Dictionary key {key} exceeds {bits}-bit width")]
    KeyOutOfRange {
        /// Offending key
        key: u64,
        /// Dictionary key width
        bits: usize,
    },

    /// Key widths must be between 1 and 64 bits
    #[error("Unsupported dictionary key width: {0}")]
    UnsupportedKeyWidth(usize),
}
