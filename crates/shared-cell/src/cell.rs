//! Immutable cell and its representation hash.
//!
//! The hash of an ordinary cell is
//! `SHA-256(d1 || d2 || padded data || child depths || child hashes)` where
//! `d1` is the ref count and `d2` is `floor(bits/8) + ceil(bits/8)`.
//!
//! Depth and hash are computed once when the cell is built, from the values
//! already stored in its children.

use std::fmt;
use std::sync::Arc;

use bitvec::prelude::*;
use shared_crypto::{Hash, Sha256Hasher};

use crate::slice::CellSlice;

/// Maximum number of data bits in one cell.
pub const MAX_BITS: usize = 1023;

/// Maximum number of child references in one cell.
pub const MAX_REFS: usize = 4;

/// Maximum depth of a cell tree, counted in refs.
pub const MAX_DEPTH: u16 = 1024;

/// A bounded tree node: up to 1023 bits and up to 4 child references.
///
/// Only [`crate::CellBuilder`] constructs cells, so the capacity and depth
/// bounds hold for every `Cell` value.
#[derive(Clone)]
pub struct Cell {
    pub(crate) bits: BitVec<u8, Msb0>,
    pub(crate) refs: Vec<Arc<Cell>>,
    depth: u16,
    hash: Hash,
}

impl Cell {
    /// Seal `bits` and `refs` into a cell. Callers enforce capacity and depth.
    pub(crate) fn new(bits: BitVec<u8, Msb0>, refs: Vec<Arc<Cell>>) -> Self {
        let depth = refs
            .iter()
            .map(|child| child.depth + 1)
            .max()
            .unwrap_or(0);
        let mut cell = Self {
            bits,
            refs,
            depth,
            hash: [0u8; 32],
        };
        cell.hash = cell.compute_hash();
        cell
    }

    /// A cell with no bits and no refs.
    pub fn empty() -> Self {
        Self::new(BitVec::new(), Vec::new())
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Data bits, MSB-first.
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// Child references in order.
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Start reading this cell from the first bit and first ref.
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Longest path to a leaf, counted in refs.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Representation hash.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    fn compute_hash(&self) -> Hash {
        let mut hasher = Sha256Hasher::new();
        hasher.update(&self.descriptors());
        hasher.update(&self.padded_data());
        for child in &self.refs {
            hasher.update(&child.depth.to_be_bytes());
        }
        for child in &self.refs {
            hasher.update(&child.hash);
        }
        hasher.finalize()
    }

    fn descriptors(&self) -> [u8; 2] {
        let bits = self.bits.len();
        let d1 = self.refs.len() as u8;
        let d2 = (bits / 8 + bits.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data bytes with the completion tag appended when the bit length is
    /// not a multiple of eight.
    fn padded_data(&self) -> Vec<u8> {
        let len = self.bits.len();
        let mut bytes = vec![0u8; len.div_ceil(8)];
        for (i, bit) in self.bits.iter().by_vals().enumerate() {
            if bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        if len % 8 != 0 {
            bytes[len / 8] |= 0x80 >> (len % 8);
        }
        bytes
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

// Equal representation hashes mean equal trees.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.bits.len())
            .field("data", &hex::encode(self.padded_data()))
            .field("hash", &hex::encode(self.hash))
            .field("refs", &self.refs.len())
            .finish()
    }
}
