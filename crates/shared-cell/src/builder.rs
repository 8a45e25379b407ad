//! Bounded cell writer.

use std::sync::Arc;

use bitvec::prelude::*;

use crate::cell::{Cell, MAX_BITS, MAX_DEPTH, MAX_REFS};
use crate::errors::CellError;
use crate::slice::CellSlice;

/// Accumulates bits and refs for a new [`Cell`].
///
/// Every store checks capacity first and leaves the builder untouched on
/// failure.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    bits: BitVec<u8, Msb0>,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    pub fn bits_used(&self) -> usize {
        self.bits.len()
    }

    /// Refs attached so far.
    pub fn refs_used(&self) -> usize {
        self.refs.len()
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        let available = MAX_BITS - self.bits.len();
        if requested > available {
            return Err(CellError::BitOverflow {
                requested,
                available,
            });
        }
        Ok(())
    }

    fn ensure_refs(&self, requested: usize) -> Result<(), CellError> {
        if self.refs.len() + requested > MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        Ok(())
    }

    /// Store a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.bits.push(bit);
        Ok(self)
    }

    /// Store `value` as an unsigned big-endian integer of `bits` width.
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CellError> {
        let fits = match bits {
            0 => value == 0,
            1..=63 => value >> bits == 0,
            64 => true,
            _ => false,
        };
        if !fits {
            return Err(CellError::IntegerOverflow { value, bits });
        }
        self.ensure_bits(bits)?;
        for shift in (0..bits).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
        Ok(self)
    }

    /// Store an 8-bit unsigned integer.
    pub fn store_u8(&mut self, value: u8) -> Result<&mut Self, CellError> {
        self.store_uint(u64::from(value), 8)
    }

    /// Store an 8-bit two's complement integer.
    pub fn store_i8(&mut self, value: i8) -> Result<&mut Self, CellError> {
        self.store_uint(u64::from(value as u8), 8)
    }

    /// Store a 16-bit unsigned integer.
    pub fn store_u16(&mut self, value: u16) -> Result<&mut Self, CellError> {
        self.store_uint(u64::from(value), 16)
    }

    /// Store a 32-bit unsigned integer.
    pub fn store_u32(&mut self, value: u32) -> Result<&mut Self, CellError> {
        self.store_uint(u64::from(value), 32)
    }

    /// Store a 64-bit unsigned integer.
    pub fn store_u64(&mut self, value: u64) -> Result<&mut Self, CellError> {
        self.store_uint(value, 64)
    }

    /// Store whole bytes.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        self.bits.extend_from_bitslice(bytes.view_bits::<Msb0>());
        Ok(self)
    }

    /// Store an arbitrary bit string.
    pub fn store_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<&mut Self, CellError> {
        self.ensure_bits(bits.len())?;
        self.bits.extend_from_bitslice(bits);
        Ok(self)
    }

    /// Attach a child reference.
    ///
    /// A child already at [`MAX_DEPTH`] is rejected.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self, CellError> {
        self.ensure_refs(1)?;
        if cell.depth() >= MAX_DEPTH {
            return Err(CellError::DepthOverflow {
                depth: cell.depth(),
                max: MAX_DEPTH,
            });
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Append every bit and ref of `cell` inline.
    pub fn store_cell_contents(&mut self, cell: &Cell) -> Result<&mut Self, CellError> {
        self.ensure_bits(cell.bits.len())?;
        self.ensure_refs(cell.refs.len())?;
        self.bits.extend_from_bitslice(&cell.bits);
        self.refs.extend(cell.refs.iter().cloned());
        Ok(self)
    }

    /// Append the unread remainder of `slice` inline.
    pub fn store_slice(&mut self, slice: &CellSlice<'_>) -> Result<&mut Self, CellError> {
        let bits = slice.remaining_bits();
        let refs = slice.remaining_refs();
        self.ensure_bits(bits.len())?;
        self.ensure_refs(refs.len())?;
        self.bits.extend_from_bitslice(bits);
        self.refs.extend(refs.iter().cloned());
        Ok(self)
    }

    /// Finish the cell.
    pub fn build(self) -> Cell {
        Cell::new(self.bits, self.refs)
    }
}
