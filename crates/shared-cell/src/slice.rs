//! Bounded cell reader.

use std::sync::Arc;

use bitvec::prelude::*;

use crate::cell::Cell;
use crate::errors::CellError;

/// Read cursor over a [`Cell`].
///
/// Bits and refs are consumed independently, each from the front.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    /// Start reading `cell` from the beginning.
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Unread bits.
    pub fn bits_remaining(&self) -> usize {
        self.cell.bits.len() - self.bit_pos
    }

    /// Unread refs.
    pub fn refs_remaining(&self) -> usize {
        self.cell.refs.len() - self.ref_pos
    }

    /// True when no bits and no refs remain.
    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0 && self.refs_remaining() == 0
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        let available = self.bits_remaining();
        if requested > available {
            return Err(CellError::NotEnoughBits {
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Read `count` bits without interpreting them.
    pub fn load_bits(&mut self, count: usize) -> Result<&'a BitSlice<u8, Msb0>, CellError> {
        self.ensure_bits(count)?;
        let cell: &'a Cell = self.cell;
        let bits = &cell.bits[self.bit_pos..self.bit_pos + count];
        self.bit_pos += count;
        Ok(bits)
    }

    /// Read one bit.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        let bit = self.cell.bits[self.bit_pos];
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read an unsigned big-endian integer of `bits` width (at most 64).
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CellError> {
        if bits > 64 {
            return Err(CellError::IntegerOverflow { value: 0, bits });
        }
        let raw = self.load_bits(bits)?;
        Ok(raw
            .iter()
            .by_vals()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit)))
    }

    /// Read an 8-bit unsigned integer.
    pub fn load_u8(&mut self) -> Result<u8, CellError> {
        Ok(self.load_uint(8)? as u8)
    }

    /// Read an 8-bit two's complement integer.
    pub fn load_i8(&mut self) -> Result<i8, CellError> {
        Ok(self.load_u8()? as i8)
    }

    /// Read a 16-bit unsigned integer.
    pub fn load_u16(&mut self) -> Result<u16, CellError> {
        Ok(self.load_uint(16)? as u16)
    }

    /// Read a 32-bit unsigned integer.
    pub fn load_u32(&mut self) -> Result<u32, CellError> {
        Ok(self.load_uint(32)? as u32)
    }

    /// Read a 64-bit unsigned integer.
    pub fn load_u64(&mut self) -> Result<u64, CellError> {
        self.load_uint(64)
    }

    /// Read `N` whole bytes.
    pub fn load_bytes<const N: usize>(&mut self) -> Result<[u8; N], CellError> {
        let raw = self.load_bits(N * 8)?;
        let mut out = [0u8; N];
        for (byte, chunk) in out.iter_mut().zip(raw.chunks(8)) {
            *byte = chunk
                .iter()
                .by_vals()
                .fold(0u8, |acc, bit| (acc << 1) | u8::from(bit));
        }
        Ok(out)
    }

    /// Take the next child reference.
    pub fn load_ref(&mut self) -> Result<Arc<Cell>, CellError> {
        let child = self
            .cell
            .refs
            .get(self.ref_pos)
            .cloned()
            .ok_or(CellError::NotEnoughRefs)?;
        self.ref_pos += 1;
        Ok(child)
    }

    /// Unread bits, without consuming them.
    pub fn remaining_bits(&self) -> &'a BitSlice<u8, Msb0> {
        let cell: &'a Cell = self.cell;
        &cell.bits[self.bit_pos..]
    }

    /// Unread refs, without consuming them.
    pub fn remaining_refs(&self) -> &'a [Arc<Cell>] {
        let cell: &'a Cell = self.cell;
        &cell.refs[self.ref_pos..]
    }

    /// Copy the unread remainder into a fresh cell.
    ///
    /// The remainder of a cell is within that cell's bounds, so no capacity
    /// check applies.
    pub fn to_cell(&self) -> Cell {
        Cell::new(
            self.remaining_bits().to_bitvec(),
            self.remaining_refs().to_vec(),
        )
    }

    /// Fail unless every bit and ref has been consumed.
    pub fn ensure_empty(&self) -> Result<(), CellError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(CellError::TrailingData {
            bits: self.bits_remaining(),
            refs: self.refs_remaining(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CellBuilder;

    fn sample() -> Cell {
        let mut builder = CellBuilder::new();
        builder
            .store_u32(0xDEAD_BEEF)
            .unwrap()
            .store_bit(true)
            .unwrap()
            .store_i8(-3)
            .unwrap();
        builder.store_ref(Arc::new(Cell::empty())).unwrap();
        builder.build()
    }

    #[test]
    fn test_reads_in_write_order() {
        let cell = sample();
        let mut slice = cell.parse();

        assert_eq!(slice.load_u32().unwrap(), 0xDEAD_BEEF);
        assert!(slice.load_bit().unwrap());
        assert_eq!(slice.load_i8().unwrap(), -3);
        assert_eq!(slice.bits_remaining(), 0);
        assert_eq!(slice.refs_remaining(), 1);

        slice.load_ref().unwrap();
        assert!(slice.ensure_empty().is_ok());
    }

    #[test]
    fn test_not_enough_bits() {
        let cell = sample();
        let mut slice = cell.parse();
        slice.load_u32().unwrap();

        assert_eq!(
            slice.load_u32(),
            Err(CellError::NotEnoughBits {
                requested: 32,
                available: 9
            })
        );
        // failed read consumes nothing
        assert_eq!(slice.bits_remaining(), 9);
    }

    #[test]
    fn test_not_enough_refs() {
        let cell = Cell::empty();
        let mut slice = cell.parse();
        assert_eq!(slice.load_ref().err(), Some(CellError::NotEnoughRefs));
    }

    #[test]
    fn test_load_bytes() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(&[1, 2, 3]).unwrap();
        let cell = builder.build();

        let bytes: [u8; 3] = cell.parse().load_bytes().unwrap();
        assert_eq!(bytes, [1, 2, 3]);
    }

    #[test]
    fn test_trailing_data_reported() {
        let cell = sample();
        let mut slice = cell.parse();
        slice.load_u32().unwrap();

        assert_eq!(
            slice.ensure_empty(),
            Err(CellError::TrailingData { bits: 9, refs: 1 })
        );
    }

    #[test]
    fn test_to_cell_copies_unread_remainder() {
        let cell = sample();
        let mut slice = cell.parse();
        slice.load_u32().unwrap();

        let rest = slice.to_cell();
        assert_eq!(rest.bit_len(), 9);
        assert_eq!(rest.refs(), cell.refs());

        let mut expected = CellBuilder::new();
        expected.store_bit(true).unwrap().store_i8(-3).unwrap();
        expected.store_ref(Arc::new(Cell::empty())).unwrap();
        assert_eq!(rest, expected.build());
    }

    #[test]
    fn test_reading_does_not_mutate_source() {
        let cell = sample();
        let before = cell.hash();

        let mut slice = cell.parse();
        slice.load_u32().unwrap();
        slice.load_ref().unwrap();

        assert_eq!(cell.hash(), before);
        assert_eq!(cell.parse().bits_remaining(), 41);
    }
}
