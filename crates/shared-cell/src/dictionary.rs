//! `HashmapE` dictionaries with fixed-width unsigned keys.
//!
//! A non-empty dictionary is a binary Patricia trie. Every node starts with
//! an edge label holding the key bits shared by all entries below it, then
//! either the leaf value (when no key bits remain) or two refs for the `0`
//! and `1` branches.
//!
//! ```text
//! hml_short$0  len:(Unary ~n) s:(n * Bit)
//! hml_long$10  n:(#<= m) s:(n * Bit)
//! hml_same$11  v:Bit n:(#<= m)
//! hme_empty$0 | hme_root$1 root:^(Hashmap n X)
//! ```
//!
//! Values are arbitrary cell contents stored inline in the leaf.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::errors::CellError;
use crate::slice::CellSlice;

fn mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Width of the `#<= max` length field.
fn length_width(max: usize) -> usize {
    (usize::BITS - max.leading_zeros()) as usize
}

fn check_key_width(key_bits: usize) -> Result<(), CellError> {
    if key_bits == 0 || key_bits > 64 {
        return Err(CellError::UnsupportedKeyWidth(key_bits));
    }
    Ok(())
}

/// Serialize `entries` as a `HashmapE`: a `0` bit when empty, otherwise a
/// `1` bit and a ref to the trie root.
pub fn store_hashmap_e(
    builder: &mut CellBuilder,
    key_bits: usize,
    entries: &BTreeMap<u64, Cell>,
) -> Result<(), CellError> {
    match build_hashmap(key_bits, entries)? {
        None => {
            builder.store_bit(false)?;
        }
        Some(root) => {
            builder.store_bit(true)?;
            builder.store_ref(Arc::new(root))?;
        }
    }
    Ok(())
}

/// Read a `HashmapE` written by [`store_hashmap_e`].
pub fn load_hashmap_e(
    slice: &mut CellSlice<'_>,
    key_bits: usize,
) -> Result<BTreeMap<u64, Cell>, CellError> {
    check_key_width(key_bits)?;
    if !slice.load_bit()? {
        return Ok(BTreeMap::new());
    }
    let root = slice.load_ref()?;
    parse_hashmap(&root, key_bits)
}

/// Build the trie root for a non-empty dictionary. Returns `None` when
/// `entries` is empty, since a bare `Hashmap` cannot be empty.
pub fn build_hashmap(
    key_bits: usize,
    entries: &BTreeMap<u64, Cell>,
) -> Result<Option<Cell>, CellError> {
    check_key_width(key_bits)?;
    if let Some((&key, _)) = entries.iter().find(|(key, _)| **key > mask(key_bits)) {
        return Err(CellError::KeyOutOfRange { key, bits: key_bits });
    }
    if entries.is_empty() {
        return Ok(None);
    }
    let sorted: Vec<(u64, &Cell)> = entries.iter().map(|(&k, v)| (k, v)).collect();
    build_edge(&sorted, key_bits).map(Some)
}

/// `entries` is sorted, non-empty, and every key agrees on the bits above
/// the low `n`.
fn build_edge(entries: &[(u64, &Cell)], n: usize) -> Result<Cell, CellError> {
    let first = entries[0].0 & mask(n);
    let last = entries[entries.len() - 1].0 & mask(n);

    let prefix_len = match first ^ last {
        0 => n,
        diff => n - 1 - (63 - diff.leading_zeros() as usize),
    };
    let label = first.checked_shr((n - prefix_len) as u32).unwrap_or(0) & mask(prefix_len);

    let mut builder = CellBuilder::new();
    store_label(&mut builder, label, prefix_len, n)?;

    let remaining = n - prefix_len;
    if remaining == 0 {
        // Keys are distinct, so a full-width prefix means a single entry.
        builder.store_cell_contents(entries[0].1)?;
    } else {
        let branch_bit = remaining - 1;
        let split = entries.partition_point(|(key, _)| (key >> branch_bit) & 1 == 0);
        let left = build_edge(&entries[..split], branch_bit)?;
        let right = build_edge(&entries[split..], branch_bit)?;
        builder.store_ref(Arc::new(left))?;
        builder.store_ref(Arc::new(right))?;
    }
    Ok(builder.build())
}

/// Write the cheapest of the three label encodings.
fn store_label(
    builder: &mut CellBuilder,
    label: u64,
    len: usize,
    max: usize,
) -> Result<(), CellError> {
    let width = length_width(max);
    let short_cost = 2 * len + 2;
    let long_cost = 2 + width + len;
    let uniform = len > 0 && (label == 0 || label == mask(len));
    let same_cost = 3 + width;

    if uniform && same_cost < short_cost && same_cost < long_cost {
        builder.store_bit(true)?.store_bit(true)?;
        builder.store_bit(label != 0)?;
        builder.store_uint(len as u64, width)?;
    } else if long_cost < short_cost {
        builder.store_bit(true)?.store_bit(false)?;
        builder.store_uint(len as u64, width)?;
        builder.store_uint(label, len)?;
    } else {
        builder.store_bit(false)?;
        for _ in 0..len {
            builder.store_bit(true)?;
        }
        builder.store_bit(false)?;
        builder.store_uint(label, len)?;
    }
    Ok(())
}

/// Read a label of at most `max` bits, returning `(bits, length)`.
fn load_label(slice: &mut CellSlice<'_>, max: usize) -> Result<(u64, usize), CellError> {
    let width = length_width(max);
    let len;
    let value;
    if !slice.load_bit()? {
        let mut unary = 0;
        while slice.load_bit()? {
            unary += 1;
            if unary > max {
                return Err(CellError::InvalidLabel { len: unary, max });
            }
        }
        len = unary;
        value = slice.load_uint(len)?;
    } else if !slice.load_bit()? {
        len = slice.load_uint(width)? as usize;
        if len > max {
            return Err(CellError::InvalidLabel { len, max });
        }
        value = slice.load_uint(len)?;
    } else {
        let bit = slice.load_bit()?;
        len = slice.load_uint(width)? as usize;
        if len > max {
            return Err(CellError::InvalidLabel { len, max });
        }
        value = if bit { mask(len) } else { 0 };
    }
    Ok((value, len))
}

/// Read every entry of the trie rooted at `root`, keyed by full key value.
pub fn parse_hashmap(root: &Cell, key_bits: usize) -> Result<BTreeMap<u64, Cell>, CellError> {
    check_key_width(key_bits)?;
    let mut entries = BTreeMap::new();
    parse_edge(root, key_bits, 0, &mut entries)?;
    Ok(entries)
}

fn parse_edge(
    cell: &Cell,
    n: usize,
    prefix: u64,
    entries: &mut BTreeMap<u64, Cell>,
) -> Result<(), CellError> {
    let mut slice = cell.parse();
    let (label, len) = load_label(&mut slice, n)?;
    let key = prefix.checked_shl(len as u32).unwrap_or(0) | label;

    let remaining = n - len;
    if remaining == 0 {
        if entries.insert(key, slice.to_cell()).is_some() {
            return Err(CellError::DuplicateKey(key));
        }
        return Ok(());
    }

    let left = slice.load_ref()?;
    let right = slice.load_ref()?;
    slice.ensure_empty()?;
    parse_edge(&left, remaining - 1, key << 1, entries)?;
    parse_edge(&right, remaining - 1, (key << 1) | 1, entries)
}
