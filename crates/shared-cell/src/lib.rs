//! # Shared Cell
//!
//! The cell tree every wallet message is serialized into.
//!
//! A [`Cell`] holds at most [`MAX_BITS`] data bits and at most [`MAX_REFS`]
//! child references, and a tree is at most [`MAX_DEPTH`] refs deep. Cells
//! are immutable once built: children are shared through `Arc`, so a tree is
//! acyclic by construction and can be hashed and re-serialized without
//! coordination.
//!
//! - [`CellBuilder`]: bounded writer, every store is checked against capacity
//! - [`CellSlice`]: bounded reader, tracks unread bits and refs
//! - [`dictionary`]: `HashmapE` key/value dictionaries stored as binary tries
//!
//! ## Invariants
//!
//! - Bits are written and read MSB-first
//! - Reading never mutates the source cell

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cell;
pub mod dictionary;
pub mod errors;
pub mod slice;

pub use bitvec::prelude::{BitSlice, BitVec, Msb0};
pub use builder::CellBuilder;
pub use cell::{Cell, MAX_BITS, MAX_DEPTH, MAX_REFS};
pub use errors::CellError;
pub use shared_crypto::Hash;
pub use slice::CellSlice;
