//! The binary format of an [`Octree`](super::Octree).
//!
//! | Field | Size | Content |
//! |-------|------|---------|
//! | header | 2 | size of the octree (`u16`, little-endian) |
//! | body | variable | root node |
//!
//! Nodes are written in pre-order, starting with a tag byte:
//!
//! - `E`: an empty node without payload.
//! - `F`: a full node, followed by one packed value.
//! - `P`: a partial node. At size `2` it is followed by the 8 packed cell values, otherwise by its 8
//!   octants as nodes.
//!
//! Cells and octants are always written in [`Corner3`] index order.

use enum_map::{Enum, EnumMap};
use thiserror::Error;
use tracing::debug;

use super::{
    cell::{Cell, PackedCell},
    node::Node,
};
use crate::math_enums::Corner3;

const HEADER_LEN: usize = 2;

const TAG_EMPTY: u8 = b'E';
const TAG_FULL: u8 = b'F';
const TAG_PARTIAL: u8 = b'P';

/// Errors that can occur when decoding an [`Octree`](super::Octree) from bytes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The header does not hold a power of two of at least `2`.
    #[error("invalid octree size: {0}")]
    InvalidSize(u16),
    /// A node starts with an unknown tag byte.
    #[error("malformed node tag {tag:#04x} at offset {offset}")]
    MalformedTag {
        /// The byte that was read instead of a tag.
        tag: u8,
        /// Position of the tag within the buffer.
        offset: usize,
    },
    /// The buffer ended before the octree was complete.
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Number of bytes required to read the next field.
        expected: usize,
        /// Actual length of the buffer.
        actual: usize,
    },
    /// A packed value was rejected by the cell type.
    #[error("invalid cell value at offset {offset}")]
    InvalidValue {
        /// Position of the value within the buffer.
        offset: usize,
    },
    /// The buffer continues after the root node ended.
    #[error("{count} trailing bytes after octree")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },
}

pub(super) fn encode<T: PackedCell>(size: u32, root: &Node<T>) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 1 + T::PACKED_LEN);
    // sizes are capped at `u16` range on construction
    out.extend_from_slice(&(size as u16).to_le_bytes());
    encode_node(root, &mut out);
    out
}

fn encode_node<T: PackedCell>(node: &Node<T>, out: &mut Vec<u8>) {
    match node {
        Node::Empty => out.push(TAG_EMPTY),
        Node::Full(value) => {
            out.push(TAG_FULL);
            value.pack(out);
        }
        Node::Leaves(cells) => {
            out.push(TAG_PARTIAL);
            for value in cells.values() {
                value.pack(out);
            }
        }
        Node::Split(octants) => {
            out.push(TAG_PARTIAL);
            for node in octants.values() {
                encode_node(node, out);
            }
        }
    }
}

pub(super) fn decode<T: Cell + PackedCell>(bytes: &[u8]) -> Result<(u32, Node<T>), DecodeError> {
    let mut reader = Reader { bytes, offset: 0 };

    let header = reader.take(HEADER_LEN)?;
    let size = u16::from_le_bytes([header[0], header[1]]);
    if size < 2 || !size.is_power_of_two() {
        return Err(DecodeError::InvalidSize(size));
    }
    let size = u32::from(size);

    let root = reader.node(size)?;

    let count = reader.remaining();
    if count != 0 {
        return Err(DecodeError::TrailingBytes { count });
    }
    Ok((size, root))
}

/// A cursor over a byte buffer that never reads past its end.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Returns the next `len` bytes and advances past them.
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.offset + len;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(DecodeError::Truncated {
                expected: end,
                actual: self.bytes.len(),
            })?;
        self.offset = end;
        Ok(slice)
    }

    fn value<T: PackedCell>(&mut self) -> Result<T, DecodeError> {
        let offset = self.offset;
        T::unpack(self.take(T::PACKED_LEN)?).ok_or(DecodeError::InvalidValue { offset })
    }

    fn node<T: Cell + PackedCell>(&mut self, size: u32) -> Result<Node<T>, DecodeError> {
        let offset = self.offset;
        let tag = self.take(1)?[0];
        match tag {
            TAG_EMPTY => Ok(Node::Empty),
            TAG_FULL => {
                let value = self.value::<T>()?;
                if value.is_erased() {
                    debug!(offset, "decoded full node with erased value as empty");
                    return Ok(Node::Empty);
                }
                Ok(Node::Full(value))
            }
            TAG_PARTIAL => {
                let mut node = if size == 2 {
                    let cells: [T; Corner3::LENGTH] = array_init::try_array_init(|_| self.value())?;
                    Node::Leaves(Box::new(EnumMap::from_array(cells)))
                } else {
                    let octants: [Node<T>; Corner3::LENGTH] =
                        array_init::try_array_init(|_| self.node(size / 2))?;
                    Node::Split(Box::new(EnumMap::from_array(octants)))
                };
                if node.merge() {
                    debug!(offset, size, "merged decoded partial node");
                }
                Ok(node)
            }
            tag => Err(DecodeError::MalformedTag { tag, offset }),
        }
    }
}
