/// A value stored in the cells of an [`Octree`](super::Octree).
///
/// Cells must be [`PartialEq`], since eight equal octants merge back into a single value, and
/// [`Clone`], since a value is duplicated when an octant is split.
///
/// One value of the type acts as the "erased" value. Setting a cell to it removes the cell's value:
/// reads return [`None`] and regions holding nothing else collapse to an empty node. Leaf-level
/// nodes use it to fill the cells of a previously empty region.
pub trait Cell: Clone + PartialEq {
    /// Returns the erased value.
    fn erased() -> Self;

    /// Whether `self` is the erased value.
    fn is_erased(&self) -> bool {
        *self == Self::erased()
    }
}

/// Decides which cells are turned into collision cubes by
/// [`Octree::to_boxes`](super::Octree::to_boxes).
pub trait Solid {
    fn is_solid(&self) -> bool;
}

/// A fixed-width binary encoding of a cell, used by the octree byte format.
pub trait PackedCell: Sized {
    /// The number of bytes written by [`PackedCell::pack`].
    const PACKED_LEN: usize;

    /// Appends exactly [`PackedCell::PACKED_LEN`] bytes to `out`.
    fn pack(&self, out: &mut Vec<u8>);

    /// Reads a value back from exactly [`PackedCell::PACKED_LEN`] bytes.
    ///
    /// Returns [`None`] if the bytes do not represent a valid value.
    fn unpack(bytes: &[u8]) -> Option<Self>;
}

impl Cell for bool {
    fn erased() -> Self {
        false
    }
}

impl Solid for bool {
    fn is_solid(&self) -> bool {
        *self
    }
}

impl PackedCell for bool {
    const PACKED_LEN: usize = 1;

    fn pack(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }

    fn unpack(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0] => Some(false),
            [1] => Some(true),
            _ => None,
        }
    }
}

macro_rules! impl_cell_for_uint {
    ( $( $uint:ident ),* ) => { $(
        impl Cell for $uint {
            fn erased() -> Self {
                0
            }
        }

        impl Solid for $uint {
            fn is_solid(&self) -> bool {
                *self != 0
            }
        }

        impl PackedCell for $uint {
            const PACKED_LEN: usize = std::mem::size_of::<$uint>();

            fn pack(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn unpack(bytes: &[u8]) -> Option<Self> {
                Some(Self::from_le_bytes(bytes.try_into().ok()?))
            }
        }
    )* };
}

impl_cell_for_uint!(u8, u16);
