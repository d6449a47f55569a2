pub mod cell;
mod codec;
pub mod cube;
mod node;
mod octant;
pub mod visit;

use derive_where::derive_where;
use glam::IVec3;
use thiserror::Error;
use tracing::{debug, trace};

use cell::{Cell, PackedCell, Solid};
pub use codec::DecodeError;
use cube::Cube;
use node::Node;
use visit::{OctreeVisitor, SolidCubes};

/// A sparse octree storing one value of type `T` per unit cell of a cube.
///
/// The cube has a power-of-two edge length and is addressed in a frame centered on the cube, so
/// valid coordinates are `[-size/2, size/2)` on each axis.
///
/// Regions holding the same value are merged into a single node as soon as they occur, which keeps
/// the tree maximally compressed after every modification.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Octree<T> {
    size: u32,
    root: Node<T>,
}

/// The state of the root node of an [`Octree`].
#[derive(Debug, PartialEq, Eq)]
#[derive_where(Clone, Copy)]
pub enum NodeState<'a, T> {
    /// No cell holds a value.
    Empty,
    /// Every cell holds the same value.
    Full(&'a T),
    /// The octree holds more than one value.
    Partial,
}

/// A position lies outside of an [`Octree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("position {pos} is out of bounds for an octree of size {size}")]
pub struct OutOfBounds {
    pub pos: IVec3,
    pub size: u32,
}

impl<T> Octree<T> {
    /// The largest supported size, limited by the size header of the byte format.
    pub const MAX_SIZE: u32 = 1 << 15;

    /// Creates an empty octree with the given edge length.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two in `2..=`[`Octree::MAX_SIZE`].
    pub fn new(size: u32) -> Self {
        assert!(
            size >= 2 && size <= Self::MAX_SIZE && size.is_power_of_two(),
            "octree size must be a power of two in 2..={}, got {size}",
            Self::MAX_SIZE
        );
        Self {
            size,
            root: Node::Empty,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn half_size(&self) -> u32 {
        self.size / 2
    }

    /// Whether `pos` lies within the bounds of the octree.
    pub fn contains(&self, pos: IVec3) -> bool {
        octant::contains(pos, self.size)
    }

    /// The cube covered by the whole octree.
    pub fn bounds(&self) -> Cube {
        Cube::root(self.size)
    }

    pub fn state(&self) -> NodeState<'_, T> {
        match &self.root {
            Node::Empty => NodeState::Empty,
            Node::Full(value) => NodeState::Full(value),
            Node::Split(_) | Node::Leaves(_) => NodeState::Partial,
        }
    }

    /// The number of nodes making up the octree.
    ///
    /// Homogeneous nodes count as one. A split counts as one plus its octants, while the 8 cells of
    /// a split on the leaf level are stored inline and count as a single node.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Removes all values.
    pub fn clear(&mut self) {
        self.root = Node::Empty;
    }

    fn check_bounds(&self, pos: IVec3) -> Result<(), OutOfBounds> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(OutOfBounds {
                pos,
                size: self.size,
            })
        }
    }
}

impl<T: Cell> Octree<T> {
    /// Creates an octree with every cell set to `value`.
    ///
    /// The octree is empty if `value` is [erased](Cell::erased).
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Octree::new`].
    pub fn new_full(size: u32, value: T) -> Self {
        let mut octree = Self::new(size);
        octree.fill(value);
        octree
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.root = Node::uniform(Some(value));
    }

    /// Returns the value at `pos`.
    ///
    /// Returns [`None`] if the cell holds no value.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn get(&self, pos: IVec3) -> Option<&T> {
        match self.try_get(pos) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns the value at `pos` or an error if `pos` is out of bounds.
    pub fn try_get(&self, pos: IVec3) -> Result<Option<&T>, OutOfBounds> {
        self.check_bounds(pos)?;
        Ok(self.root.get(pos, self.size))
    }

    /// Sets the cell at `pos` to `value`.
    ///
    /// Setting the [erased](Cell::erased) value removes the value of the cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn set(&mut self, pos: IVec3, value: T) {
        if let Err(error) = self.try_set(pos, value) {
            panic!("{error}");
        }
    }

    /// Sets the cell at `pos` to `value` or returns an error if `pos` is out of bounds.
    pub fn try_set(&mut self, pos: IVec3, value: T) -> Result<(), OutOfBounds> {
        self.check_bounds(pos)?;
        let was_partial = self.root.is_partial();
        self.root.set(pos, self.size, value);
        match (was_partial, self.root.is_partial()) {
            (false, true) => trace!(size = self.size, "expanded octree root"),
            (true, false) => trace!(size = self.size, "collapsed octree root"),
            _ => {}
        }
        Ok(())
    }

    /// Visits all regions holding a value, see [`OctreeVisitor`].
    pub fn visit(&self, visitor: &mut impl OctreeVisitor<Value = T>) {
        self.root.visit(visitor, self.bounds());
    }

    /// Returns the cubes covering all [solid](Solid) cells.
    ///
    /// Every homogeneous region is emitted as a single cube, so the result is as coarse as the
    /// octree itself. Cubes never overlap and are returned in depth-first octant order.
    pub fn to_boxes(&self) -> Vec<Cube>
    where
        T: Solid,
    {
        let mut cubes = SolidCubes::new();
        self.visit(&mut cubes);
        cubes.cubes
    }
}

impl<T: PackedCell> Octree<T> {
    /// Encodes the octree into its byte format, see [`Octree::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self.size, &self.root)
    }
}

impl<T: Cell + PackedCell> Octree<T> {
    /// Decodes an octree previously encoded with [`Octree::to_bytes`].
    ///
    /// Any accepted input results in a fully merged octree, even if the encoded nodes were not.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (size, root) = codec::decode(bytes).inspect_err(|error| {
            debug!(%error, len = bytes.len(), "failed to decode octree");
        })?;
        Ok(Self { size, root })
    }
}
