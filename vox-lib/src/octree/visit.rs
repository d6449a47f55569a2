use std::marker::PhantomData;

use super::{cell::Solid, cube::Cube};

/// A visitor for an [`Octree`](super::Octree).
///
/// Traversal is depth-first with octants in index order. Empty regions are skipped entirely.
pub trait OctreeVisitor {
    /// The type of the value stored in the octree.
    type Value;

    /// Called for each region that holds a single value.
    ///
    /// This is either a full node or a single cell on the leaf level.
    fn visit_value(&mut self, bounds: Cube, value: &Self::Value);

    /// Called when a split was encountered, i.e. a region holding more than one value.
    ///
    /// Returns whether the split should be entered or skipped.
    fn visit_split(&mut self, _bounds: Cube) -> VisitSplit {
        VisitSplit::Enter
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum VisitSplit {
    Skip,
    Enter,
}

/// Collects a [`Cube`] for every solid region.
pub(crate) struct SolidCubes<T> {
    pub(crate) cubes: Vec<Cube>,
    _value: PhantomData<fn(&T)>,
}

impl<T> SolidCubes<T> {
    pub(crate) fn new() -> Self {
        Self {
            cubes: Vec::new(),
            _value: PhantomData,
        }
    }
}

impl<T: Solid> OctreeVisitor for SolidCubes<T> {
    type Value = T;

    fn visit_value(&mut self, bounds: Cube, value: &T) {
        if value.is_solid() {
            self.cubes.push(bounds);
        }
    }
}
