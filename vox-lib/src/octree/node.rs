use derive_where::derive_where;
use enum_map::EnumMap;
use glam::IVec3;
use itertools::Itertools;
use replace_with::replace_with_or_abort;

use super::{
    cell::Cell,
    cube::Cube,
    octant,
    visit::{OctreeVisitor, VisitSplit},
};
use crate::math_enums::Corner3;

/// A node within an octree covering a cube of some power-of-two size.
///
/// The size is not stored in the node itself; it is passed down during traversal instead.
///
/// Invariants:
///
/// - [`Node::Split`] only occurs for sizes greater than `2`, [`Node::Leaves`] only for size `2`.
/// - [`Node::Full`] never holds the [erased](Cell::erased) value.
/// - The octants of a split are never all empty or all full with the same value, and the cells of
///   a [`Node::Leaves`] are never all equal. Such nodes are merged as soon as they occur.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[derive_where(Default)]
pub(crate) enum Node<T> {
    /// No cell in the region holds a value.
    #[derive_where(default)]
    Empty,
    /// Every cell in the region holds the same value.
    Full(T),
    /// A region split into 8 octants which are nodes themselves.
    Split(Box<Octants<T>>),
    /// A region of size `2`, split into its 8 cells.
    Leaves(Box<Cells<T>>),
}

pub(crate) type Octants<T> = EnumMap<Corner3, Node<T>>;

pub(crate) type Cells<T> = EnumMap<Corner3, T>;

impl<T> Node<T> {
    /// Whether the region holds more than one value.
    pub(crate) fn is_partial(&self) -> bool {
        matches!(self, Self::Split(_) | Self::Leaves(_))
    }

    /// The number of nodes in this subtree, counting the cells of [`Node::Leaves`] as part of it.
    pub(crate) fn count(&self) -> usize {
        match self {
            Self::Empty | Self::Full(_) | Self::Leaves(_) => 1,
            Self::Split(octants) => 1 + octants.values().map(Self::count).sum::<usize>(),
        }
    }

    /// Returns the value shared by all cells of a homogeneous node.
    ///
    /// `Some(None)` stands for an empty node, [`None`] for a partial one.
    fn uniform_value(&self) -> Option<Option<&T>> {
        match self {
            Self::Empty => Some(None),
            Self::Full(value) => Some(Some(value)),
            Self::Split(_) | Self::Leaves(_) => None,
        }
    }
}

impl<T: Cell> Node<T> {
    /// Constructs a homogeneous node, which is empty for [`None`] and the erased value.
    pub(crate) fn uniform(value: Option<T>) -> Self {
        match value {
            Some(value) if !value.is_erased() => Self::Full(value),
            _ => Self::Empty,
        }
    }

    /// Returns the value at `pos` within a node of the given `size`.
    ///
    /// Returns [`None`] if the cell holds no value.
    pub(crate) fn get(&self, mut pos: IVec3, mut size: u32) -> Option<&T> {
        let mut current = self;
        loop {
            match current {
                Self::Empty => break None,
                Self::Full(value) => break Some(value),
                Self::Leaves(cells) => {
                    let value = &cells[Corner3::from_offset(pos)];
                    break (!value.is_erased()).then_some(value);
                }
                Self::Split(octants) => {
                    let (corner, child_pos) = octant::child_offset(pos, size);
                    current = &octants[corner];
                    pos = child_pos;
                    size /= 2;
                }
            }
        }
    }

    /// Sets the cell at `pos` within a node of the given `size` to `value`.
    ///
    /// Splits homogeneous nodes as needed and merges octants that end up holding the same value.
    pub(crate) fn set(&mut self, pos: IVec3, size: u32, value: T) {
        match self {
            Self::Empty => {
                if value.is_erased() {
                    return;
                }
                *self = if size == 2 {
                    Self::Leaves(Box::new(EnumMap::from_fn(|_| T::erased())))
                } else {
                    Self::Split(Box::default())
                };
                self.set(pos, size, value);
            }
            Self::Full(existing) => {
                if *existing == value {
                    return;
                }
                replace_with_or_abort(self, |node| match node {
                    Self::Full(existing) => Self::expand(existing, size),
                    node => node,
                });
                self.set(pos, size, value);
            }
            Self::Leaves(cells) => {
                cells[Corner3::from_offset(pos)] = value;
                self.merge();
            }
            Self::Split(octants) => {
                let (corner, child_pos) = octant::child_offset(pos, size);
                let child = &mut octants[corner];
                child.set(child_pos, size / 2, value);
                // a child that is still split cannot complete a merge
                if !child.is_partial() {
                    self.merge();
                }
            }
        }
    }

    /// Returns a partial node of the given `size` whose 8 octants all hold `value`.
    ///
    /// The result is not merged, so it only stays valid once one of the octants is changed.
    fn expand(value: T, size: u32) -> Self {
        if size == 2 {
            Self::Leaves(Box::new(EnumMap::from_fn(|_| value.clone())))
        } else {
            Self::Split(Box::new(EnumMap::from_fn(|_| Self::Full(value.clone()))))
        }
    }

    /// Merges a partial node into a homogeneous one if all its octants hold the same value.
    ///
    /// Returns whether the node was merged.
    pub(crate) fn merge(&mut self) -> bool {
        let merged = match self {
            Self::Split(octants) => {
                match octants.values().map(Self::uniform_value).all_equal_value() {
                    Ok(Some(value)) => value.cloned(),
                    _ => return false,
                }
            }
            Self::Leaves(cells) => match cells.values().all_equal_value() {
                Ok(value) => Some(value.clone()),
                Err(_) => return false,
            },
            Self::Empty | Self::Full(_) => return false,
        };
        *self = Self::uniform(merged);
        true
    }

    /// Recursively visits all non-empty regions using the given `visitor`.
    pub(crate) fn visit(&self, visitor: &mut impl OctreeVisitor<Value = T>, bounds: Cube) {
        match self {
            Self::Empty => {}
            Self::Full(value) => visitor.visit_value(bounds, value),
            Self::Leaves(cells) => {
                if let VisitSplit::Enter = visitor.visit_split(bounds) {
                    for (corner, value) in cells.iter() {
                        if !value.is_erased() {
                            visitor.visit_value(bounds.child(corner), value);
                        }
                    }
                }
            }
            Self::Split(octants) => {
                if let VisitSplit::Enter = visitor.visit_split(bounds) {
                    for (corner, node) in octants.iter() {
                        node.visit(visitor, bounds.child(corner));
                    }
                }
            }
        }
    }
}
