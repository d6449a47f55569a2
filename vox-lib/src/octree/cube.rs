use glam::{IVec3, Vec3};

use super::octant;
use crate::math_enums::Corner3;

/// An axis-aligned cube within an octree, in the octree's centered coordinate frame.
///
/// Describes the area covered by a node, and is what [`Octree::to_boxes`](super::Octree::to_boxes)
/// emits for solid regions.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Cube {
    /// The minimum corner of the cube (inclusive).
    pub origin: IVec3,
    /// The edge length of the cube, always a power of two.
    pub size: u32,
}

impl Cube {
    pub const fn new(origin: IVec3, size: u32) -> Self {
        Self { origin, size }
    }

    /// Returns the cube covering a whole centered octree of the given `size`.
    pub fn root(size: u32) -> Self {
        Self::new(IVec3::splat(-((size / 2) as i32)), size)
    }

    /// The maximum corner of the cube (exclusive).
    pub fn max(self) -> IVec3 {
        self.origin + IVec3::splat(self.size as i32)
    }

    /// The number of unit cells covered by the cube.
    pub fn volume(self) -> u64 {
        u64::from(self.size).pow(3)
    }

    pub fn contains(self, pos: IVec3) -> bool {
        pos.cmpge(self.origin).all() && pos.cmplt(self.max()).all()
    }

    /// Whether the two cubes share any cells.
    pub fn overlaps(self, other: Self) -> bool {
        self.origin.cmplt(other.max()).all() && other.origin.cmplt(self.max()).all()
    }

    pub fn center(self) -> Vec3 {
        self.origin.as_vec3() + Vec3::splat(self.half_extent())
    }

    pub fn half_extent(self) -> f32 {
        self.size as f32 / 2.0
    }

    /// Returns the octant of this cube at the given corner.
    ///
    /// # Panics
    ///
    /// Panics if the cube is a single unit cell.
    pub fn child(self, corner: Corner3) -> Self {
        assert!(self.size >= 2, "unit cubes cannot be split");
        Self::new(
            octant::child_min(self.origin, corner, self.size),
            self.size / 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_centered() {
        let cube = Cube::root(32);
        assert_eq!(cube.origin, IVec3::splat(-16));
        assert_eq!(cube.max(), IVec3::splat(16));
        assert_eq!(cube.center(), Vec3::ZERO);
        assert_eq!(cube.volume(), 32 * 32 * 32);
    }

    #[test]
    fn children_tile_parent() {
        let parent = Cube::root(8);
        let children = enum_map::EnumMap::<Corner3, Cube>::from_fn(|corner| parent.child(corner));
        let volume: u64 = children.values().map(|child| child.volume()).sum();
        assert_eq!(volume, parent.volume());
        for (a, first) in &children {
            for (b, second) in &children {
                assert_eq!(a == b, first.overlaps(*second), "{a:?} {b:?}");
            }
        }
        assert_eq!(children[Corner3::X1Y0Z0].origin, IVec3::new(0, -4, -4));
    }

    #[test]
    fn unit_cube_center() {
        let cube = Cube::new(IVec3::new(-1, 0, 3), 1);
        assert_eq!(cube.center(), Vec3::new(-0.5, 0.5, 3.5));
        assert!(cube.contains(IVec3::new(-1, 0, 3)));
        assert!(!cube.contains(IVec3::new(0, 0, 3)));
    }
}
