use glam::IVec3;

use crate::math_enums::Corner3;

/// Returns the octant containing `pos` along with `pos` translated into that octant's own frame.
///
/// Nodes are addressed relative to their own center, so the octant's frame is shifted by `size/4`
/// towards the octant.
///
/// `size` is the edge length of the node that `pos` is relative to and must be at least `4`, since
/// nodes of size `2` have no nested frames.
pub(crate) fn child_offset(pos: IVec3, size: u32) -> (Corner3, IVec3) {
    debug_assert!(size >= 4, "nodes of size {size} have no child frames");
    let corner = Corner3::from_offset(pos);
    let quarter = quarter(size);
    (corner, pos - corner.sign() * quarter)
}

/// Returns the minimum corner of the child at `corner`, given the minimum corner of its parent.
pub(crate) fn child_min(min: IVec3, corner: Corner3, size: u32) -> IVec3 {
    min + IVec3::from(corner) * half(size)
}

/// Whether `pos` lies within a centered node of the given `size`.
pub(crate) fn contains(pos: IVec3, size: u32) -> bool {
    let half = half(size);
    pos.cmpge(IVec3::splat(-half)).all() && pos.cmplt(IVec3::splat(half)).all()
}

fn half(size: u32) -> i32 {
    // sizes are capped well below `i32::MAX`
    (size / 2) as i32
}

fn quarter(size: u32) -> i32 {
    (size / 4) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_offset_moves_towards_zero() {
        assert_eq!(
            child_offset(IVec3::new(-4, -1, 0), 8),
            (Corner3::X0Y0Z1, IVec3::new(-2, 1, -2))
        );
        assert_eq!(
            child_offset(IVec3::new(3, 2, -3), 8),
            (Corner3::X1Y1Z0, IVec3::new(1, 0, -1))
        );
    }

    #[test]
    fn child_offset_stays_in_child_frame() {
        let size = 16;
        for x in -8..8 {
            for y in [-8, -1, 0, 7] {
                for z in [-5, 0, 4] {
                    let (_, child) = child_offset(IVec3::new(x, y, z), size);
                    assert!(contains(child, size / 2), "{x} {y} {z} -> {child}");
                }
            }
        }
    }

    #[test]
    fn child_min_offsets_by_half() {
        let min = IVec3::splat(-4);
        assert_eq!(child_min(min, Corner3::X0Y0Z0, 8), IVec3::splat(-4));
        assert_eq!(child_min(min, Corner3::X1Y0Z1, 8), IVec3::new(0, -4, 0));
        assert_eq!(child_min(min, Corner3::X1Y1Z1, 8), IVec3::ZERO);
    }

    #[test]
    fn contains_is_half_open() {
        assert!(contains(IVec3::splat(-2), 4));
        assert!(contains(IVec3::splat(1), 4));
        assert!(!contains(IVec3::new(2, 0, 0), 4));
        assert!(!contains(IVec3::new(0, -3, 0), 4));
    }
}
