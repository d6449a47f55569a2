use std::ops::{Index, IndexMut};

use enum_map::Enum;
use enumset::{EnumSet, EnumSetType};
use glam::IVec3;

macro_rules! impl_index_for_vec {
    { $axis_type:ident for $base_type:ident: $vector_type:ident {
        $( $axis_name:ident => $axis_field:ident, )*
    } } => {
        impl Index<$axis_type> for $vector_type {
            type Output = $base_type;

            fn index(&self, index: $axis_type) -> &Self::Output {
                match index {
                    $( $axis_type::$axis_name => &self.$axis_field, )*
                }
            }
        }

        impl IndexMut<$axis_type> for $vector_type {
            fn index_mut(&mut self, index: $axis_type) -> &mut Self::Output {
                match index {
                    $( $axis_type::$axis_name => &mut self.$axis_field, )*
                }
            }
        }
    };
}

/// A three-dimensional axis; `X`, `Y`, or `Z`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Axis3 {
    X,
    Y,
    Z,
}

impl Axis3 {
    /// The bit this axis occupies within a [`Corner3`] index.
    const fn corner_bit(self) -> u8 {
        match self {
            Self::X => 0b100,
            Self::Y => 0b010,
            Self::Z => 0b001,
        }
    }
}

impl_index_for_vec! {
    Axis3 for i32: IVec3 {
        X => x,
        Y => y,
        Z => z,
    }
}

/// A set of three-dimensional axes.
pub type Axes3 = EnumSet<Axis3>;

/// A corner of a 3D cube, which doubles as one of the 8 octants of an octree node.
///
/// Variants are declared so that the discriminant is `x * 4 + y * 2 + z`, with each component
/// being `1` on the positive side of the node's center. [`Corner3::from_offset`] is the only place
/// that maps coordinates to octants; every octree algorithm goes through it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum)]
pub enum Corner3 {
    X0Y0Z0,
    X0Y0Z1,
    X0Y1Z0,
    X0Y1Z1,
    X1Y0Z0,
    X1Y0Z1,
    X1Y1Z0,
    X1Y1Z1,
}

impl Corner3 {
    /// Returns the octant containing `offset`, given relative to the center of a node.
    ///
    /// Zero counts as positive, which matches the half-open `[-size/2, size/2)` range of a node.
    pub fn from_offset(offset: IVec3) -> Self {
        let index = usize::from(offset.x >= 0) << 2
            | usize::from(offset.y >= 0) << 1
            | usize::from(offset.z >= 0);
        Self::from_usize(index)
    }

    /// The index of this corner in `0..8`.
    pub fn index(self) -> usize {
        self.into_usize()
    }

    /// Whether the corner lies on the positive side along the given axis.
    pub fn is_positive(self, axis: Axis3) -> bool {
        self as u8 & axis.corner_bit() != 0
    }

    /// The axes along which the corner lies on the positive side.
    pub fn positive_axes(self) -> Axes3 {
        Axes3::all()
            .iter()
            .filter(|&axis| self.is_positive(axis))
            .collect()
    }

    /// Returns `-1` or `1` for each axis, pointing from the center towards this corner.
    pub fn sign(self) -> IVec3 {
        IVec3::from(self) * 2 - IVec3::ONE
    }
}

/// Returns `0` or `1` for each axis, `1` being the positive side.
impl From<Corner3> for IVec3 {
    fn from(corner: Corner3) -> Self {
        let mut unit = IVec3::ZERO;
        for axis in corner.positive_axes() {
            unit[axis] = 1;
        }
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> impl Iterator<Item = Corner3> {
        (0..Corner3::LENGTH).map(Corner3::from_usize)
    }

    #[test]
    fn corner_index_layout() {
        for corner in corners() {
            let unit = IVec3::from(corner);
            assert_eq!(
                corner.index(),
                (unit.x * 4 + unit.y * 2 + unit.z) as usize,
                "{corner:?}"
            );
        }
    }

    #[test]
    fn from_offset_uses_sign_of_each_axis() {
        assert_eq!(Corner3::from_offset(IVec3::new(-1, -1, -1)), Corner3::X0Y0Z0);
        assert_eq!(Corner3::from_offset(IVec3::new(-5, -2, 0)), Corner3::X0Y0Z1);
        assert_eq!(Corner3::from_offset(IVec3::new(-1, 3, -7)), Corner3::X0Y1Z0);
        assert_eq!(Corner3::from_offset(IVec3::new(0, -1, -1)), Corner3::X1Y0Z0);
        assert_eq!(Corner3::from_offset(IVec3::ZERO), Corner3::X1Y1Z1);
    }

    #[test]
    fn from_offset_of_sign_is_identity() {
        for corner in corners() {
            assert_eq!(Corner3::from_offset(corner.sign()), corner);
        }
    }

    #[test]
    fn positive_axes() {
        assert_eq!(Corner3::X0Y0Z0.positive_axes(), Axes3::empty());
        assert_eq!(Corner3::X1Y0Z1.positive_axes(), Axis3::X | Axis3::Z);
        assert_eq!(Corner3::X1Y1Z1.positive_axes(), Axes3::all());
    }

    #[test]
    fn sign_matches_is_positive() {
        assert_eq!(Corner3::X0Y1Z0.sign(), IVec3::new(-1, 1, -1));
        for corner in corners() {
            let sign = corner.sign();
            for axis in Axes3::all() {
                assert_eq!(sign[axis] == 1, corner.is_positive(axis));
            }
        }
    }
}
