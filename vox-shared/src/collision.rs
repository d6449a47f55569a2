use glam::{IVec3, UVec3};
use tracing::warn;
use vox_lib::octree::{cube::Cube, DecodeError, NodeState, Octree, OutOfBounds};

use crate::{config::CollisionConfig, shape::CompoundShapeSettings, voxel::PhysicsVoxel};

/// The solid voxels of a single chunk, used to build its collision shape.
///
/// Voxels are addressed by chunk-local coordinates in `[0, size)` on each axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMask {
    octree: Octree<PhysicsVoxel>,
}

impl CollisionMask {
    /// Creates a mask without any solid voxels.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a valid [`Octree`] size.
    pub fn new(size: u32) -> Self {
        Self {
            octree: Octree::new(size),
        }
    }

    /// Creates an empty mask for chunks of the configured size.
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self::new(config.chunk_size())
    }

    pub fn size(&self) -> u32 {
        self.octree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.octree.state() == NodeState::Empty
    }

    pub fn create_voxel(&mut self, pos: UVec3) -> Result<(), OutOfBounds> {
        self.octree.try_set(self.centered(pos)?, PhysicsVoxel::SOLID)
    }

    pub fn erase_voxel(&mut self, pos: UVec3) -> Result<(), OutOfBounds> {
        self.octree.try_set(self.centered(pos)?, PhysicsVoxel::EMPTY)
    }

    pub fn is_solid(&self, pos: UVec3) -> Result<bool, OutOfBounds> {
        let voxel = self.octree.try_get(self.centered(pos)?)?;
        Ok(voxel.is_some_and(|voxel| voxel.solid))
    }

    /// Returns the cubes covering all solid voxels, in the octree's centered frame.
    pub fn cubes(&self) -> Vec<Cube> {
        self.octree.to_boxes()
    }

    /// Builds a compound shape for the whole chunk, centered on the chunk's center.
    pub fn shape_settings(&self, scale: f32) -> CompoundShapeSettings {
        CompoundShapeSettings::from_cubes(self.cubes(), scale)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.octree.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Octree::from_bytes(bytes).map(|octree| Self { octree })
    }

    /// Restores a saved mask, falling back to an empty mask of `size` if there is no valid one.
    ///
    /// A mask of a different size is treated like corrupted data.
    pub fn load_or_default(size: u32, bytes: &[u8]) -> Self {
        match Self::from_bytes(bytes) {
            Ok(mask) if mask.size() == size => mask,
            Ok(mask) => {
                warn!(
                    expected = size,
                    actual = mask.size(),
                    "discarding collision mask of wrong size"
                );
                Self::new(size)
            }
            Err(error) => {
                warn!(%error, "discarding invalid collision mask");
                Self::new(size)
            }
        }
    }

    /// Translates chunk-local coordinates into the octree's centered frame.
    fn centered(&self, pos: UVec3) -> Result<IVec3, OutOfBounds> {
        let size = self.size();
        let out_of_bounds = || OutOfBounds {
            // saturate instead of wrapping into negative coordinates
            pos: pos.min(UVec3::splat(i32::MAX as u32)).as_ivec3(),
            size,
        };
        if pos.cmpge(UVec3::splat(size)).any() {
            return Err(out_of_bounds());
        }
        // sizes are capped well below `i32::MAX`, so this cannot overflow
        Ok(pos.as_ivec3() - IVec3::splat((size / 2) as i32))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn create_and_erase() {
        let mut mask = CollisionMask::new(8);
        assert!(mask.is_empty());

        mask.create_voxel(UVec3::new(0, 7, 3)).unwrap();
        assert_eq!(mask.is_solid(UVec3::new(0, 7, 3)), Ok(true));
        assert_eq!(mask.is_solid(UVec3::new(1, 7, 3)), Ok(false));
        assert_eq!(mask.cubes(), [Cube::new(IVec3::new(-4, 3, -1), 1)]);

        mask.erase_voxel(UVec3::new(0, 7, 3)).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn out_of_bounds() {
        let mut mask = CollisionMask::new(4);
        let error = OutOfBounds {
            pos: IVec3::new(4, 0, 0),
            size: 4,
        };
        assert_eq!(mask.create_voxel(UVec3::new(4, 0, 0)), Err(error));
        assert_eq!(mask.erase_voxel(UVec3::new(4, 0, 0)), Err(error));
        assert_eq!(mask.is_solid(UVec3::new(4, 0, 0)), Err(error));
        assert!(mask.is_empty());
    }

    #[test]
    fn out_of_bounds_reports_saturated_position() {
        let mask = CollisionMask::new(4);
        assert_eq!(
            mask.is_solid(UVec3::new(u32::MAX, 1, 0)),
            Err(OutOfBounds {
                pos: IVec3::new(i32::MAX, 1, 0),
                size: 4,
            })
        );
    }

    #[test]
    fn from_config() {
        let config = CollisionConfig::from_ron_str("(chunk_size: 8, voxel_scale: 0.5)").unwrap();
        let mut mask = CollisionMask::from_config(&config);
        assert_eq!(mask.size(), 8);

        mask.create_voxel(UVec3::new(7, 0, 4)).unwrap();
        let settings = mask.shape_settings(config.voxel_scale);
        assert_eq!(settings.shapes.len(), 1);
        assert_eq!(settings.shapes[0].center, Vec3::new(1.75, -1.75, 0.25));
        assert_eq!(settings.shapes[0].half_extents, Vec3::splat(0.25));
    }

    #[test]
    fn filled_chunk_is_one_box() {
        let mut mask = CollisionMask::new(4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    mask.create_voxel(UVec3::new(x, y, z)).unwrap();
                }
            }
        }
        let settings = mask.shape_settings(0.25);
        assert_eq!(settings.shapes.len(), 1);
        assert_eq!(settings.shapes[0].center, Vec3::ZERO);
        assert_eq!(settings.shapes[0].half_extents, Vec3::splat(0.5));
    }

    #[test]
    fn bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut mask = CollisionMask::new(16);
        for _ in 0..500 {
            let pos = UVec3::new(
                rng.random_range(0..16),
                rng.random_range(0..16),
                rng.random_range(0..16),
            );
            if rng.random_bool(0.8) {
                mask.create_voxel(pos).unwrap();
            } else {
                mask.erase_voxel(pos).unwrap();
            }
        }
        let decoded = CollisionMask::from_bytes(&mask.to_bytes()).unwrap();
        assert_eq!(decoded, mask);
    }

    #[test]
    fn load_or_default_keeps_valid_mask() {
        let mut mask = CollisionMask::new(8);
        mask.create_voxel(UVec3::ONE).unwrap();
        assert_eq!(CollisionMask::load_or_default(8, &mask.to_bytes()), mask);
    }

    #[test]
    fn load_or_default_discards_invalid_mask() {
        let loaded = CollisionMask::load_or_default(8, &[8, 0, b'P']);
        assert_eq!(loaded, CollisionMask::new(8));

        let loaded = CollisionMask::load_or_default(8, &[]);
        assert_eq!(loaded, CollisionMask::new(8));
    }

    #[test]
    fn load_or_default_discards_wrong_size() {
        let mut mask = CollisionMask::new(4);
        mask.create_voxel(UVec3::ZERO).unwrap();
        let loaded = CollisionMask::load_or_default(8, &mask.to_bytes());
        assert_eq!(loaded.size(), 8);
        assert!(loaded.is_empty());
    }
}
