use vox_lib::octree::cell::{Cell, PackedCell, Solid};

/// A single voxel of a chunk.
///
/// The material is carried along for rendering and persistence, but does not affect collision.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Voxel {
    pub solid: bool,
    pub material_id: u16,
}

impl Voxel {
    pub const fn solid(material_id: u16) -> Self {
        Self {
            solid: true,
            material_id,
        }
    }
}

impl Cell for Voxel {
    fn erased() -> Self {
        Self::default()
    }
}

impl Solid for Voxel {
    fn is_solid(&self) -> bool {
        self.solid
    }
}

impl PackedCell for Voxel {
    const PACKED_LEN: usize = 3;

    fn pack(&self, out: &mut Vec<u8>) {
        self.solid.pack(out);
        self.material_id.pack(out);
    }

    fn unpack(bytes: &[u8]) -> Option<Self> {
        let [solid, material_id @ ..] = bytes else {
            return None;
        };
        Some(Self {
            solid: bool::unpack(std::slice::from_ref(solid))?,
            material_id: u16::unpack(material_id)?,
        })
    }
}

/// The collision relevant part of a [`Voxel`].
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct PhysicsVoxel {
    pub solid: bool,
}

impl PhysicsVoxel {
    pub const SOLID: Self = Self { solid: true };
    pub const EMPTY: Self = Self { solid: false };
}

impl From<Voxel> for PhysicsVoxel {
    fn from(voxel: Voxel) -> Self {
        Self { solid: voxel.solid }
    }
}

impl Cell for PhysicsVoxel {
    fn erased() -> Self {
        Self::EMPTY
    }
}

impl Solid for PhysicsVoxel {
    fn is_solid(&self) -> bool {
        self.solid
    }
}

impl PackedCell for PhysicsVoxel {
    const PACKED_LEN: usize = 1;

    fn pack(&self, out: &mut Vec<u8>) {
        self.solid.pack(out);
    }

    fn unpack(bytes: &[u8]) -> Option<Self> {
        bool::unpack(bytes).map(|solid| Self { solid })
    }
}
