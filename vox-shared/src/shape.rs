use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use glam::Vec3;
use tracing::trace;
use vox_lib::octree::cube::Cube;

/// An axis-aligned box collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxShape {
    /// Creates a box covering `cube`, with each voxel having an edge length of `scale`.
    pub fn from_cube(cube: Cube, scale: f32) -> Self {
        Self {
            center: cube.center() * scale,
            half_extents: Vec3::splat(cube.half_extent() * scale),
        }
    }
}

/// A set of box colliders forming a single rigid body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundShapeSettings {
    pub shapes: Vec<BoxShape>,
}

impl CompoundShapeSettings {
    pub fn from_cubes(cubes: impl IntoIterator<Item = Cube>, scale: f32) -> Self {
        Self {
            shapes: cubes
                .into_iter()
                .map(|cube| BoxShape::from_cube(cube, scale))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Creates a connected [`ShapePublisher`] and [`ShapeSubscriber`].
///
/// Published shapes are never modified. The editing side sends a complete replacement whenever a
/// chunk changes and the physics side swaps it in between steps.
pub fn shape_channel() -> (ShapePublisher, ShapeSubscriber) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (
        ShapePublisher { sender },
        ShapeSubscriber {
            receiver,
            current: None,
        },
    )
}

/// Sends rebuilt shapes to a [`ShapeSubscriber`].
#[derive(Clone, Debug)]
pub struct ShapePublisher {
    sender: Sender<Arc<CompoundShapeSettings>>,
}

impl ShapePublisher {
    /// Publishes a new shape, replacing any previously published one.
    ///
    /// Returns `false` if the subscriber was dropped.
    pub fn publish(&self, shape: CompoundShapeSettings) -> bool {
        trace!(boxes = shape.shapes.len(), "publishing collision shape");
        self.sender.send(Arc::new(shape)).is_ok()
    }
}

/// Receives the shapes sent by a [`ShapePublisher`].
#[derive(Debug)]
pub struct ShapeSubscriber {
    receiver: Receiver<Arc<CompoundShapeSettings>>,
    current: Option<Arc<CompoundShapeSettings>>,
}

impl ShapeSubscriber {
    /// Returns the most recently published shape.
    ///
    /// Shapes that were superseded before this was called are dropped without ever being returned.
    /// Returns [`None`] if nothing was published yet.
    pub fn latest(&mut self) -> Option<Arc<CompoundShapeSettings>> {
        while let Ok(shape) = self.receiver.try_recv() {
            self.current = Some(shape);
        }
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use glam::IVec3;

    use super::*;

    #[test]
    fn box_from_cube() {
        let shape = BoxShape::from_cube(Cube::new(IVec3::new(-4, 0, 2), 2), 0.5);
        assert_eq!(shape.center, Vec3::new(-1.5, 0.5, 1.5));
        assert_eq!(shape.half_extents, Vec3::splat(0.5));
    }

    #[test]
    fn compound_from_cubes() {
        let settings =
            CompoundShapeSettings::from_cubes([Cube::root(8), Cube::new(IVec3::ZERO, 1)], 1.0);
        assert_eq!(settings.shapes.len(), 2);
        assert_eq!(settings.shapes[0].center, Vec3::ZERO);
        assert_eq!(settings.shapes[0].half_extents, Vec3::splat(4.0));
        assert!(CompoundShapeSettings::default().is_empty());
    }

    #[test]
    fn subscriber_keeps_newest_shape() {
        let (publisher, mut subscriber) = shape_channel();
        assert_eq!(subscriber.latest(), None);

        for size in [2, 4, 8] {
            assert!(publisher.publish(CompoundShapeSettings::from_cubes([Cube::root(size)], 1.0)));
        }
        let latest = subscriber.latest().unwrap();
        assert_eq!(latest.shapes[0].half_extents, Vec3::splat(4.0));
        // nothing new arrived, so the current shape stays
        assert_eq!(subscriber.latest(), Some(latest));
    }

    #[test]
    fn publish_from_other_thread() {
        let (publisher, mut subscriber) = shape_channel();
        thread::spawn(move || {
            publisher.publish(CompoundShapeSettings::from_cubes([Cube::root(2)], 1.0))
        })
        .join()
        .unwrap();
        assert_eq!(subscriber.latest().unwrap().shapes.len(), 1);
    }

    #[test]
    fn publish_fails_without_subscriber() {
        let (publisher, subscriber) = shape_channel();
        drop(subscriber);
        assert!(!publisher.publish(CompoundShapeSettings::default()));
    }
}
