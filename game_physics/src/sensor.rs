use game_common::math::Ray;
use game_locomotion::{GroundSensor, ProbeHit};
use rapier3d::prelude::RigidBodyHandle;

use crate::SharedWorld;

/// Distance a sweep starts ahead of its origin.
///
/// Characters at rest sink slightly into the floor. Sweeps starting at the
/// feet would otherwise begin in contact with it.
const SWEEP_SKIN: f32 = 0.02;

/// Ground and headroom probes of a single character.
///
/// Probes never report colliders attached to the character's own body.
#[derive(Clone, Debug)]
pub struct RapierGroundSensor {
    world: SharedWorld,
    exclude: RigidBodyHandle,
}

impl RapierGroundSensor {
    pub fn new(world: SharedWorld, exclude: RigidBodyHandle) -> Self {
        Self { world, exclude }
    }
}

impl GroundSensor for RapierGroundSensor {
    fn probe(&self, ray: Ray, max_distance: f32) -> Option<ProbeHit> {
        self.world.lock().cast_ray(ray, max_distance, Some(self.exclude))
    }

    fn sweep_sphere(&self, ray: Ray, radius: f32, max_distance: f32) -> Option<ProbeHit> {
        let skin = SWEEP_SKIN.min(max_distance);
        let start = Ray::new(ray.point(skin), ray.direction);

        let hit = self.world.lock().cast_sphere(
            start,
            radius,
            max_distance - skin,
            Some(self.exclude),
        )?;

        Some(ProbeHit {
            distance: hit.distance + skin,
            ..hit
        })
    }
}

#[cfg(test)]
mod tests {
    use game_common::math::Ray;
    use game_locomotion::{CapsuleDimensions, GroundSensor};
    use glam::Vec3;

    use super::RapierGroundSensor;
    use crate::PhysicsWorld;

    #[test]
    fn sensor_ignores_own_body() {
        let mut world = PhysicsWorld::new();
        world.add_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0));
        let handle = world.add_character(Vec3::ZERO, CapsuleDimensions::new(1.8, 0.3));
        let world = world.into_shared();

        let sensor = RapierGroundSensor::new(world, handle.body);
        let ray = Ray::new(Vec3::new(0.0, 0.1, 0.0), Vec3::NEG_Y);

        let hit = sensor.probe(ray, 0.5).unwrap();
        assert!((hit.distance - 0.1).abs() < 1e-4);
        assert!((hit.normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn sensor_sweep_finds_ceiling() {
        let mut world = PhysicsWorld::new();
        world.add_fixed_cuboid(Vec3::new(0.0, 1.7, 0.0), Vec3::new(10.0, 0.2, 10.0));
        let handle = world.add_character(Vec3::ZERO, CapsuleDimensions::new(1.8, 0.3));
        let world = world.into_shared();

        let sensor = RapierGroundSensor::new(world, handle.body);
        let ray = Ray::new(Vec3::new(0.0, 0.15, 0.0), Vec3::Y);

        let hit = sensor.sweep_sphere(ray, 0.15, 1.65).unwrap();
        assert!((hit.distance - 1.2).abs() < 1e-3);
        assert!((hit.point.y - 1.5).abs() < 1e-3);
        assert!(hit.normal.y < -0.99);

        assert!(sensor.sweep_sphere(ray, 0.15, 1.0).is_none());
    }

    #[test]
    fn sensor_sweep_starts_clear_of_sunken_floor() {
        let mut world = PhysicsWorld::new();
        world.add_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0));
        world.add_fixed_cuboid(Vec3::new(0.0, 1.7, 6.0), Vec3::new(3.0, 0.2, 2.0));
        let handle = world.add_character(Vec3::ZERO, CapsuleDimensions::new(1.8, 0.3));
        let world = world.into_shared();

        let sensor = RapierGroundSensor::new(world, handle.body);

        // Feet slightly below the floor right at the edge of the ceiling.
        let ray = Ray::new(Vec3::new(0.0, 0.148_862_21, 8.000_984), Vec3::Y);
        let hit = sensor.sweep_sphere(ray, 0.15, 1.65).unwrap();
        assert!(hit.distance < 1.65);
        assert!(hit.normal.y < 0.0);
    }
}
