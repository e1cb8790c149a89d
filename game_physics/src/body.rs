use game_locomotion::{CapsuleDimensions, Kinematics};
use glam::{Quat, Vec3};

use crate::convert::{self, quat, vec3, vector};
use crate::{CharacterHandle, SharedWorld};

/// The rigid body of a single character.
///
/// # Panics
///
/// Accessors panic if the character was removed from the world while the
/// body is still in use.
#[derive(Clone, Debug)]
pub struct RapierBody {
    world: SharedWorld,
    handle: CharacterHandle,
}

impl RapierBody {
    pub fn new(world: SharedWorld, handle: CharacterHandle) -> Self {
        Self { world, handle }
    }

    #[inline]
    pub fn handle(&self) -> CharacterHandle {
        self.handle
    }
}

impl Kinematics for RapierBody {
    fn velocity(&self) -> Vec3 {
        let world = self.world.lock();
        let body = world.body(self.handle.body).expect(BODY_REMOVED);
        vec3(*body.linvel())
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        let mut world = self.world.lock();
        let body = world.body_mut(self.handle.body).expect(BODY_REMOVED);
        body.set_linvel(vector(velocity), true);
    }

    fn rotation(&self) -> Quat {
        let world = self.world.lock();
        let body = world.body(self.handle.body).expect(BODY_REMOVED);
        quat(*body.rotation())
    }

    fn set_rotation(&mut self, rotation: Quat) {
        let mut world = self.world.lock();
        let body = world.body_mut(self.handle.body).expect(BODY_REMOVED);
        body.set_rotation(convert::rotation(rotation), true);
    }

    fn position(&self) -> Vec3 {
        let world = self.world.lock();
        let body = world.body(self.handle.body).expect(BODY_REMOVED);
        vec3(*body.translation())
    }

    fn resize_capsule(&mut self, capsule: CapsuleDimensions) {
        self.world.lock().set_capsule(self.handle, capsule);
    }
}

const BODY_REMOVED: &str = "character body removed from physics world";
