use glam::{Quat, Vec3};

use crate::state::CapsuleDimensions;

/// Access to the rigid body moved by a controller.
///
/// The controller is the only writer of the velocity, rotation and collider
/// dimensions exposed here.
pub trait Kinematics {
    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    fn rotation(&self) -> Quat;

    fn set_rotation(&mut self, rotation: Quat);

    /// Returns the world position of the character's feet.
    fn position(&self) -> Vec3;

    /// Called after the controller switched between the standing and the
    /// crouched collider.
    fn resize_capsule(&mut self, capsule: CapsuleDimensions) {
        let _ = capsule;
    }
}
