use glam::{Quat, Vec3};

/// An extension trait for types that can be interpreted as a rotation.
///
/// Characters use +Y as up and +Z as their local forward axis.
pub trait RotationExt {
    /// Returns the forward unit vector represented by this rotation.
    fn forward(&self) -> Vec3;

    /// Returns the rotation around the up axis in radians.
    fn yaw(&self) -> f32;

    /// Returns this rotation turned around the up axis by `degrees`.
    fn rotate_yaw_degrees(&self, degrees: f32) -> Self;
}

impl RotationExt for Quat {
    #[inline]
    fn forward(&self) -> Vec3 {
        *self * Vec3::Z
    }

    #[inline]
    fn yaw(&self) -> f32 {
        let forward = self.forward();
        forward.x.atan2(forward.z)
    }

    #[inline]
    fn rotate_yaw_degrees(&self, degrees: f32) -> Self {
        (Quat::from_rotation_y(degrees.to_radians()) * *self).normalize()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use glam::{Quat, Vec3};

    use crate::assert_approx_eq;

    use super::RotationExt;

    #[test]
    fn quat_forward() {
        let quat = Quat::IDENTITY;
        assert_eq!(quat.forward(), Vec3::Z);

        let quat = Quat::from_axis_angle(Vec3::Y, PI / 2.0);
        assert_approx_eq!(quat.forward(), Vec3::X);
    }

    #[test]
    fn quat_rotate_yaw() {
        let quat = Quat::IDENTITY.rotate_yaw_degrees(90.0);
        assert_approx_eq!(quat.yaw(), PI / 2.0);

        let quat = quat.rotate_yaw_degrees(-180.0);
        assert_approx_eq!(quat.yaw(), -PI / 2.0);
    }
}
