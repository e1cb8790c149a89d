use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::{Point, Real, Rotation, Vector};

pub fn vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub fn point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

pub fn rotation(v: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(v.w, v.x, v.y, v.z))
}

pub fn vec3(v: Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn point_vec3(v: Point<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn quat(v: Rotation<Real>) -> Quat {
    Quat::from_xyzw(v.i, v.j, v.k, v.w)
}

#[cfg(test)]
mod tests {
    use game_common::assert_approx_eq;
    use glam::{Quat, Vec3};

    use super::{quat, rotation, vec3, vector};

    #[test]
    fn rotation_roundtrip_keeps_yaw() {
        let q = Quat::from_rotation_y(0.75);
        assert_approx_eq!(quat(rotation(q)), q);
    }

    #[test]
    fn vector_roundtrip() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(vec3(vector(v)), v);
    }
}
