mod rotation;

use glam::Vec3;

pub use rotation::RotationExt;

/// A half-line starting at `origin` going into `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Direction of the ray. Queries expect this to be normalized.
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn point(self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Linearly interpolates between `a` and `b`.
///
/// `t` is clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Loops `t` so that it never leaves `[0, length)`.
///
/// Unlike `%` this also wraps negative values into the positive range.
#[inline]
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Removes the component of `vector` along `normal`.
///
/// `normal` does not need to be normalized. A zero `normal` returns `vector`
/// unchanged.
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < f32::EPSILON {
        return vector;
    }

    vector - normal * (vector.dot(normal) / len_sq)
}

/// Moves `current` towards `target` with a critically damped spring.
///
/// `velocity` carries the rate of change between calls and must be kept by
/// the caller. `smooth_time` is roughly the time it takes to reach the
/// target. A `dt` of zero returns `current` unchanged.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    // Pade approximation of exp(-omega * dt).
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;

    let mut output = target + (change + temp) * exp;

    // Never overshoot the target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::assert_approx_eq;

    use super::{lerp, project_on_plane, repeat, smooth_damp, Ray};

    #[test]
    fn ray_point() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Y);
        assert_eq!(ray.point(2.0), Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn lerp_clamps() {
        assert_approx_eq!(lerp(180.0, 360.0, 0.5), 270.0);
        assert_approx_eq!(lerp(180.0, 360.0, 2.0), 360.0);
        assert_approx_eq!(lerp(180.0, 360.0, -1.0), 180.0);
    }

    #[test]
    fn repeat_wraps() {
        assert_approx_eq!(repeat(1.2, 1.0), 0.2);
        assert_approx_eq!(repeat(0.7, 1.0), 0.7);
        assert_approx_eq!(repeat(-0.25, 1.0), 0.75);
    }

    #[test]
    fn project_on_plane_removes_normal_component() {
        let v = project_on_plane(Vec3::new(1.0, 1.0, 0.0), Vec3::Y);
        assert_approx_eq!(v, Vec3::X);

        let v = project_on_plane(Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO);
        assert_approx_eq!(v, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn smooth_damp_zero_dt() {
        let mut velocity = 0.0;
        let value = smooth_damp(0.25, 1.0, &mut velocity, 0.1, 0.0);
        assert_approx_eq!(value, 0.25);
        assert_approx_eq!(velocity, 0.0);
    }

    #[test]
    fn smooth_damp_converges() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..200 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.1, 0.02);
            assert!(value <= 1.0);
        }

        assert!((value - 1.0).abs() < 1e-3);
    }
}
