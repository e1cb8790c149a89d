use game_common::math::Ray;
use glam::Vec3;

/// The nearest surface hit by a probe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProbeHit {
    pub point: Vec3,
    /// Unit surface normal at `point`.
    pub normal: Vec3,
    /// Distance travelled along the probe until the hit.
    pub distance: f32,
}

/// Read-only spatial queries against the world geometry.
///
/// Implementations must never report the probing character itself and must
/// return the nearest hit when a probe crosses multiple surfaces.
pub trait GroundSensor {
    /// Casts `ray` up to `max_distance`.
    fn probe(&self, ray: Ray, max_distance: f32) -> Option<ProbeHit>;

    /// Sweeps a sphere of `radius` along `ray` up to `max_distance`.
    ///
    /// The default implementation ignores the radius and casts a plain ray.
    fn sweep_sphere(&self, ray: Ray, radius: f32, max_distance: f32) -> Option<ProbeHit> {
        let _ = radius;
        self.probe(ray, max_distance)
    }
}
