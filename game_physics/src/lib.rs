//! rapier3d backend for the locomotion capabilities.
//!
//! [`PhysicsWorld`] owns the simulation. [`RapierGroundSensor`] and
//! [`RapierBody`] share it through a [`SharedWorld`] and implement
//! [`GroundSensor`] and [`Kinematics`] for a single character.
//!
//! [`GroundSensor`]: game_locomotion::GroundSensor
//! [`Kinematics`]: game_locomotion::Kinematics

mod body;
mod convert;
mod sensor;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use convert::{point, point_vec3, vec3, vector};
use game_common::math::Ray;
use game_locomotion::{CapsuleDimensions, ProbeHit};
use glam::Vec3;
use parking_lot::Mutex;
use rapier3d::geometry::BroadPhaseMultiSap;
use rapier3d::math::Real;
use rapier3d::parry::query::{PointQuery, ShapeCastOptions};
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::{
    CCDSolver, Collider, ColliderBuilder, ColliderHandle, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, Isometry, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryFilter, QueryPipeline, RigidBody, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, SharedShape, Vector,
};

pub use body::RapierBody;
pub use sensor::RapierGroundSensor;

const DT: Real = 1.0 / 60.0;
const GRAVITY: Vector<Real> = Vector::new(0.0, -9.81, 0.0);

/// A [`PhysicsWorld`] shared between the capabilities of a character and the
/// host loop stepping it.
pub type SharedWorld = Arc<Mutex<PhysicsWorld>>;

/// The rigid body and collider of a character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CharacterHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: DT,
            ..Default::default()
        };

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Wraps this world for sharing with the character capabilities.
    pub fn into_shared(self) -> SharedWorld {
        Arc::new(Mutex::new(self))
    }

    /// Adds static box geometry centered at `center`.
    pub fn add_fixed_cuboid(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector(center))
            .build();

        let handle = self.colliders.insert(collider);
        self.query_pipeline.update(&self.colliders);
        handle
    }

    /// Removes static geometry previously added with [`add_fixed_cuboid`].
    ///
    /// [`add_fixed_cuboid`]: Self::add_fixed_cuboid
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.colliders.remove(handle, &mut self.islands, &mut self.bodies, true);
        self.query_pipeline.update(&self.colliders);
    }

    /// Adds a dynamic character body whose feet are at `feet`.
    ///
    /// The body never rotates from contacts, only explicit rotation writes
    /// turn it.
    pub fn add_character(&mut self, feet: Vec3, capsule: CapsuleDimensions) -> CharacterHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector(feet))
            .lock_rotations()
            .build();
        let body = self.bodies.insert(body);

        let collider = ColliderBuilder::new(capsule_shape(capsule))
            .translation(vector(capsule.center_offset))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.query_pipeline.update(&self.colliders);

        tracing::debug!("spawned character at {}", feet);

        CharacterHandle { body, collider }
    }

    /// Replaces the capsule collider of a character.
    pub fn set_capsule(&mut self, handle: CharacterHandle, capsule: CapsuleDimensions) {
        let Some(body) = self.bodies.get(handle.body) else {
            tracing::warn!("capsule resize of unknown body {:?}", handle.body);
            return;
        };
        let body_position = *body.position();

        let Some(collider) = self.colliders.get_mut(handle.collider) else {
            tracing::warn!("capsule resize of unknown collider {:?}", handle.collider);
            return;
        };

        let offset = capsule.center_offset;
        collider.set_shape(capsule_shape(capsule));
        collider.set_translation_wrt_parent(vector(offset));
        // The world position is otherwise only synced with the parent on the
        // next step.
        collider.set_position(body_position * Isometry::translation(offset.x, offset.y, offset.z));

        self.query_pipeline.update(&self.colliders);
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let _span = tracing::trace_span!("PhysicsWorld::step").entered();

        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &GRAVITY,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.query_pipeline.update(&self.colliders);
    }

    /// Casts `ray` and returns the nearest hit within `max_toi`.
    ///
    /// Colliders attached to `exclude` and colliders containing the ray
    /// origin are ignored.
    pub fn cast_ray(
        &self,
        ray: Ray,
        max_toi: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<ProbeHit> {
        let _span = tracing::trace_span!("PhysicsWorld::cast_ray").entered();

        let rapier_ray = rapier3d::prelude::Ray::new(point(ray.origin), vector(ray.direction));

        let outside = |_: ColliderHandle, collider: &Collider| -> bool {
            !collider
                .shape()
                .contains_point(collider.position(), &rapier_ray.origin)
        };

        let (_, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &rapier_ray,
            max_toi,
            true,
            filter(exclude).predicate(&outside),
        )?;

        Some(ProbeHit {
            point: point_vec3(rapier_ray.point_at(intersection.time_of_impact)),
            normal: vec3(intersection.normal),
            distance: intersection.time_of_impact,
        })
    }

    /// Sweeps a sphere of `radius` along `ray` and returns the nearest hit
    /// within `max_toi`.
    ///
    /// Colliders attached to `exclude` are ignored.
    pub fn cast_sphere(
        &self,
        ray: Ray,
        radius: f32,
        max_toi: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<ProbeHit> {
        let _span = tracing::trace_span!("PhysicsWorld::cast_sphere").entered();

        let shape_origin = Isometry::translation(ray.origin.x, ray.origin.y, ray.origin.z);
        let shape_vel = vector(ray.direction);
        let shape = Ball::new(radius);

        let options = ShapeCastOptions {
            max_time_of_impact: max_toi,
            target_distance: 0.0,
            // A sphere starting inside geometry hits it immediately.
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let (_, hit) = self.query_pipeline.cast_shape(
            &self.bodies,
            &self.colliders,
            &shape_origin,
            &shape_vel,
            &shape,
            options,
            filter(exclude),
        )?;

        let center = ray.point(hit.time_of_impact);
        // `normal1` is the outward normal of the hit collider.
        let normal = vec3(hit.normal1.into_inner());

        Some(ProbeHit {
            point: center - normal * radius,
            normal,
            distance: hit.time_of_impact,
        })
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for PhysicsWorld {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish_non_exhaustive()
    }
}

fn filter<'a>(exclude: Option<RigidBodyHandle>) -> QueryFilter<'a> {
    let filter = QueryFilter::new().exclude_sensors();
    match exclude {
        Some(handle) => filter.exclude_rigid_body(handle),
        None => filter,
    }
}

/// Returns an upright capsule with the total height of `capsule`.
fn capsule_shape(capsule: CapsuleDimensions) -> SharedShape {
    let half_height = (capsule.height * 0.5 - capsule.radius).max(0.0);
    SharedShape::capsule_y(half_height, capsule.radius)
}
