use std::fmt::{self, Debug, Formatter};

use game_common::math::{lerp, project_on_plane, repeat, smooth_damp, Ray};
use game_common::RotationExt;
use glam::Vec3;

use crate::animator::{AnimationSignals, Animator};
use crate::config::LocomotionConfig;
use crate::error::InitError;
use crate::kinematics::Kinematics;
use crate::sensor::GroundSensor;
use crate::state::{CapsuleDimensions, CharacterState};

const HALF: f32 = 0.5;

/// The call the controller expects next within a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TickPhase {
    Step,
    CommitRootMotion,
}

/// A float parameter that follows its target with a damped spring.
#[derive(Copy, Clone, Debug, Default)]
struct Damped {
    value: f32,
    velocity: f32,
}

impl Damped {
    fn update(&mut self, target: f32, damp_time: f32, dt: f32) -> f32 {
        self.value = smooth_damp(self.value, target, &mut self.velocity, damp_time, dt);
        self.value
    }
}

/// Drives a humanoid character from movement intents.
///
/// Built with [`LocomotionController::builder`]. See the crate docs for the
/// tick contract between [`step`] and [`commit_root_motion`].
///
/// [`step`]: Self::step
/// [`commit_root_motion`]: Self::commit_root_motion
pub struct LocomotionController {
    config: LocomotionConfig,
    state: CharacterState,
    sensor: Box<dyn GroundSensor>,
    body: Box<dyn Kinematics>,
    animator: Box<dyn Animator>,
    forward_param: Damped,
    turn_param: Damped,
    signals: AnimationSignals,
    /// `dt` of the last step, used to turn root displacement into velocity.
    step_dt: f32,
    phase: TickPhase,
}

impl LocomotionController {
    pub fn builder(config: LocomotionConfig) -> LocomotionControllerBuilder {
        LocomotionControllerBuilder::new(config)
    }

    /// Advances the controller by one tick.
    ///
    /// `move_intent` is the desired movement in world space, vectors longer
    /// than one are normalized. A `dt` of zero is valid and neither turns
    /// nor moves the character.
    pub fn step(&mut self, move_intent: Vec3, crouch: bool, jump: bool, dt: f32) {
        let _span = tracing::trace_span!("LocomotionController::step").entered();

        if self.phase == TickPhase::CommitRootMotion {
            tracing::debug!("previous tick ended without committing root motion");
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let mut movement = if move_intent.is_finite() {
            move_intent
        } else {
            Vec3::ZERO
        };
        if movement.length_squared() > 1.0 {
            movement = movement.normalize();
        }

        self.state.orientation = self.body.rotation();
        let local = self.state.orientation.inverse() * movement;

        self.check_ground_status();

        let local = project_on_plane(local, self.state.ground_normal);
        self.state.turn_amount = turn_angle(local);
        self.state.forward_amount = local.z.clamp(-1.0, 1.0);

        self.apply_extra_turn_rotation(dt);

        if self.state.is_grounded {
            self.handle_grounded_movement(crouch, jump);
        }

        self.resolve_stance(crouch);

        let is_moving = local.length_squared() > 0.0;
        self.update_animator(is_moving, dt);

        tracing::trace!(
            "step: grounded={} crouching={} forward={} turn={}",
            self.state.is_grounded,
            self.state.is_crouching,
            self.state.forward_amount,
            self.state.turn_amount,
        );

        self.step_dt = dt;
        self.phase = TickPhase::CommitRootMotion;
    }

    /// Applies the root displacement of the pose evaluated after the last
    /// [`step`].
    ///
    /// While grounded the displacement becomes the horizontal velocity of the
    /// body, the vertical velocity is kept. While airborne or after a step
    /// with zero `dt` this does nothing.
    ///
    /// [`step`]: Self::step
    pub fn commit_root_motion(&mut self, delta_position: Vec3) {
        if self.phase != TickPhase::CommitRootMotion {
            tracing::warn!("root motion committed without a preceding step, ignored");
            return;
        }
        self.phase = TickPhase::Step;

        if !self.state.is_grounded || self.step_dt <= 0.0 {
            return;
        }

        let mut velocity = delta_position * self.config.move_speed_multiplier / self.step_dt;
        velocity.y = self.body.velocity().y;
        self.body.set_velocity(velocity);
    }

    #[inline]
    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Returns the parameters emitted by the last step.
    #[inline]
    pub fn signals(&self) -> &AnimationSignals {
        &self.signals
    }

    pub fn kinematics(&self) -> &dyn Kinematics {
        self.body.as_ref()
    }

    pub fn animator(&self) -> &dyn Animator {
        self.animator.as_ref()
    }

    fn check_ground_status(&mut self) {
        let origin = self.body.position() + Vec3::Y * self.config.probe_origin_offset;
        let ray = Ray::new(origin, Vec3::NEG_Y);

        let was_grounded = self.state.is_grounded;

        match self.sensor.probe(ray, self.state.ground_check_distance) {
            Some(hit) => {
                self.state.ground_normal = hit.normal;
                self.state.is_grounded = true;
                self.state.root_motion_enabled = true;
            }
            None => {
                self.state.ground_normal = Vec3::Y;
                self.state.is_grounded = false;
                self.state.root_motion_enabled = false;
            }
        }

        if was_grounded != self.state.is_grounded {
            tracing::debug!("grounded changed to {}", self.state.is_grounded);
        }
    }

    fn apply_extra_turn_rotation(&mut self, dt: f32) {
        let turn_speed = lerp(
            self.config.stationary_turn_speed,
            self.config.moving_turn_speed,
            self.state.forward_amount,
        );

        let degrees = self.state.turn_amount * turn_speed * dt;
        if degrees == 0.0 {
            return;
        }

        let rotation = self.state.orientation.rotate_yaw_degrees(degrees);
        self.body.set_rotation(rotation);
        self.state.orientation = rotation;
    }

    fn handle_grounded_movement(&mut self, crouch: bool, jump: bool) {
        // Jumps only start from the base grounded state, never while landing.
        if !jump || crouch || !self.animator.is_in_state(&self.config.grounded_state) {
            return;
        }

        let velocity = self.body.velocity();
        self.body.set_velocity(Vec3::new(
            velocity.x,
            self.config.jump_power,
            velocity.z,
        ));

        self.state.is_grounded = false;
        self.state.root_motion_enabled = false;
        self.state.ground_check_distance = self.config.ground_check_distance;

        tracing::debug!("jump with velocity {}", self.config.jump_power);
    }

    /// Switches between the standing and the crouched collider.
    fn resolve_stance(&mut self, crouch: bool) {
        if self.state.is_grounded && crouch {
            if self.state.is_crouching {
                return;
            }

            self.set_capsule(self.state.standing_capsule.crouched());
            self.state.is_crouching = true;
            return;
        }

        if self.is_headroom_blocked() {
            if !self.state.is_crouching {
                tracing::debug!("no headroom to stand up, forcing crouch");
            }

            self.state.is_crouching = true;
            return;
        }

        if self.state.is_capsule_crouched() {
            self.set_capsule(self.state.standing_capsule);
        }
        self.state.is_crouching = false;
    }

    fn is_headroom_blocked(&self) -> bool {
        let radius = self.state.capsule.radius * HALF;
        let origin = self.body.position() + Vec3::Y * radius;
        let length = self.state.standing_capsule.height - radius;

        self.sensor
            .sweep_sphere(Ray::new(origin, Vec3::Y), radius, length)
            .is_some()
    }

    fn set_capsule(&mut self, capsule: CapsuleDimensions) {
        tracing::debug!("capsule height changed to {}", capsule.height);

        self.state.capsule = capsule;
        self.body.resize_capsule(capsule);
    }

    fn update_animator(&mut self, is_moving: bool, dt: f32) {
        let damp_time = self.config.parameter_damp_time;
        let forward = self
            .forward_param
            .update(self.state.forward_amount, damp_time, dt);
        let turn = self.turn_param.update(self.state.turn_amount, damp_time, dt);

        let is_grounded = self.state.is_grounded;

        let cycle = repeat(
            self.animator.normalized_cycle_phase() + self.config.run_cycle_leg_offset,
            1.0,
        );
        let leg = if cycle < HALF { 1.0 } else { -1.0 };

        self.signals = AnimationSignals {
            forward,
            turn,
            crouch: self.state.is_crouching,
            on_ground: is_grounded,
            jump: (!is_grounded).then(|| self.body.velocity().y),
            jump_leg: is_grounded.then_some(leg * self.state.forward_amount),
            playback_speed: (is_grounded && is_moving).then_some(self.config.anim_speed_multiplier),
            apply_root_motion: self.state.root_motion_enabled,
        };

        self.signals.write_to(self.animator.as_mut());
    }
}

impl Debug for LocomotionController {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocomotionController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

/// Returns the angle from the local forward axis towards `local` on the
/// ground plane.
fn turn_angle(local: Vec3) -> f32 {
    // atan2 of signed zeros is +-PI, not zero.
    if local.x == 0.0 && local.z == 0.0 {
        return 0.0;
    }

    local.x.atan2(local.z)
}

/// Builder for a [`LocomotionController`].
///
/// All capabilities and the collider dimensions must be given before
/// [`build`] succeeds.
///
/// [`build`]: Self::build
pub struct LocomotionControllerBuilder {
    config: LocomotionConfig,
    capsule: Option<CapsuleDimensions>,
    sensor: Option<Box<dyn GroundSensor>>,
    body: Option<Box<dyn Kinematics>>,
    animator: Option<Box<dyn Animator>>,
}

impl LocomotionControllerBuilder {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            capsule: None,
            sensor: None,
            body: None,
            animator: None,
        }
    }

    /// Sets the standing collider dimensions of the character.
    pub fn capsule(mut self, capsule: CapsuleDimensions) -> Self {
        self.capsule = Some(capsule);
        self
    }

    pub fn ground_sensor(mut self, sensor: Box<dyn GroundSensor>) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn kinematics(mut self, body: Box<dyn Kinematics>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Builds the controller.
    ///
    /// # Errors
    ///
    /// Returns an [`InitError`] if a capability or the collider dimensions
    /// are missing or if the collider or the config hold invalid values.
    pub fn build(self) -> Result<LocomotionController, InitError> {
        let sensor = self
            .sensor
            .ok_or(InitError::MissingCapability("ground sensor"))?;
        let body = self
            .body
            .ok_or(InitError::MissingCapability("kinematics"))?;
        let animator = self
            .animator
            .ok_or(InitError::MissingCapability("animator"))?;
        let capsule = self.capsule.ok_or(InitError::MissingCapsule)?;

        if !capsule.is_valid() {
            return Err(InitError::InvalidCapsule {
                height: capsule.height,
                radius: capsule.radius,
            });
        }

        if let Some(field) = self.config.invalid_field() {
            return Err(InitError::InvalidConfig(field));
        }

        let state = CharacterState::new(capsule, body.rotation(), self.config.ground_check_distance);

        Ok(LocomotionController {
            config: self.config,
            state,
            sensor,
            body,
            animator,
            forward_param: Damped::default(),
            turn_param: Damped::default(),
            signals: AnimationSignals::default(),
            step_dt: 0.0,
            phase: TickPhase::Step,
        })
    }
}

impl Debug for LocomotionControllerBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocomotionControllerBuilder")
            .field("config", &self.config)
            .field("capsule", &self.capsule)
            .field("sensor", &self.sensor.is_some())
            .field("kinematics", &self.body.is_some())
            .field("animator", &self.animator.is_some())
            .finish()
    }
}
