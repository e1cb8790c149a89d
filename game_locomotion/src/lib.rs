//! Third-person character locomotion.
//!
//! The [`LocomotionController`] turns a movement intent and crouch/jump
//! intents into velocity and rotation writes, ground contact state and
//! animation parameters. The engine services it needs are injected through
//! the capability traits [`GroundSensor`], [`Kinematics`] and [`Animator`].
//!
//! # Tick contract
//!
//! Every simulation tick the host calls [`LocomotionController::step`] once,
//! evaluates the animation pose and then calls
//! [`LocomotionController::commit_root_motion`] once with the root
//! displacement of that pose. The two calls must happen in this order.

pub mod animator;
pub mod config;
pub mod controller;
pub mod error;
pub mod kinematics;
pub mod sensor;
pub mod state;

pub use animator::{
    AnimationSignals, AnimationSink, Animator, AnimatorQuery, Parameter, ParameterStore,
};
pub use config::{ConfigError, LocomotionConfig};
pub use controller::{LocomotionController, LocomotionControllerBuilder};
pub use error::InitError;
pub use kinematics::Kinematics;
pub use sensor::{GroundSensor, ProbeHit};
pub use state::{CapsuleDimensions, CharacterState};
