//! Animator capabilities and the parameters written to them.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use game_common::math::repeat;

/// A named parameter of the animation blend tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    Forward,
    Turn,
    Crouch,
    OnGround,
    Jump,
    JumpLeg,
}

impl Parameter {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Turn => "Turn",
            Self::Crouch => "Crouch",
            Self::OnGround => "OnGround",
            Self::Jump => "Jump",
            Self::JumpLeg => "JumpLeg",
        }
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Queries against the state machine of the animation player.
pub trait AnimatorQuery {
    /// Returns `true` if the base layer currently plays the state `name`.
    fn is_in_state(&self, name: &str) -> bool;

    /// Returns the normalized playback position of the current state in
    /// `[0, 1)`.
    fn normalized_cycle_phase(&self) -> f32;
}

/// Receives the parameters emitted by a controller.
pub trait AnimationSink {
    fn set_float(&mut self, parameter: Parameter, value: f32);

    fn set_bool(&mut self, parameter: Parameter, value: bool);

    /// Sets the playback speed of the animation player.
    fn set_speed(&mut self, speed: f32);

    /// Selects whether the pose's root motion drives the character.
    fn set_apply_root_motion(&mut self, enabled: bool);
}

/// An animation player that can be both queried and driven.
pub trait Animator: AnimatorQuery + AnimationSink {}

impl<T> Animator for T where T: AnimatorQuery + AnimationSink {}

/// The parameter values emitted by a single controller step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnimationSignals {
    /// Smoothed forward amount.
    pub forward: f32,
    /// Smoothed turn amount.
    pub turn: f32,
    pub crouch: bool,
    pub on_ground: bool,
    /// Vertical velocity, only emitted while airborne.
    pub jump: Option<f32>,
    /// Leading leg times forward amount, only emitted while grounded.
    pub jump_leg: Option<f32>,
    /// Playback speed, only emitted while grounded and moving.
    pub playback_speed: Option<f32>,
    pub apply_root_motion: bool,
}

impl AnimationSignals {
    pub fn write_to<S>(&self, sink: &mut S)
    where
        S: AnimationSink + ?Sized,
    {
        sink.set_apply_root_motion(self.apply_root_motion);
        sink.set_float(Parameter::Forward, self.forward);
        sink.set_float(Parameter::Turn, self.turn);
        sink.set_bool(Parameter::Crouch, self.crouch);
        sink.set_bool(Parameter::OnGround, self.on_ground);

        if let Some(jump) = self.jump {
            sink.set_float(Parameter::Jump, jump);
        }

        if let Some(jump_leg) = self.jump_leg {
            sink.set_float(Parameter::JumpLeg, jump_leg);
        }

        if let Some(speed) = self.playback_speed {
            sink.set_speed(speed);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Value {
    Float(f32),
    Bool(bool),
}

/// An in-memory animator.
///
/// Stores every parameter written to it and plays a single looping state
/// whose phase advances with [`advance`]. Hosts without an animation player
/// use this to drive the controller.
///
/// [`advance`]: Self::advance
#[derive(Clone, Debug)]
pub struct ParameterStore {
    values: HashMap<Parameter, Value>,
    state: String,
    phase: f32,
    /// Length of the current state in seconds.
    cycle_length: f32,
    speed: f32,
    apply_root_motion: bool,
}

impl ParameterStore {
    pub fn new<S>(state: S, cycle_length: f32) -> Self
    where
        S: Into<String>,
    {
        Self {
            values: HashMap::new(),
            state: state.into(),
            phase: 0.0,
            cycle_length,
            speed: 1.0,
            apply_root_motion: false,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Switches to the state `name`, restarting the cycle.
    pub fn play<S>(&mut self, name: S)
    where
        S: Into<String>,
    {
        self.state = name.into();
        self.phase = 0.0;
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = repeat(phase, 1.0);
    }

    /// Advances the current state by `dt` seconds scaled by the playback
    /// speed.
    pub fn advance(&mut self, dt: f32) {
        if self.cycle_length <= 0.0 {
            return;
        }

        self.set_phase(self.phase + dt * self.speed / self.cycle_length);
    }

    pub fn float(&self, parameter: Parameter) -> Option<f32> {
        match self.values.get(&parameter) {
            Some(Value::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bool(&self, parameter: Parameter) -> Option<bool> {
        match self.values.get(&parameter) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn apply_root_motion(&self) -> bool {
        self.apply_root_motion
    }
}

impl AnimatorQuery for ParameterStore {
    fn is_in_state(&self, name: &str) -> bool {
        self.state == name
    }

    fn normalized_cycle_phase(&self) -> f32 {
        self.phase
    }
}

impl AnimationSink for ParameterStore {
    fn set_float(&mut self, parameter: Parameter, value: f32) {
        self.values.insert(parameter, Value::Float(value));
    }

    fn set_bool(&mut self, parameter: Parameter, value: bool) {
        self.values.insert(parameter, Value::Bool(value));
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_apply_root_motion(&mut self, enabled: bool) {
        self.apply_root_motion = enabled;
    }
}

#[cfg(test)]
mod tests {
    use game_common::assert_approx_eq;

    use super::{AnimationSignals, AnimatorQuery, Parameter, ParameterStore};

    #[test]
    fn parameter_names() {
        assert_eq!(Parameter::OnGround.name(), "OnGround");
        assert_eq!(Parameter::JumpLeg.to_string(), "JumpLeg");
    }

    #[test]
    fn parameter_store_advance_wraps() {
        let mut store = ParameterStore::new("Grounded", 2.0);
        store.advance(1.5);
        assert_approx_eq!(store.normalized_cycle_phase(), 0.75);

        store.advance(1.0);
        assert_approx_eq!(store.normalized_cycle_phase(), 0.25);
    }

    #[test]
    fn parameter_store_play_resets_phase() {
        let mut store = ParameterStore::new("Grounded", 1.0);
        store.set_phase(0.5);
        store.play("Landing");

        assert!(store.is_in_state("Landing"));
        assert!(!store.is_in_state("Grounded"));
        assert_eq!(store.normalized_cycle_phase(), 0.0);
    }

    #[test]
    fn signals_skip_absent_parameters() {
        let mut store = ParameterStore::new("Grounded", 1.0);
        let signals = AnimationSignals {
            forward: 0.5,
            turn: -0.25,
            crouch: true,
            on_ground: true,
            jump: None,
            jump_leg: Some(0.5),
            playback_speed: None,
            apply_root_motion: true,
        };
        signals.write_to(&mut store);

        assert_eq!(store.float(Parameter::Forward), Some(0.5));
        assert_eq!(store.float(Parameter::Turn), Some(-0.25));
        assert_eq!(store.bool(Parameter::Crouch), Some(true));
        assert_eq!(store.bool(Parameter::OnGround), Some(true));
        assert_eq!(store.float(Parameter::Jump), None);
        assert_eq!(store.float(Parameter::JumpLeg), Some(0.5));
        assert_eq!(store.speed(), 1.0);
        assert!(store.apply_root_motion());
    }
}
