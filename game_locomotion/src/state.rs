use glam::{Quat, Vec3};

/// Dimensions of the upright capsule collider of a character.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CapsuleDimensions {
    /// Total height including both hemispheres.
    pub height: f32,
    /// Offset of the capsule center from the character's feet.
    pub center_offset: Vec3,
    pub radius: f32,
}

impl CapsuleDimensions {
    /// Creates a capsule standing on the origin.
    pub fn new(height: f32, radius: f32) -> Self {
        Self {
            height,
            center_offset: Vec3::new(0.0, height * 0.5, 0.0),
            radius,
        }
    }

    /// Returns the crouched configuration of this capsule.
    ///
    /// Height and center offset are halved, the radius is kept.
    #[inline]
    pub fn crouched(self) -> Self {
        Self {
            height: self.height * 0.5,
            center_offset: self.center_offset * 0.5,
            radius: self.radius,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.height.is_finite()
            && self.radius.is_finite()
            && self.center_offset.is_finite()
            && self.height > 0.0
            && self.radius > 0.0
    }
}

/// Per-character locomotion state.
///
/// Only the owning [`LocomotionController`] mutates this.
///
/// [`LocomotionController`]: crate::LocomotionController
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterState {
    pub orientation: Quat,
    /// Normal of the surface below the character, [`Vec3::Y`] while airborne.
    pub ground_normal: Vec3,
    pub is_grounded: bool,
    /// Set while the collider is shortened or there is no room to stand up.
    pub is_crouching: bool,
    /// Current collider dimensions, either `standing_capsule` or its
    /// [`crouched`] configuration.
    ///
    /// [`crouched`]: CapsuleDimensions::crouched
    pub capsule: CapsuleDimensions,
    pub standing_capsule: CapsuleDimensions,
    /// Angle in radians towards the movement direction of the last step.
    pub turn_amount: f32,
    /// Forward component of the movement of the last step.
    pub forward_amount: f32,
    pub ground_check_distance: f32,
    /// Whether animation root motion currently drives the position.
    pub root_motion_enabled: bool,
}

impl CharacterState {
    pub fn new(capsule: CapsuleDimensions, orientation: Quat, ground_check_distance: f32) -> Self {
        Self {
            orientation,
            ground_normal: Vec3::Y,
            is_grounded: false,
            is_crouching: false,
            capsule,
            standing_capsule: capsule,
            turn_amount: 0.0,
            forward_amount: 0.0,
            ground_check_distance,
            root_motion_enabled: false,
        }
    }

    /// Returns `true` if the collider is in the crouched configuration.
    #[inline]
    pub fn is_capsule_crouched(&self) -> bool {
        self.capsule != self.standing_capsule
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::{CapsuleDimensions, CharacterState};

    #[test]
    fn capsule_crouched_halves_height_and_center() {
        let capsule = CapsuleDimensions::new(1.8, 0.3);
        let crouched = capsule.crouched();

        assert_eq!(crouched.height, 0.9);
        assert_eq!(crouched.center_offset, Vec3::new(0.0, 0.45, 0.0));
        assert_eq!(crouched.radius, 0.3);
    }

    #[test]
    fn capsule_invalid() {
        assert!(CapsuleDimensions::new(1.8, 0.3).is_valid());
        assert!(!CapsuleDimensions::new(0.0, 0.3).is_valid());
        assert!(!CapsuleDimensions::new(1.8, -1.0).is_valid());
        assert!(!CapsuleDimensions::new(f32::INFINITY, 0.3).is_valid());
    }

    #[test]
    fn character_state_starts_standing() {
        let state = CharacterState::new(CapsuleDimensions::new(1.8, 0.3), Quat::IDENTITY, 0.1);

        assert!(!state.is_capsule_crouched());
        assert!(!state.is_crouching);
        assert_eq!(state.ground_normal, Vec3::Y);
    }
}
