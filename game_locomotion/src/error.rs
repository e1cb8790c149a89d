use thiserror::Error;

/// Errors returned when building a [`LocomotionController`].
///
/// All of these are configuration faults of the host. A controller that
/// failed to build cannot be stepped.
///
/// [`LocomotionController`]: crate::LocomotionController
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InitError {
    #[error("no {0} capability bound")]
    MissingCapability(&'static str),
    #[error("no capsule collider dimensions given")]
    MissingCapsule,
    #[error("invalid capsule collider: height {height}, radius {radius}")]
    InvalidCapsule { height: f32, radius: f32 },
    #[error("invalid locomotion config value for `{0}`")]
    InvalidConfig(&'static str),
}
