//! The common core shared by the locomotion crates.
//!
//! Contains the math helpers used by the controller and the physics backend
//! as well as test utilities.

extern crate self as game_common;

pub mod math;
pub mod utils;

pub use math::{Ray, RotationExt};
