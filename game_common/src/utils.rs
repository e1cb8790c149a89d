use std::fmt::{Arguments, Debug};

use glam::{Quat, Vec3};

/// Floating-point approximate equality comparsion.
///
/// Values are considered equal when their difference does not exceed a
/// small tolerance scaled by the magnitude of the operands:
/// ```
/// # fn approx_eq(lhs: f32, rhs: f32) -> bool {
/// (lhs - rhs).abs() <= 1e-5 * lhs.abs().max(rhs.abs()).max(1.0)
/// # }
/// ```
///
/// Vectors and quaternions are compared component-wise.
#[macro_export]
macro_rules! assert_approx_eq {
    // Note that we're going through a function so rustc can infer what
    // type `$lhs` and `$rhs` is.
    ($lhs:expr, $rhs:expr $(,)?) => {{
        $crate::utils::approx_eq_assertion($lhs, $rhs, ::core::option::Option::None);
    }};
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {{
        $crate::utils::approx_eq_assertion($lhs, $rhs, ::core::option::Option::Some(
            ::core::format_args!($($arg)+)
        ));
    }};
}

/// A type that can be compared for approximate equality.
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f32 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= 1e-5 * scale
    }
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= 1e-9 * scale
    }
}

impl ApproxEq for Vec3 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.x.approx_eq(&other.x) && self.y.approx_eq(&other.y) && self.z.approx_eq(&other.z)
    }
}

impl ApproxEq for Quat {
    fn approx_eq(&self, other: &Self) -> bool {
        // `q` and `-q` describe the same rotation.
        let lhs = if self.dot(*other) < 0.0 { -*self } else { *self };
        lhs.x.approx_eq(&other.x)
            && lhs.y.approx_eq(&other.y)
            && lhs.z.approx_eq(&other.z)
            && lhs.w.approx_eq(&other.w)
    }
}

#[track_caller]
#[doc(hidden)]
pub fn approx_eq_assertion<T>(lhs: T, rhs: T, args: Option<Arguments<'_>>)
where
    T: ApproxEq + Debug,
{
    if !lhs.approx_eq(&rhs) {
        approx_eq_assertion_failed(lhs, rhs, args);
    }
}

#[track_caller]
#[doc(hidden)]
fn approx_eq_assertion_failed<T>(lhs: T, rhs: T, args: Option<Arguments<'_>>)
where
    T: Debug,
{
    match args {
        Some(args) => {
            panic!(
                r#"assertion failed: `(left ~= right)`
                left: `{:?}`
                right: `{:?}`: {}
                "#,
                lhs, rhs, args,
            );
        }
        None => {
            panic!(
                r#"assertion failed: `(left ~= right)`
                left: `{:?}`
                right: `{:?}`
                "#,
                lhs, rhs
            );
        }
    }
}
