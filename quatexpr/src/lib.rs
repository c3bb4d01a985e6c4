//! quatexpr: unit quaternion algebra with compile-time convention dispatch
//!
//! This crate provides unit quaternions and 3D points whose operations
//! (multiply, invert, rotate) carry analytic tangent-space derivative rules,
//! so composed expressions can be differentiated by chaining local Jacobians
//! instead of re-deriving combined closed forms by hand.
//!
//! The component-ordering convention (which slot holds the real part, and
//! which multiplication handedness is used) is a type parameter, so index
//! computation monomorphizes away with no runtime branching.

pub mod calc;
pub mod convention;
pub mod expr;
pub mod point;
pub mod quaternion;

pub use calc::{QuatCalc, QuatOperand};
pub use convention::{
    Convention, DefaultConvention, RealFirstReversed, RealFirstTraditional, RealLastReversed,
    RealLastTraditional,
};
pub use expr::{jacobian, PointExpr, QuatExpr};
pub use point::Point3;
pub use quaternion::UnitQuaternion;

// Re-export nalgebra for convenience
pub use nalgebra;
