//! Unit quaternion value type and its tangent-space derivative rules
//!
//! A [`UnitQuaternion`] wraps a 4-vector whose layout is fixed by the
//! convention type parameter. Values are immutable; every operation returns
//! a new value.
//!
//! # Tangent convention
//!
//! A quaternion tangent is a 3-vector `t` acting multiplicatively on the
//! right: `q ⊞ t = q * exp(t)`. Point tangents are plain displacements.
//! Every `*_diff` rule below is the linearization of its operation under
//! this convention: for small `eps`,
//! `(op(q * exp(eps * t)) ⊟ op(q)) / eps` converges to the rule's output.

use crate::calc::QuatCalc;
use crate::convention::{Convention, DefaultConvention};
use crate::point::Point3;
use nalgebra::{Vector3, Vector4};
use std::marker::PhantomData;
use std::ops::{Mul, Neg};
use std::sync::LazyLock;

/// A rotation represented by a unit-norm quaternion.
///
/// The unit-norm invariant is a caller contract, checked only in debug
/// builds: constructing from a non-unit 4-vector silently yields a
/// non-isometric "rotation" in release builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitQuaternion<C: Convention = DefaultConvention> {
    coeffs: Vector4<f64>,
    _mode: PhantomData<C>,
}

/// Process-wide identity quaternion in the default convention.
pub static IDENTITY: LazyLock<UnitQuaternion> = LazyLock::new(UnitQuaternion::identity);
/// Process-wide i basis quaternion in the default convention.
pub static I: LazyLock<UnitQuaternion> = LazyLock::new(UnitQuaternion::i);
/// Process-wide j basis quaternion in the default convention.
pub static J: LazyLock<UnitQuaternion> = LazyLock::new(UnitQuaternion::j);
/// Process-wide k basis quaternion in the default convention.
pub static K: LazyLock<UnitQuaternion> = LazyLock::new(UnitQuaternion::k);

impl<C: Convention> UnitQuaternion<C> {
    /// Wrap a 4-vector laid out per the convention `C`.
    ///
    /// The caller must supply a normalized vector.
    pub fn from_coeffs(coeffs: Vector4<f64>) -> Self {
        debug_assert!(
            (coeffs.norm_squared() - 1.0).abs() < 1e-6,
            "UnitQuaternion built from non-unit coefficients (norm^2 = {})",
            coeffs.norm_squared()
        );
        Self {
            coeffs,
            _mode: PhantomData,
        }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::from_coeffs(QuatCalc::<C>::identity())
    }

    /// The i basis quaternion (half-turn generator about x).
    pub fn i() -> Self {
        Self::from_coeffs(QuatCalc::<C>::basis_element(1))
    }

    /// The j basis quaternion.
    pub fn j() -> Self {
        Self::from_coeffs(QuatCalc::<C>::basis_element(2))
    }

    /// The k basis quaternion.
    pub fn k() -> Self {
        Self::from_coeffs(QuatCalc::<C>::basis_element(3))
    }

    /// The underlying coefficient vector, in the storage order of `C`.
    #[inline]
    pub fn coeffs(&self) -> &Vector4<f64> {
        &self.coeffs
    }

    /// The real component.
    #[inline]
    pub fn real(&self) -> f64 {
        self.coeffs[C::REAL]
    }

    /// The imaginary components as a pure-imaginary 3-vector.
    #[inline]
    pub fn imag(&self) -> Vector3<f64> {
        QuatCalc::<C>::imag_part(&self.coeffs)
    }

    /// Component-wise negation. `-q` represents the same rotation as `q`.
    pub fn negate(&self) -> Self {
        Self {
            coeffs: -self.coeffs,
            _mode: PhantomData,
        }
    }

    /// The inverse rotation (conjugate; the inverse for unit quaternions).
    pub fn inverse(&self) -> Self {
        Self {
            coeffs: QuatCalc::<C>::conjugate(&self.coeffs),
            _mode: PhantomData,
        }
    }

    /// Exponential of a pure-imaginary tangent: `cos|t| + sinc|t| * t`.
    ///
    /// `exp(t)` rotates by the angle `2 |t|` about `t`.
    pub fn exp(tangent: &Vector3<f64>) -> Self {
        let theta_sq = tangent.norm_squared();
        let theta = theta_sq.sqrt();
        // Taylor fallback keeps the map smooth through zero.
        let (w, sinc) = if theta < 1e-6 {
            (1.0 - 0.5 * theta_sq, 1.0 - theta_sq / 6.0)
        } else {
            (theta.cos(), theta.sin() / theta)
        };
        let mut coeffs = QuatCalc::<C>::embed_pure(&(tangent * sinc));
        coeffs[C::REAL] = w;
        Self::from_coeffs(coeffs)
    }

    /// Principal logarithm, the inverse of [`UnitQuaternion::exp`].
    ///
    /// Undefined at the antipode of the identity (real component -1).
    pub fn log(&self) -> Vector3<f64> {
        let im = self.imag();
        let n = im.norm();
        let w = self.real();
        if n < 1e-9 {
            im / w
        } else {
            im * (n.atan2(w) / n)
        }
    }

    /// Rotate a raw 3-vector.
    #[inline]
    pub fn rotate_vec(&self, v: &Vector3<f64>) -> Vector3<f64> {
        QuatCalc::<C>::rotate(&self.coeffs, v)
    }

    /// Rotate a point.
    pub fn rotate(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotate_vec(p.coords()))
    }

    /// Re-express this rotation under another convention.
    pub fn convert<To: Convention>(&self) -> UnitQuaternion<To> {
        UnitQuaternion::from_coeffs(QuatCalc::<C>::convert_to::<To>(&self.coeffs))
    }

    // ------------------------------------------------------------------------
    // Differential rules
    // ------------------------------------------------------------------------

    /// Tangent map of [`UnitQuaternion::negate`]: the identity map, since
    /// `-(q * exp(t)) = (-q) * exp(t)`.
    pub fn negate_diff(&self, tangent: &Vector3<f64>) -> Vector3<f64> {
        *tangent
    }

    /// Tangent map of [`UnitQuaternion::inverse`]: the input tangent,
    /// sandwiched through the quaternion and negated.
    pub fn inverse_diff(&self, tangent: &Vector3<f64>) -> Vector3<f64> {
        -self.rotate_vec(tangent)
    }

    /// Tangent map of multiplication `self * other`: each operand's tangent
    /// carried through multiplication by the other operand, summed.
    pub fn multiply_diff(
        &self,
        self_tangent: &Vector3<f64>,
        other: &Self,
        other_tangent: &Vector3<f64>,
    ) -> Vector3<f64> {
        other.inverse().rotate_vec(self_tangent) + other_tangent
    }

    /// Tangent map of [`UnitQuaternion::rotate`]: the combined perturbation
    /// sandwiched through the quaternion, imaginary part only.
    ///
    /// The quaternion tangent enters as the commutator `2 t x p`, whose sign
    /// follows the multiplication handedness.
    pub fn rotate_diff(
        &self,
        self_tangent: &Vector3<f64>,
        point: &Point3,
        point_tangent: &Vector3<f64>,
    ) -> Vector3<f64> {
        let twist = self_tangent.cross(point.coords()) * 2.0;
        let combined = if C::TRADITIONAL_ORDER {
            twist + point_tangent
        } else {
            point_tangent - twist
        };
        self.rotate_vec(&combined)
    }
}

impl<C: Convention> Mul for UnitQuaternion<C> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_coeffs(QuatCalc::<C>::mul(&self.coeffs, &rhs.coeffs))
    }
}

impl<C: Convention> Neg for UnitQuaternion<C> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}
