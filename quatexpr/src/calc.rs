//! Quaternion algebra kernel
//!
//! Closed-form Hamilton product, conjugation, inversion and convention
//! conversion over raw nalgebra vectors, parameterized by the storage
//! [`Convention`]. Value types and the expression layer are built on top of
//! this module.
//!
//! There is exactly one general 4-component product kernel; every
//! quaternion/pure-imaginary operand combination is a zero-padding adapter
//! around it (3-vectors are embedded as zero-real quaternions on the way in,
//! truncated on the way out). Reversed multiplication order is defined as the
//! traditional product with swapped operands, never a separate formula.

use crate::convention::Convention;
use nalgebra::{Vector3, Vector4};
use std::marker::PhantomData;

// ============================================================================
// Operand embedding
// ============================================================================

/// An operand of the product kernel: either a full quaternion 4-vector or a
/// pure-imaginary 3-vector.
pub trait QuatOperand {
    /// View the operand as a full quaternion in the storage layout of `C`.
    fn embed<C: Convention>(&self) -> Vector4<f64>;
}

impl QuatOperand for Vector4<f64> {
    #[inline]
    fn embed<C: Convention>(&self) -> Vector4<f64> {
        *self
    }
}

impl QuatOperand for Vector3<f64> {
    #[inline]
    fn embed<C: Convention>(&self) -> Vector4<f64> {
        let mut q = Vector4::zeros();
        q[C::I] = self[C::PURE_I];
        q[C::J] = self[C::PURE_J];
        q[C::K] = self[C::PURE_K];
        q
    }
}

// ============================================================================
// Kernel
// ============================================================================

/// Quaternion calculator for the convention `C`.
///
/// All operations are closed-form and total over their numeric inputs; the
/// only preconditions are semantic (see [`QuatCalc::invert`]).
pub struct QuatCalc<C: Convention>(PhantomData<C>);

impl<C: Convention> QuatCalc<C> {
    /// The multiplicative identity: real component 1, imaginary components 0.
    pub fn identity() -> Vector4<f64> {
        Self::basis_element(0)
    }

    /// Basis quaternion for a logical slot: 0 = real, 1 = i, 2 = j, 3 = k.
    pub fn basis_element(slot: usize) -> Vector4<f64> {
        debug_assert!(slot < 4, "logical basis slot out of range: {slot}");
        let mut q = Vector4::zeros();
        q[if C::REAL_FIRST { slot } else { (slot + 3) % 4 }] = 1.0;
        q
    }

    /// Embed a pure-imaginary 3-vector as a zero-real quaternion.
    #[inline]
    pub fn embed_pure(v: &Vector3<f64>) -> Vector4<f64> {
        v.embed::<C>()
    }

    /// The three imaginary components, in i, j, k order.
    #[inline]
    pub fn imag_part(q: &Vector4<f64>) -> Vector3<f64> {
        // i, j, k are contiguous in storage for every convention.
        q.fixed_rows::<3>(C::I).into_owned()
    }

    /// General Hamilton product in traditional order.
    fn mul_traditional_full(a: &Vector4<f64>, b: &Vector4<f64>) -> Vector4<f64> {
        let mut r = Vector4::zeros();
        r[C::I] = a[C::I] * b[C::REAL] + a[C::J] * b[C::K] - a[C::K] * b[C::J]
            + a[C::REAL] * b[C::I];
        r[C::J] = a[C::K] * b[C::I] - a[C::I] * b[C::K] + a[C::J] * b[C::REAL]
            + a[C::REAL] * b[C::J];
        r[C::K] = a[C::I] * b[C::J] - a[C::J] * b[C::I] + a[C::K] * b[C::REAL]
            + a[C::REAL] * b[C::K];
        r[C::REAL] = a[C::REAL] * b[C::REAL]
            - a[C::I] * b[C::I]
            - a[C::J] * b[C::J]
            - a[C::K] * b[C::K];
        r
    }

    /// Hamilton product in traditional order, for any combination of full
    /// and pure-imaginary operands.
    #[inline]
    pub fn mul_traditional<A: QuatOperand, B: QuatOperand>(a: &A, b: &B) -> Vector4<f64> {
        Self::mul_traditional_full(&a.embed::<C>(), &b.embed::<C>())
    }

    /// Traditional product with the real part of the result dropped.
    #[inline]
    pub fn mul_traditional_imag<A: QuatOperand, B: QuatOperand>(a: &A, b: &B) -> Vector3<f64> {
        Self::imag_part(&Self::mul_traditional(a, b))
    }

    /// Product in the order selected by the convention.
    #[inline]
    pub fn mul<A: QuatOperand, B: QuatOperand>(a: &A, b: &B) -> Vector4<f64> {
        if C::TRADITIONAL_ORDER {
            Self::mul_traditional(a, b)
        } else {
            Self::mul_traditional(b, a)
        }
    }

    /// Convention-order product with the real part of the result dropped.
    #[inline]
    pub fn mul_imag<A: QuatOperand, B: QuatOperand>(a: &A, b: &B) -> Vector3<f64> {
        Self::imag_part(&Self::mul(a, b))
    }

    /// Negate the imaginary components, leave the real component unchanged.
    pub fn conjugate(q: &Vector4<f64>) -> Vector4<f64> {
        let mut r = *q;
        r.fixed_rows_mut::<3>(C::I).neg_mut();
        r
    }

    /// Multiplicative inverse: conjugate divided by the squared norm.
    ///
    /// For a unit quaternion this equals the conjugate; the division is
    /// always performed so non-unit inputs invert correctly. The input must
    /// be nonzero — a zero-norm quaternion divides by zero.
    pub fn invert(q: &Vector4<f64>) -> Vector4<f64> {
        Self::conjugate(q) / q.norm_squared()
    }

    /// Rotate a point by a unit quaternion.
    ///
    /// Closed form of the sandwich product `q p conj(q)` (under the
    /// convention's own multiplication order), avoiding the two full
    /// quaternion products:
    ///
    /// `p' = (r^2 - <i,i>) p + 2 <p,i> i -/+ 2 r (p x i)`
    ///
    /// with the cross-term sign tied to the multiplication order, so the
    /// identity with the explicit sandwich holds for all four conventions.
    /// `q` must be unit-norm; a non-unit input silently scales the result.
    pub fn rotate(q: &Vector4<f64>, p: &Vector3<f64>) -> Vector3<f64> {
        let r = q[C::REAL];
        let im = Self::imag_part(q);
        let base = p * (r * r - im.dot(&im)) + im * (2.0 * p.dot(&im));
        let cross = p.cross(&im) * (2.0 * r);
        if C::TRADITIONAL_ORDER {
            base - cross
        } else {
            base + cross
        }
    }

    /// Re-express a quaternion of this convention under another convention,
    /// preserving the rotation it represents.
    ///
    /// The real slot is re-permuted; when the multiplication handedness
    /// differs the imaginary components are negated. Round-tripping through
    /// any mode pair is exactly the identity.
    pub fn convert_to<To: Convention>(q: &Vector4<f64>) -> Vector4<f64> {
        let sign = if C::TRADITIONAL_ORDER == To::TRADITIONAL_ORDER {
            1.0
        } else {
            -1.0
        };
        let mut r = Vector4::zeros();
        r[To::REAL] = q[C::REAL];
        r[To::I] = sign * q[C::I];
        r[To::J] = sign * q[C::J];
        r[To::K] = sign * q[C::K];
        r
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{
        RealFirstReversed, RealFirstTraditional, RealLastReversed, RealLastTraditional,
    };
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_quat(rng: &mut ChaCha8Rng) -> Vector4<f64> {
        Vector4::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
    }

    fn random_unit_quat(rng: &mut ChaCha8Rng) -> Vector4<f64> {
        loop {
            let q = random_quat(rng);
            if q.norm() > 1e-3 {
                return q / q.norm();
            }
        }
    }

    fn random_vec3(rng: &mut ChaCha8Rng) -> Vector3<f64> {
        Vector3::new(
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-2.0..2.0),
        )
    }

    fn check_identity_mult<C: Convention>(rng: &mut ChaCha8Rng) {
        let id = QuatCalc::<C>::identity();
        for _ in 0..20 {
            let q = random_quat(rng);
            assert_eq!(QuatCalc::<C>::mul(&id, &q), q);
            assert_eq!(QuatCalc::<C>::mul(&q, &id), q);
        }
    }

    #[test]
    fn test_identity_is_neutral_all_conventions() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        check_identity_mult::<RealFirstTraditional>(&mut rng);
        check_identity_mult::<RealFirstReversed>(&mut rng);
        check_identity_mult::<RealLastTraditional>(&mut rng);
        check_identity_mult::<RealLastReversed>(&mut rng);
    }

    #[test]
    fn test_default_convention_scenarios() {
        type Calc = QuatCalc<RealFirstTraditional>;

        // Identity squared is the identity.
        let id = Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(Calc::mul(&id, &id), id);

        // i * i = -1
        let i = Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!(Calc::mul(&i, &i), Vector4::new(-1.0, 0.0, 0.0, 0.0));

        // Identity rotation is a no-op.
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Calc::rotate(&id, &p), p);
    }

    #[test]
    fn test_basis_element_placement() {
        // Real-first: logical slot equals the storage slot.
        assert_eq!(
            QuatCalc::<RealFirstTraditional>::basis_element(1),
            Vector4::new(0.0, 1.0, 0.0, 0.0)
        );
        // Real-last: the real component lives in slot 3, i in slot 0.
        assert_eq!(
            QuatCalc::<RealLastTraditional>::basis_element(0),
            Vector4::new(0.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(
            QuatCalc::<RealLastTraditional>::basis_element(1),
            Vector4::new(1.0, 0.0, 0.0, 0.0)
        );
    }

    fn check_basis_table<C: Convention>() {
        type V4 = Vector4<f64>;
        let neg_id: V4 = -QuatCalc::<C>::identity();
        for slot in 1..4 {
            let b = QuatCalc::<C>::basis_element(slot);
            // Each imaginary basis element squares to -1.
            assert_eq!(QuatCalc::<C>::mul_traditional(&b, &b), neg_id);
        }
        // i j = k in traditional order.
        let i = QuatCalc::<C>::basis_element(1);
        let j = QuatCalc::<C>::basis_element(2);
        let k = QuatCalc::<C>::basis_element(3);
        assert_eq!(QuatCalc::<C>::mul_traditional(&i, &j), k);
    }

    #[test]
    fn test_basis_multiplication_table() {
        check_basis_table::<RealFirstTraditional>();
        check_basis_table::<RealFirstReversed>();
        check_basis_table::<RealLastTraditional>();
        check_basis_table::<RealLastReversed>();
    }

    fn check_invert<C: Convention>(rng: &mut ChaCha8Rng) {
        let id = QuatCalc::<C>::identity();
        for _ in 0..20 {
            // Deliberately non-unit input: invert must still work.
            let q = random_quat(rng) * 3.0;
            if q.norm() < 1e-3 {
                continue;
            }
            let prod = QuatCalc::<C>::mul(&q, &QuatCalc::<C>::invert(&q));
            assert_abs_diff_eq!(prod, id, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invert_all_conventions() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        check_invert::<RealFirstTraditional>(&mut rng);
        check_invert::<RealFirstReversed>(&mut rng);
        check_invert::<RealLastTraditional>(&mut rng);
        check_invert::<RealLastReversed>(&mut rng);
    }

    #[test]
    fn test_conjugate_components() {
        type C = RealLastTraditional;
        let q = Vector4::new(1.0, 2.0, 3.0, 4.0);
        let c = QuatCalc::<C>::conjugate(&q);
        assert_eq!(c[C::REAL], q[C::REAL]);
        assert_eq!(
            QuatCalc::<C>::imag_part(&c),
            -QuatCalc::<C>::imag_part(&q)
        );
    }

    fn check_overload_consistency<C: Convention>(rng: &mut ChaCha8Rng) {
        for _ in 0..20 {
            let a4 = random_quat(rng);
            let b4 = random_quat(rng);
            let a3 = random_vec3(rng);
            let b3 = random_vec3(rng);

            // Pure operands behave exactly like their zero-real embeddings.
            let a3e = QuatCalc::<C>::embed_pure(&a3);
            let b3e = QuatCalc::<C>::embed_pure(&b3);
            assert_eq!(
                QuatCalc::<C>::mul_traditional(&a3, &b4),
                QuatCalc::<C>::mul_traditional(&a3e, &b4)
            );
            assert_eq!(
                QuatCalc::<C>::mul_traditional(&a4, &b3),
                QuatCalc::<C>::mul_traditional(&a4, &b3e)
            );
            assert_eq!(
                QuatCalc::<C>::mul_traditional(&a3, &b3),
                QuatCalc::<C>::mul_traditional(&a3e, &b3e)
            );

            // Imaginary-returning variants equal the imaginary part of the
            // full-quaternion variants.
            assert_eq!(
                QuatCalc::<C>::mul_traditional_imag(&a4, &b4),
                QuatCalc::<C>::imag_part(&QuatCalc::<C>::mul_traditional(&a4, &b4))
            );
            assert_eq!(
                QuatCalc::<C>::mul_traditional_imag(&a3, &b4),
                QuatCalc::<C>::imag_part(&QuatCalc::<C>::mul_traditional(&a3, &b4))
            );
            assert_eq!(
                QuatCalc::<C>::mul_traditional_imag(&a4, &b3),
                QuatCalc::<C>::imag_part(&QuatCalc::<C>::mul_traditional(&a4, &b3))
            );
            assert_eq!(
                QuatCalc::<C>::mul_imag(&a4, &b4),
                QuatCalc::<C>::imag_part(&QuatCalc::<C>::mul(&a4, &b4))
            );
        }
    }

    #[test]
    fn test_overload_consistency_all_conventions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        check_overload_consistency::<RealFirstTraditional>(&mut rng);
        check_overload_consistency::<RealFirstReversed>(&mut rng);
        check_overload_consistency::<RealLastTraditional>(&mut rng);
        check_overload_consistency::<RealLastReversed>(&mut rng);
    }

    #[test]
    fn test_reversed_order_is_swapped_traditional() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            let a = random_quat(&mut rng);
            let b = random_quat(&mut rng);
            // Bit-identical, not merely close.
            assert_eq!(
                QuatCalc::<RealFirstReversed>::mul(&a, &b),
                QuatCalc::<RealFirstTraditional>::mul(&b, &a)
            );
            assert_eq!(
                QuatCalc::<RealLastReversed>::mul(&a, &b),
                QuatCalc::<RealLastTraditional>::mul(&b, &a)
            );
        }
    }

    fn check_rotate_matches_sandwich<C: Convention>(rng: &mut ChaCha8Rng) {
        for _ in 0..20 {
            let q = random_unit_quat(rng);
            let p = random_vec3(rng);
            let sandwich = QuatCalc::<C>::imag_part(&QuatCalc::<C>::mul(
                &QuatCalc::<C>::mul(&q, &p),
                &QuatCalc::<C>::conjugate(&q),
            ));
            assert_abs_diff_eq!(QuatCalc::<C>::rotate(&q, &p), sandwich, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotate_matches_sandwich_all_conventions() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        check_rotate_matches_sandwich::<RealFirstTraditional>(&mut rng);
        check_rotate_matches_sandwich::<RealFirstReversed>(&mut rng);
        check_rotate_matches_sandwich::<RealLastTraditional>(&mut rng);
        check_rotate_matches_sandwich::<RealLastReversed>(&mut rng);
    }

    #[test]
    fn test_rotate_90deg_about_z() {
        type Calc = QuatCalc<RealFirstTraditional>;
        let half = std::f64::consts::FRAC_PI_4;
        let q = Vector4::new(half.cos(), 0.0, 0.0, half.sin());
        let rotated = Calc::rotate(&q, &Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(rotated, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    fn check_convert_round_trip<A: Convention, B: Convention>(q: &Vector4<f64>) {
        let there = QuatCalc::<A>::convert_to::<B>(q);
        let back = QuatCalc::<B>::convert_to::<A>(&there);
        // Exact, including A == B.
        assert_eq!(back, *q);
    }

    #[test]
    fn test_convert_round_trips_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..10 {
            let q = random_quat(&mut rng);
            macro_rules! pairs {
                ($($a:ty),*) => {{
                    $(
                        check_convert_round_trip::<$a, RealFirstTraditional>(&q);
                        check_convert_round_trip::<$a, RealFirstReversed>(&q);
                        check_convert_round_trip::<$a, RealLastTraditional>(&q);
                        check_convert_round_trip::<$a, RealLastReversed>(&q);
                    )*
                }};
            }
            pairs!(
                RealFirstTraditional,
                RealFirstReversed,
                RealLastTraditional,
                RealLastReversed
            );
        }
    }

    fn check_convert_preserves_rotation<A: Convention, B: Convention>(rng: &mut ChaCha8Rng) {
        for _ in 0..10 {
            let q = random_unit_quat(rng);
            let p = random_vec3(rng);
            let converted = QuatCalc::<A>::convert_to::<B>(&q);
            assert_abs_diff_eq!(
                QuatCalc::<A>::rotate(&q, &p),
                QuatCalc::<B>::rotate(&converted, &p),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_convert_preserves_rotation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        check_convert_preserves_rotation::<RealFirstTraditional, RealLastTraditional>(&mut rng);
        check_convert_preserves_rotation::<RealFirstTraditional, RealFirstReversed>(&mut rng);
        check_convert_preserves_rotation::<RealFirstTraditional, RealLastReversed>(&mut rng);
        check_convert_preserves_rotation::<RealLastReversed, RealFirstTraditional>(&mut rng);
    }
}
