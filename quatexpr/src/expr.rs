//! Deferred expression composition
//!
//! Every operation is also invocable as a typed expression node that keeps
//! its operands and can be evaluated later. Evaluation is observationally
//! equivalent to the eager methods; the node form exists so derivative rules
//! chain across multi-operation expressions without hand-deriving combined
//! closed forms.
//!
//! Differentiation is forward-mode: each literal carries a seed tangent, and
//! [`QuatExpr::differentiate`] / [`PointExpr::differentiate`] push the seeds
//! through the chain of local rules, one directional derivative per pass.
//! Full Jacobians come from seeding the three basis tangents (see
//! [`jacobian`]).

use crate::convention::{Convention, DefaultConvention};
use crate::point::Point3;
use crate::quaternion::UnitQuaternion;
use nalgebra::{Matrix3, Vector3};

/// A quaternion-valued expression node.
#[derive(Debug, Clone)]
pub enum QuatExpr<C: Convention = DefaultConvention> {
    Literal {
        value: UnitQuaternion<C>,
        tangent: Vector3<f64>,
    },
    Negate(Box<QuatExpr<C>>),
    Inverse(Box<QuatExpr<C>>),
    Multiply(Box<QuatExpr<C>>, Box<QuatExpr<C>>),
}

/// A point-valued expression node.
#[derive(Debug, Clone)]
pub enum PointExpr<C: Convention = DefaultConvention> {
    Literal {
        value: Point3,
        tangent: Vector3<f64>,
    },
    Rotate(QuatExpr<C>, Box<PointExpr<C>>),
}

impl<C: Convention> QuatExpr<C> {
    /// A constant leaf (zero tangent).
    pub fn literal(value: UnitQuaternion<C>) -> Self {
        Self::Literal {
            value,
            tangent: Vector3::zeros(),
        }
    }

    /// A perturbed leaf carrying its seed tangent.
    pub fn variable(value: UnitQuaternion<C>, tangent: Vector3<f64>) -> Self {
        Self::Literal { value, tangent }
    }

    pub fn negate(self) -> Self {
        Self::Negate(Box::new(self))
    }

    pub fn inverse(self) -> Self {
        Self::Inverse(Box::new(self))
    }

    pub fn times(self, other: Self) -> Self {
        Self::Multiply(Box::new(self), Box::new(other))
    }

    pub fn rotate(self, point: PointExpr<C>) -> PointExpr<C> {
        PointExpr::Rotate(self, Box::new(point))
    }

    /// Evaluate the expression eagerly.
    pub fn eval(&self) -> UnitQuaternion<C> {
        match self {
            Self::Literal { value, .. } => *value,
            Self::Negate(e) => e.eval().negate(),
            Self::Inverse(e) => e.eval().inverse(),
            Self::Multiply(a, b) => a.eval() * b.eval(),
        }
    }

    /// The output tangent for the seed tangents stored in the leaves.
    pub fn differentiate(&self) -> Vector3<f64> {
        match self {
            Self::Literal { tangent, .. } => *tangent,
            Self::Negate(e) => e.eval().negate_diff(&e.differentiate()),
            Self::Inverse(e) => e.eval().inverse_diff(&e.differentiate()),
            Self::Multiply(a, b) => {
                a.eval()
                    .multiply_diff(&a.differentiate(), &b.eval(), &b.differentiate())
            }
        }
    }
}

impl<C: Convention> PointExpr<C> {
    /// A constant leaf (zero tangent).
    pub fn literal(value: Point3) -> Self {
        Self::Literal {
            value,
            tangent: Vector3::zeros(),
        }
    }

    /// A perturbed leaf carrying its seed displacement.
    pub fn variable(value: Point3, tangent: Vector3<f64>) -> Self {
        Self::Literal { value, tangent }
    }

    /// Evaluate the expression eagerly.
    pub fn eval(&self) -> Point3 {
        match self {
            Self::Literal { value, .. } => *value,
            Self::Rotate(q, p) => q.eval().rotate(&p.eval()),
        }
    }

    /// The output tangent for the seed tangents stored in the leaves.
    pub fn differentiate(&self) -> Vector3<f64> {
        match self {
            Self::Literal { tangent, .. } => *tangent,
            Self::Rotate(q, p) => {
                q.eval()
                    .rotate_diff(&q.differentiate(), &p.eval(), &p.differentiate())
            }
        }
    }
}

/// Assemble the 3x3 Jacobian of a point-valued expression with respect to one
/// leaf, by seeding that leaf with each basis tangent in turn.
///
/// `build` receives the seed tangent and returns the expression with the seed
/// placed in the leaf being differentiated (all other leaves constant).
pub fn jacobian<C, F>(build: F) -> Matrix3<f64>
where
    C: Convention,
    F: Fn(Vector3<f64>) -> PointExpr<C>,
{
    let mut jac = Matrix3::zeros();
    for axis in 0..3 {
        let mut seed = Vector3::zeros();
        seed[axis] = 1.0;
        jac.set_column(axis, &build(seed).differentiate());
    }
    jac
}
