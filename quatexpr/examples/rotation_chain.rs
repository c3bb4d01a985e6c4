//! Chained-rotation example showing eager and deferred evaluation
//!
//! Builds the expression (q1 * q2 * q3).rotate(p), evaluates it both ways,
//! and extracts the 3x3 Jacobian with respect to each quaternion and the
//! point by seeding basis tangents through the expression tree.

use nalgebra::Vector3;
use quatexpr::{jacobian, Point3, PointExpr, QuatExpr, UnitQuaternion};

fn main() {
    println!("🎯 quatexpr: chained rotation with analytic Jacobians");
    println!("=====================================================\n");

    let qs: [UnitQuaternion; 3] = [
        UnitQuaternion::exp(&Vector3::new(0.3, 0.0, 0.0)),
        UnitQuaternion::exp(&Vector3::new(0.0, -0.2, 0.1)),
        UnitQuaternion::exp(&Vector3::new(0.05, 0.4, -0.3)),
    ];
    let p = Point3::new(1.0, 2.0, 3.0);

    // Eager evaluation.
    let eager = (qs[0] * qs[1] * qs[2]).rotate(&p);
    println!("eager:    p' = {:?}", eager.coords().transpose());

    // Deferred evaluation of the same expression.
    let expr = QuatExpr::literal(qs[0])
        .times(QuatExpr::literal(qs[1]))
        .times(QuatExpr::literal(qs[2]))
        .rotate(PointExpr::literal(p));
    println!("deferred: p' = {:?}\n", expr.eval().coords().transpose());

    // Jacobian with respect to each quaternion: seed the corresponding leaf
    // with basis tangents, leave everything else constant.
    for (i, _) in qs.iter().enumerate() {
        let jac = jacobian(|seed| {
            let leaf = |j: usize| {
                if j == i {
                    QuatExpr::variable(qs[j], seed)
                } else {
                    QuatExpr::literal(qs[j])
                }
            };
            leaf(0).times(leaf(1)).times(leaf(2)).rotate(PointExpr::literal(p))
        });
        println!("d p' / d q{}:\n{}", i + 1, jac);
    }

    // Jacobian with respect to the point.
    let jac_p = jacobian(|seed| {
        QuatExpr::literal(qs[0])
            .times(QuatExpr::literal(qs[1]))
            .times(QuatExpr::literal(qs[2]))
            .rotate(PointExpr::variable(p, seed))
    });
    println!("d p' / d p:\n{}", jac_p);
}
