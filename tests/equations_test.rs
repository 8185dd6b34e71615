//! Integration tests for the polynomial equation solvers
//! Exercises division, Diophantine, symmetric and L1 equations end to end

mod common;

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use polyeq::l1::{axycminl1, MinL1Options};
use polyeq::matrix::{ltbt_matrix, sylvester_matrix};
use polyeq::solve::{axaxbb, axb, axby0, axbyc, axbycd, DegreePolicy};
use polyeq::transform::cconj;
use polyeq::{PolyError, Polynomial};

// ===== Division =====

#[test]
fn test_division_round_trip_several_degrees() {
    common::init_tracing();
    let divisors = [
        vec![1.0],
        vec![-0.5, 1.0],
        vec![2.0, 0.0, 1.0],
        vec![1.0, -3.0, 0.25, 2.0],
    ];
    let quotients = [vec![7.0], vec![1.0, 1.0], vec![0.0, 2.0, -1.0, 0.5]];

    for a in divisors.iter() {
        for x in quotients.iter() {
            let a = Polynomial::new(a.clone());
            let x = Polynomial::new(x.clone());
            let b = &a * &x;
            let q = axb(&a, &b, None).unwrap().expect("exact quotient");
            assert!(q.is_approx(&x, 0.0, 1e-6), "{} / {} gave {}", b, a, q);
        }
    }
}

#[test]
fn test_division_without_quotient() {
    common::init_tracing();
    let a = Polynomial::new(vec![1.0, 2.0]);
    let b = Polynomial::new(vec![1.0, 2.0, 3.0]);
    assert!(axb(&a, &b, None).unwrap().is_none());
}

#[test]
fn test_division_tolerance_is_configurable() {
    // b = (1 + s)(1 + s) + 1e-6
    let a = Polynomial::new(vec![1.0, 1.0]);
    let b = Polynomial::new(vec![1.0 + 1e-6, 2.0, 1.0]);
    assert!(axb(&a, &b, None).unwrap().is_none());
    assert!(axb(&a, &b, Some(1e-4)).unwrap().is_some());
}

// ===== Homogeneous equation =====

#[test]
fn test_axby0_minimal_degree() {
    common::init_tracing();
    let common_factor = Polynomial::new(vec![1.0, 1.0]);
    let a = &Polynomial::new(vec![1.0, 2.0, 3.0]) * &common_factor;
    let b = &Polynomial::new(vec![4.0, 5.0]) * &common_factor;

    let (x, y) = axby0(&a, &b, None).unwrap();
    let residual = &(&a * &x) + &(&b * &y);
    assert!(residual.norm_inf() < 1e-8);
    assert_eq!(y.degree(), 2);

    // -x/y is b/a in lowest terms
    let ratio = x.coeff(1) / y.coeff(2);
    assert_abs_diff_eq!(ratio, -5.0 / 3.0, epsilon = 1e-10);
}

// ===== Diophantine equation =====

#[test]
fn test_axbyc_literal_solution() {
    common::init_tracing();
    let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
    let b = Polynomial::new(vec![4.0, 5.0]);
    let c = Polynomial::new(vec![6.0, 7.0, 8.0]);

    let (x, y) = axbyc(&a, &b, &c, DegreePolicy::default(), None)
        .unwrap()
        .expect("coprime a, b");
    assert_abs_diff_eq!(x.coeff(0), 4.1818, epsilon = 1e-4);
    assert_abs_diff_eq!(y.coeff(0), 0.4545, epsilon = 1e-4);
    assert_abs_diff_eq!(y.coeff(1), -0.9091, epsilon = 1e-4);
    assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-8, 0.0));
}

#[test]
fn test_axbyc_policy_from_string() {
    let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
    let b = Polynomial::new(vec![4.0, 5.0]);
    let c = Polynomial::new(vec![6.0, 7.0, 8.0]);

    for name in ["miny", "minx"] {
        let policy: DegreePolicy = name.parse().unwrap();
        let (x, y) = axbyc(&a, &b, &c, policy, None).unwrap().unwrap();
        assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-8, 0.0));
    }

    let err = "minimal".parse::<DegreePolicy>().unwrap_err();
    assert!(matches!(err, PolyError::UnsupportedOption(_)));
    assert_eq!(err.to_string(), "unsupported option 'minimal'");
}

#[test]
fn test_axbyc_complex_coefficients() {
    let a = Polynomial::new(vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 1.0)]);
    let b = Polynomial::new(vec![Complex64::new(2.0, 0.0), Complex64::new(1.0, -1.0)]);
    let c = Polynomial::new(vec![Complex64::new(0.0, 3.0)]);

    let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None)
        .unwrap()
        .unwrap();
    assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-8, 0.0));
}

#[test]
fn test_sylvester_matrix_solves_bezout() {
    // The default Sylvester matrix of coprime a, b is nonsingular
    let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
    let b = Polynomial::new(vec![4.0, 5.0]);
    let s = sylvester_matrix(&a, &b, None);
    assert_eq!(s.dim(), (3, 3));
    assert_eq!(polyeq::matrix::rank(&s, None).unwrap(), 3);
}

// ===== Symmetric equations =====

#[test]
fn test_axaxbb_second_order() {
    common::init_tracing();
    let a = Polynomial::new(vec![2.0, 3.0, 1.0]);
    let b = Polynomial::new(vec![2.0, 0.0, -2.0]);
    let x = axaxbb(&a, &b).unwrap();

    let lhs = &(&cconj(&a) * &x) + &(&a * &cconj(&x));
    let rhs = &b + &cconj(&b);
    assert!(lhs.is_approx(&rhs, 1e-10, 0.0));
}

#[test]
fn test_axbycd_equation_holds() {
    let a = Polynomial::new(vec![1.0, 1.0]);
    let b = Polynomial::new(vec![2.0, 0.0, 1.0]);
    let c = Polynomial::new(vec![1.0, 2.0]);
    let d = Polynomial::new(vec![3.0]);

    let (x, y) = axbycd(&a, &b, &c, &d, DegreePolicy::MinDegreeX, None)
        .unwrap()
        .unwrap();
    let lhs = &(&cconj(&a) * &x) + &(&cconj(&b) * &y);
    assert!(lhs.is_approx(&(&c + &cconj(&d)), 1e-8, 0.0));
}

// ===== L1-optimal equation =====

#[test]
fn test_axycminl1_feasible_and_consistent() {
    common::init_tracing();
    let cases = [
        (vec![2.0, 1.0], vec![1.0, 1.0, 1.0]),
        (vec![1.0, 0.5, 0.25], vec![3.0, -1.0]),
        (vec![4.0], vec![1.0, 2.0, 3.0]),
    ];

    for (a, c) in cases {
        let a = Polynomial::new(a);
        let c = Polynomial::new(c);
        let res = axycminl1(&a, &c, &MinL1Options::default()).unwrap();

        let fit = &(&a * &res.x) + &res.y;
        assert!(fit.is_approx(&c, 0.0, 1e-6), "a = {}, c = {}", a, c);
        let l1: f64 = res.y.coeffs().iter().map(|v| v.abs()).sum();
        assert_abs_diff_eq!(res.objective, l1, epsilon = 1e-6);
    }
}

#[test]
fn test_axycminl1_objective_is_nonnegative_norm() {
    common::init_tracing();
    // a = (1 - s)(1 - 2s) has a root on the unit circle
    let a = Polynomial::new(vec![1.0, -3.0, 2.0]);
    let c = Polynomial::new(vec![5.0, -1.0, 4.0, -2.0]);
    let options = MinL1Options {
        dymax: 10,
        ..MinL1Options::default()
    };
    let res = axycminl1(&a, &c, &options).unwrap();

    assert!(res.objective >= 0.0);
    let l1: f64 = res.y.coeffs().iter().map(|v| v.abs()).sum();
    assert_abs_diff_eq!(res.objective, l1, epsilon = 1e-6);
    let fit = &(&a * &res.x) + &res.y;
    assert!(fit.is_approx(&c, 0.0, 1e-6));
}

#[test]
fn test_ltbt_feeds_l1_system() {
    let a = Polynomial::new(vec![1.0, 2.0, 3.0, 4.0]);
    let t = ltbt_matrix(&a, 3);
    assert_eq!(t.dim(), (6, 3));
    assert_eq!(t[(3, 0)], 4.0);
    assert_eq!(t[(5, 2)], 4.0);
}
