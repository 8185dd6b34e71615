//! Linear Polynomial Equation Solvers
//!
//! Every solver reduces its polynomial equation to a dense linear problem on
//! a structured matrix from [`crate::matrix`] and reads the unknown
//! polynomials back from the solution vector, `x` first.
//!
//! - [`axb`]: exact division `a x = b`
//! - [`axby0`]: minimal-degree solution of `a x + b y = 0`
//! - [`axbyc`]: Diophantine equation `a x + b y = c`
//! - [`axaxbb`]: symmetric equation `ã x + a x̃ = b + b̃`
//! - [`axbycd`]: symmetric equation `ã x + b̃ y = c + d̃`
//!
//! Here `~` is the imaginary-axis conjugate [`cconj`]. An equation without a
//! solution is reported as `Ok(None)`; `Err` is reserved for invalid input and
//! failures of the LAPACK back end.

use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array1, ArrayView1};
use ndarray_linalg::error::LinalgError;
use ndarray_linalg::{LeastSquaresSvd, Scalar, Solve, QR};
use num_traits::Zero;
use tracing::{debug, instrument, trace};

use crate::error::{PolyError, Result};
use crate::matrix::{
    alternating_signs, back_substitute, block_width, ltbt_matrix, nullspace,
    sylvester_matrix_widths,
};
use crate::poly::{Coefficient, Polynomial};
use crate::transform::cconj;

/// Default exactness threshold of [`axb`] on the infinity norm of the residual.
pub const DEFAULT_DIVISION_TOL: f64 = 1e-8;

/// Degree-selection policy of [`axbyc`] and [`axbycd`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DegreePolicy {
    /// `deg(y) = deg(a) - 1`; `x` takes the remaining degrees of freedom
    #[default]
    MinDegreeY,
    /// `deg(x) = deg(b) - 1`; `y` takes the remaining degrees of freedom
    MinDegreeX,
}

impl FromStr for DegreePolicy {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "miny" => Ok(DegreePolicy::MinDegreeY),
            "minx" => Ok(DegreePolicy::MinDegreeX),
            other => Err(PolyError::UnsupportedOption(other.to_string())),
        }
    }
}

impl fmt::Display for DegreePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegreePolicy::MinDegreeY => write!(f, "miny"),
            DegreePolicy::MinDegreeX => write!(f, "minx"),
        }
    }
}

/// Solves `a x = b` for a polynomial `x`.
///
/// The division is posed as `LTBT(a, deg(b) - deg(a) + 1) * x = b` and solved
/// through a thin QR factorisation. The remainder is the component
/// `b - Q Qᴴ b` of `b` outside the range of the matrix; a quotient is returned
/// only if its infinity norm is below `tol` (default [`DEFAULT_DIVISION_TOL`]).
///
/// The remainder is measured in coefficient space, so the test does not
/// depend on the orthogonal basis chosen for the complement. The tail of `Qᴴ b`
/// from a full QR has the same 2-norm, but not the same infinity norm in
/// general, so values near the threshold may be classified differently.
///
/// Returns `Ok(None)` if `a` does not divide `b`. A zero `b` gives the zero
/// quotient.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::solve::axb;
///
/// // (1 + s)(2 + s) / (1 + s)
/// let a = Polynomial::new(vec![1.0, 1.0]);
/// let b = Polynomial::new(vec![2.0, 3.0, 1.0]);
/// let x = axb(&a, &b, None).unwrap().unwrap();
/// assert!(x.is_approx(&Polynomial::new(vec![2.0, 1.0]), 1e-12, 0.0));
///
/// assert!(axb(&Polynomial::new(vec![1.0, 2.0]), &b, None).unwrap().is_none());
/// ```
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` is zero
/// * `PolyError::Linalg` if the QR factorisation fails
#[instrument(level = "debug", skip_all)]
pub fn axb<T: Coefficient>(
    a: &Polynomial<T>,
    b: &Polynomial<T>,
    tol: Option<f64>,
) -> Result<Option<Polynomial<T>>> {
    let tol = tol.unwrap_or(DEFAULT_DIVISION_TOL);
    let (da, db) = (a.degree(), b.degree());

    if da < 0 {
        return Err(PolyError::ZeroPolynomial);
    }
    if db < 0 {
        return Ok(Some(Polynomial::with_var(Vec::new(), b.var())));
    }
    if db < da {
        debug!(da, db, "dividend degree below divisor degree");
        return Ok(None);
    }

    let t = ltbt_matrix(a, block_width(db - da));
    let rhs = Array1::from(b.padded(t.nrows()));
    let (q, r) = t.qr()?;

    let projected = q.t().mapv(|v| v.conj()).dot(&rhs);
    let remainder = &rhs - &q.dot(&projected);
    let remainder_norm = remainder.iter().map(|v| v.abs()).fold(0.0, f64::max);
    trace!(remainder_norm, tol, "division remainder");

    if !(remainder_norm < tol) {
        debug!(remainder_norm, "no exact quotient");
        return Ok(None);
    }

    let x = back_substitute(r.view(), projected.view())?;
    Ok(Some(Polynomial::with_var(x.to_vec(), b.var())))
}

/// Finds the nonzero solution of `a x + b y = 0` with minimal degrees.
///
/// The degree search starts at `(deg(x), deg(y)) = (deg(b), deg(a))`, where
/// `x = b, y = -a` is always a solution, and lowers both degrees together
/// while `Sylvester(a, b, (deg(x) + 1, deg(y) + 1))` keeps a nontrivial
/// kernel. The kernel at the last such step gives `(x, y)`, so `-x/y` is the
/// reduced form of `b/a`.
///
/// When the kernel has more than one dimension the basis vector of the
/// smallest singular value is taken, scaled to unit norm with its largest
/// entry real and positive. `rtol` is the relative rank tolerance of the
/// nullspace computation.
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` or `b` is zero
/// * `PolyError::Linalg` if an SVD fails
#[instrument(level = "debug", skip_all)]
pub fn axby0<T: Coefficient>(
    a: &Polynomial<T>,
    b: &Polynomial<T>,
    rtol: Option<f64>,
) -> Result<(Polynomial<T>, Polynomial<T>)> {
    let (da, db) = (a.degree(), b.degree());
    if da < 0 || db < 0 {
        return Err(PolyError::ZeroPolynomial);
    }

    let (mut dx, mut dy) = (db, da);
    let mut found = None;

    loop {
        let sylv = sylvester_matrix_widths(a, b, (block_width(dx), block_width(dy)));
        let kernel = nullspace(&sylv, rtol)?;
        trace!(dx, dy, kernel_dim = kernel.ncols(), "degree step");

        if kernel.ncols() == 0 {
            break;
        }
        if kernel.ncols() > 1 {
            debug!(dx, dy, kernel_dim = kernel.ncols(), "kernel not one-dimensional");
        }

        let v = normalized(kernel.column(0));
        let split = block_width(dx);
        found = Some((
            Polynomial::with_var(v.slice(s![..split]).to_vec(), a.var()),
            Polynomial::with_var(v.slice(s![split..]).to_vec(), a.var()),
        ));

        if dx == 0 || dy == 0 {
            break;
        }
        dx -= 1;
        dy -= 1;
    }

    debug!(dx, dy, "degree search finished");
    found.ok_or_else(|| {
        PolyError::Numerical("Sylvester matrix has no kernel at the starting degrees".to_string())
    })
}

/// Unit vector scaled so that its largest-magnitude entry is real and positive.
fn normalized<T: Coefficient>(v: ArrayView1<T>) -> Array1<T> {
    let pivot = v
        .iter()
        .copied()
        .fold(T::zero(), |best, c| if c.abs() > best.abs() { c } else { best });
    if pivot.is_zero() {
        return v.to_owned();
    }

    let phase = pivot / T::from_real(pivot.abs());
    v.mapv(|c| c / phase)
}

/// Degrees `(dx, dy)` and system order `m` of the square Diophantine system.
fn diophantine_degrees(
    da: isize,
    db: isize,
    dc: isize,
    policy: DegreePolicy,
) -> (isize, isize, isize) {
    match policy {
        DegreePolicy::MinDegreeY => {
            let dy = da - 1;
            let m = (da + 1).max(db + 1 + dy).max(dc + 1);
            (m - dy - 2, dy, m)
        }
        DegreePolicy::MinDegreeX => {
            let dx = db - 1;
            let m = (db + 1).max(da + 1 + dx).max(dc + 1);
            (dx, m - dx - 2, m)
        }
    }
}

/// Solves the Diophantine equation `a x + b y = c`.
///
/// With [`DegreePolicy::MinDegreeY`] the degree of `y` is fixed to
/// `deg(a) - 1` and the order of the system is
/// `m = max(deg(a) + 1, deg(b) + deg(y) + 1, deg(c) + 1)`; `x` receives the
/// remaining `m - deg(y) - 1` coefficients. [`DegreePolicy::MinDegreeX`]
/// swaps the roles of the unknowns. The square system on
/// `Sylvester(a, b, (deg(x) + 1, deg(y) + 1))` is solved by LU and the result
/// is accepted only if `a x + b y` matches `c` within the relative tolerance
/// `tol` (default `sqrt(eps)`).
///
/// Returns `Ok(None)` if the system is singular or the verification fails.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::solve::{axbyc, DegreePolicy};
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
/// let b = Polynomial::new(vec![4.0, 5.0]);
/// let c = Polynomial::new(vec![6.0, 7.0, 8.0]);
/// let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None)
///     .unwrap()
///     .unwrap();
/// assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-10, 0.0));
/// ```
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` or `b` is zero
/// * `PolyError::Linalg` for LAPACK failures other than singularity
#[instrument(level = "debug", skip_all, fields(policy = %policy))]
pub fn axbyc<T: Coefficient>(
    a: &Polynomial<T>,
    b: &Polynomial<T>,
    c: &Polynomial<T>,
    policy: DegreePolicy,
    tol: Option<f64>,
) -> Result<Option<(Polynomial<T>, Polynomial<T>)>> {
    let (da, db, dc) = (a.degree(), b.degree(), c.degree());
    if da < 0 || db < 0 {
        return Err(PolyError::ZeroPolynomial);
    }

    let (dx, dy, m) = diophantine_degrees(da, db, dc, policy);
    trace!(dx, dy, m, "degree selection");

    let sylv = sylvester_matrix_widths(a, b, (block_width(dx), block_width(dy)));
    let rhs = Array1::from(c.padded(m as usize));

    let sol = match sylv.solve(&rhs) {
        Ok(sol) => sol,
        Err(LinalgError::Lapack(err)) => {
            debug!(%err, "Sylvester matrix is singular");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let split = block_width(dx);
    let x = Polynomial::with_var(sol.slice(s![..split]).to_vec(), a.var());
    let y = Polynomial::with_var(sol.slice(s![split..]).to_vec(), a.var());

    let rtol = tol.unwrap_or(f64::EPSILON.sqrt());
    let lhs = &(a * &x) + &(b * &y);
    if !lhs.is_approx(c, rtol, 0.0) {
        debug!(
            residual = (&lhs - c).norm(),
            "solution does not satisfy the equation"
        );
        return Ok(None);
    }

    Ok(Some((x, y)))
}

/// Solves the real symmetric equation `ã x + a x̃ = b + b̃`.
///
/// With `bb = b + b̃` the unknown gets degree
/// `max(deg(bb) - deg(a), deg(a) - 1, 0)`, and the system
/// ```text
/// (LTBT(ã, dx + 1) + LTBT(a, dx + 1) · diag(+1, -1, +1, ...)) x = bb
/// ```
/// is solved in the least-squares sense. The sign diagonal turns `a x` into
/// `a x̃`. The minimum-norm solution is returned when `x` is not unique; the
/// remaining residual is logged at `debug` level.
///
/// The classical formulation uses `deg(x) = deg(bb) - deg(a)` alone. That
/// choice leaves the system with too few unknowns whenever
/// `deg(bb) < 2 deg(a) - 1` (for example a constant `b`), so the degree is
/// raised to at least `deg(a) - 1`; when `deg(bb) - deg(a)` is the larger
/// value both choices agree.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::solve::axaxbb;
///
/// let a = Polynomial::new(vec![2.0, 1.0]);
/// let b = Polynomial::new(vec![6.0]);
/// let x = axaxbb(&a, &b).unwrap();
/// assert!((x.coeff(0) - 3.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` is zero
/// * `PolyError::Linalg` if the least-squares solve fails
#[instrument(level = "debug", skip_all)]
pub fn axaxbb(a: &Polynomial<f64>, b: &Polynomial<f64>) -> Result<Polynomial<f64>> {
    let da = a.degree();
    if da < 0 {
        return Err(PolyError::ZeroPolynomial);
    }

    let bb = b + &cconj(b);
    let dbb = bb.degree();
    if dbb < 0 {
        return Ok(Polynomial::with_var(Vec::new(), a.var()));
    }

    let n = block_width((dbb - da).max(da - 1).max(0));
    let m = ltbt_matrix(&cconj(a), n) + ltbt_matrix(a, n).dot(&alternating_signs(n));
    let rhs = Array1::from(bb.padded(m.nrows()));

    let lsq = m.least_squares(&rhs)?;
    let residual = (&rhs - &m.dot(&lsq.solution))
        .iter()
        .map(|v| v.abs())
        .fold(0.0, f64::max);
    debug!(dx = n - 1, residual, rank = lsq.rank, "least-squares solve");

    Ok(Polynomial::with_var(lsq.solution.to_vec(), a.var()))
}

/// Solves the symmetric two-unknown equation `ã x + b̃ y = c + d̃`.
///
/// This is the Diophantine equation with coefficients `ã`, `b̃` and right-hand
/// side `c + d̃`; degrees, verification and the `None` contract follow
/// [`axbyc`].
///
/// # Errors
///
/// Same as [`axbyc`].
#[instrument(level = "debug", skip_all)]
pub fn axbycd<T: Coefficient>(
    a: &Polynomial<T>,
    b: &Polynomial<T>,
    c: &Polynomial<T>,
    d: &Polynomial<T>,
    policy: DegreePolicy,
    tol: Option<f64>,
) -> Result<Option<(Polynomial<T>, Polynomial<T>)>> {
    let rhs = c + &cconj(d);
    axbyc(&cconj(a), &cconj(b), &rhs, policy, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    fn assert_poly_close(p: &Polynomial<f64>, expected: &[f64], eps: f64) {
        assert_eq!(p.degree(), expected.len() as isize - 1, "degree of {}", p);
        for (k, e) in expected.iter().enumerate() {
            assert_abs_diff_eq!(p.coeff(k), *e, epsilon = eps);
        }
    }

    #[test]
    fn test_axb_round_trip() {
        let a = Polynomial::new(vec![0.5, -1.0, 2.0]);
        let x = Polynomial::new(vec![3.0, 0.0, -1.5, 4.0]);
        let b = &a * &x;
        let q = axb(&a, &b, None).unwrap().unwrap();
        assert!(q.is_approx(&x, 0.0, 1e-6));
    }

    #[test]
    fn test_axb_no_exact_quotient() {
        let a = Polynomial::new(vec![1.0, 2.0]);
        let b = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert!(axb(&a, &b, None).unwrap().is_none());
    }

    #[test]
    fn test_axb_degenerate_inputs() {
        let a = Polynomial::new(vec![1.0, 2.0]);
        assert!(axb(&a, &Polynomial::zero(), None).unwrap().unwrap().is_zero());
        assert!(axb(&a, &Polynomial::new(vec![1.0]), None).unwrap().is_none());
        assert!(matches!(
            axb(&Polynomial::zero(), &a, None),
            Err(PolyError::ZeroPolynomial)
        ));
    }

    #[test]
    fn test_axb_complex() {
        let a = Polynomial::new(vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)]);
        let x = Polynomial::new(vec![Complex64::new(-1.0, 0.5), Complex64::new(3.0, 0.0)]);
        let q = axb(&a, &(&a * &x), None).unwrap().unwrap();
        assert!(q.is_approx(&x, 0.0, 1e-10));
    }

    #[test]
    fn test_axb_constant_divisor() {
        let a = Polynomial::new(vec![2.0]);
        let b = Polynomial::new(vec![4.0, 6.0]);
        let q = axb(&a, &b, None).unwrap().unwrap();
        assert_poly_close(&q, &[2.0, 3.0], 1e-12);
    }

    #[test]
    fn test_axby0_cancels_common_factor() {
        let common = Polynomial::new(vec![1.0, 1.0]);
        let a = &Polynomial::new(vec![1.0, 2.0, 3.0]) * &common;
        let b = &Polynomial::new(vec![4.0, 5.0]) * &common;
        let (x, y) = axby0(&a, &b, None).unwrap();

        let residual = &(&a * &x) + &(&b * &y);
        assert!(residual.norm_inf() < 1e-8);
        assert_eq!(y.degree(), 2);
        assert_eq!(x.degree(), 1);
    }

    #[test]
    fn test_axby0_coprime_inputs_keep_full_degree() {
        let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
        let b = Polynomial::new(vec![4.0, 5.0]);
        let (x, y) = axby0(&a, &b, None).unwrap();
        assert_eq!(x.degree(), 1);
        assert_eq!(y.degree(), 2);
        assert!((&(&a * &x) + &(&b * &y)).norm_inf() < 1e-8);
    }

    #[test]
    fn test_axby0_normalisation() {
        let a = Polynomial::new(vec![1.0, 1.0]);
        let b = Polynomial::new(vec![2.0, 2.0]);
        let (x, y) = axby0(&a, &b, None).unwrap();
        // x = 2/sqrt(5), y = -1/sqrt(5)
        assert_poly_close(&x, &[2.0 / 5f64.sqrt()], 1e-12);
        assert_poly_close(&y, &[-1.0 / 5f64.sqrt()], 1e-12);
    }

    #[test]
    fn test_axbyc_literal_values() {
        let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
        let b = Polynomial::new(vec![4.0, 5.0]);
        let c = Polynomial::new(vec![6.0, 7.0, 8.0]);
        let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None)
            .unwrap()
            .unwrap();

        assert_poly_close(&x, &[46.0 / 11.0], 1e-10);
        assert_poly_close(&y, &[5.0 / 11.0, -10.0 / 11.0], 1e-10);
        assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-8, 0.0));
    }

    #[test]
    fn test_axbyc_min_degree_x() {
        let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
        let b = Polynomial::new(vec![4.0, 5.0]);
        let c = Polynomial::new(vec![6.0, 7.0, 8.0, 9.0]);
        let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeX, None)
            .unwrap()
            .unwrap();
        assert!(x.degree() <= 0);
        assert!((&(&a * &x) + &(&b * &y)).is_approx(&c, 1e-8, 0.0));
    }

    #[test]
    fn test_axbyc_common_factor_has_no_solution() {
        // a and b share the root -1, c does not vanish there
        let common = Polynomial::new(vec![1.0, 1.0]);
        let a = &Polynomial::new(vec![1.0, 2.0]) * &common;
        let b = &Polynomial::new(vec![3.0, 1.0]) * &common;
        let c = Polynomial::new(vec![1.0]);
        let res = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn test_axbyc_constant_a() {
        // deg(y) = -1: x alone solves the equation
        let a = Polynomial::new(vec![2.0]);
        let b = Polynomial::new(vec![1.0, 1.0]);
        let c = Polynomial::new(vec![2.0, 4.0]);
        let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None)
            .unwrap()
            .unwrap();
        assert!(y.is_zero());
        assert_poly_close(&x, &[1.0, 2.0], 1e-12);
    }

    #[test]
    fn test_degree_policy_parsing() {
        assert_eq!("miny".parse::<DegreePolicy>().unwrap(), DegreePolicy::MinDegreeY);
        assert_eq!("minx".parse::<DegreePolicy>().unwrap(), DegreePolicy::MinDegreeX);
        assert_eq!(DegreePolicy::default(), DegreePolicy::MinDegreeY);
        match "minz".parse::<DegreePolicy>() {
            Err(PolyError::UnsupportedOption(opt)) => assert_eq!(opt, "minz"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_axaxbb_recovers_known_solution() {
        let a = Polynomial::new(vec![2.0, 3.0, 1.0]);
        let x = Polynomial::new(vec![1.0, 1.0]);
        let lhs = &(&cconj(&a) * &x) + &(&a * &cconj(&x));
        // b = lhs / 2 satisfies b + b̃ = lhs since lhs is even
        let b = lhs.scaled(0.5);
        let sol = axaxbb(&a, &b).unwrap();
        assert_poly_close(&sol, &[1.0, 1.0], 1e-10);
    }

    #[test]
    fn test_axaxbb_constant() {
        let a = Polynomial::new(vec![2.0, 1.0]);
        let b = Polynomial::new(vec![6.0]);
        let sol = axaxbb(&a, &b).unwrap();
        assert_poly_close(&sol, &[3.0], 1e-12);
    }

    #[test]
    fn test_axaxbb_odd_rhs_gives_zero() {
        let a = Polynomial::new(vec![2.0, 1.0]);
        let b = Polynomial::new(vec![0.0, 5.0]);
        assert!(axaxbb(&a, &b).unwrap().is_zero());
    }

    #[test]
    fn test_axbycd_satisfies_symmetric_equation() {
        let a = Polynomial::new(vec![1.0, 2.0]);
        let b = Polynomial::new(vec![3.0, 1.0]);
        let c = Polynomial::new(vec![1.0, 0.0, 2.0]);
        let d = Polynomial::new(vec![0.5, 1.0]);
        let (x, y) = axbycd(&a, &b, &c, &d, DegreePolicy::MinDegreeY, None)
            .unwrap()
            .unwrap();

        let lhs = &(&cconj(&a) * &x) + &(&cconj(&b) * &y);
        let rhs = &c + &cconj(&d);
        assert!(lhs.is_approx(&rhs, 1e-8, 0.0));
    }
}
