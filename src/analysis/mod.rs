//! Analysis Predicates
//!
//! Coprimality, stability and conjugate-symmetry tests.

use tracing::trace;

use crate::error::Result;
use crate::matrix::{rank, sylvester_resultant_matrix};
use crate::poly::{Coefficient, PolyLike, Polynomial};

/// Default relative tolerance of [`is_conj_symmetric`].
pub const DEFAULT_SYMMETRY_TOL: f64 = 1e-10;

/// True if `a` and `b` have no common root.
///
/// The test is the rank of the resultant matrix: `a` and `b` are coprime
/// exactly when it reaches `deg(a) + deg(b)`. A zero polynomial is coprime
/// only with a nonzero constant.
///
/// # Examples
///
/// ```
/// use polyeq::analysis::is_coprime;
/// use polyeq::poly::Polynomial;
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
/// let b = Polynomial::new(vec![1.0, 2.0]);
/// assert!(is_coprime(&a, &b).unwrap());
/// assert!(!is_coprime(&a, &(&a * &b)).unwrap());
/// ```
pub fn is_coprime<T: Coefficient>(a: &Polynomial<T>, b: &Polynomial<T>) -> Result<bool> {
    let (da, db) = (a.degree(), b.degree());
    match (da, db) {
        (-1, d) | (d, -1) => return Ok(d == 0),
        _ => {}
    }

    let r = rank(&sylvester_resultant_matrix(a, b), None)?;
    trace!(rank = r, full = da + db, "resultant rank");
    Ok(r as isize == da + db)
}

/// True if every root of `a` lies in the closed unit disk.
///
/// # Errors
///
/// `PolyError::ZeroPolynomial` if `a` is zero.
pub fn is_schur_stable<T: Coefficient>(a: &Polynomial<T>) -> Result<bool> {
    Ok(a.roots()?.iter().all(|r| r.norm() <= 1.0))
}

/// True if every root of `a` lies in the closed left half-plane.
///
/// # Examples
///
/// ```
/// use polyeq::analysis::is_hurwitz_stable;
/// use polyeq::poly::Polynomial;
///
/// // (s + 1)(s + 2)
/// assert!(is_hurwitz_stable(&Polynomial::new(vec![2.0, 3.0, 1.0])).unwrap());
/// // (s - 1)(s + 2)
/// assert!(!is_hurwitz_stable(&Polynomial::new(vec![-2.0, 1.0, 1.0])).unwrap());
/// ```
///
/// # Errors
///
/// `PolyError::ZeroPolynomial` if `a` is zero.
pub fn is_hurwitz_stable<T: Coefficient>(a: &Polynomial<T>) -> Result<bool> {
    Ok(a.roots()?.iter().all(|r| r.re <= 0.0))
}

/// True if `p` equals its own conjugate within the relative tolerance `tol`
/// (default [`DEFAULT_SYMMETRY_TOL`]).
///
/// The conjugate is the one of the polynomial kind: `p(s) = p*(-s)` for an
/// ordinary polynomial, `p(z) = p*(1/z)` for a Laurent polynomial.
pub fn is_conj_symmetric<P: PolyLike>(p: &P, tol: Option<f64>) -> bool {
    p.is_approx(&p.conjugate(), tol.unwrap_or(DEFAULT_SYMMETRY_TOL), 0.0)
}
