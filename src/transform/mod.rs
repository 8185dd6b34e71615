//! Conjugation and Transform Utilities
//!
//! Pure coefficient-vector transforms used by the structured matrix builders
//! and the conjugate-symmetric solvers:
//!
//! - [`scale`]: `a(s) -> a(rho*s)`
//! - [`cconj`]: conjugate with respect to the imaginary axis, `ã(s) = a*(-s)`
//! - [`conj_reciprocal`]: `sⁿ a*(1/s)` for `n = degree(a)`
//! - [`dconj`]: conjugate with respect to the unit circle, `ã(z) = a*(1/z)`
//! - [`shift`]: `zᵏ p(z)`

use ndarray_linalg::Scalar;

use crate::poly::{Coefficient, LaurentPolynomial, Polynomial};

/// Scales the variable: the coefficient of `var^k` is multiplied by `rho^k`.
///
/// Intended for real positive `rho`; negative Laurent exponents use `rho^-k`.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::transform::scale;
///
/// let a = Polynomial::new(vec![1.0, 1.0, 1.0]);
/// assert_eq!(scale(&a, 2.0), Polynomial::new(vec![1.0, 2.0, 4.0]));
/// ```
pub fn scale<T: Coefficient>(a: &Polynomial<T>, rho: f64) -> Polynomial<T> {
    let coeffs = a
        .coeffs()
        .iter()
        .enumerate()
        .map(|(k, &c)| c * T::from_real(rho.powi(k as i32)))
        .collect();
    Polynomial::with_var(coeffs, a.var())
}

/// [`scale`] for Laurent polynomials.
pub fn scale_laurent<T: Coefficient>(p: &LaurentPolynomial<T>, rho: f64) -> LaurentPolynomial<T> {
    let (m, _) = p.exponent_bounds();
    let coeffs = p
        .coeffs()
        .iter()
        .enumerate()
        .map(|(i, &c)| c * T::from_real(rho.powi((m + i as isize) as i32)))
        .collect();
    LaurentPolynomial::with_var(coeffs, m, p.var())
}

/// Continuous-time (imaginary axis) conjugate `ã(s) = conj(a)(-s)`.
///
/// Every coefficient is complex conjugated, then the coefficients of odd
/// powers change sign. `cconj(cconj(a)) == a`.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::transform::cconj;
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(cconj(&a), Polynomial::new(vec![1.0, -2.0, 3.0, -4.0]));
/// ```
pub fn cconj<T: Coefficient>(a: &Polynomial<T>) -> Polynomial<T> {
    let coeffs = a
        .coeffs()
        .iter()
        .enumerate()
        .map(|(k, c)| if k % 2 == 1 { -c.conj() } else { c.conj() })
        .collect();
    Polynomial::with_var(coeffs, a.var())
}

/// Conjugate reciprocal: coefficients conjugated and reversed over `0..=degree`,
/// so the coefficient of `s^k` moves to `s^(n-k)`.
///
/// Trailing zeros of the input are dropped first; leading zeros that the
/// reversal produces are trimmed by `degree`, so the transform is an
/// involution whenever `a(0) != 0`.
pub fn conj_reciprocal<T: Coefficient>(a: &Polynomial<T>) -> Polynomial<T> {
    let coeffs = a.trimmed().coeffs().iter().rev().map(|c| c.conj()).collect();
    Polynomial::with_var(coeffs, a.var())
}

/// Discrete-time (unit circle) conjugate `ã(z) = conj(a)(1/z)`.
///
/// Coefficients are conjugated and reversed and the exponent range `[m, n]`
/// becomes `[-n, -m]`. Accepts an ordinary polynomial, which is treated as a
/// Laurent polynomial with `m = 0`.
///
/// # Examples
///
/// ```
/// use polyeq::poly::{LaurentPolynomial, Polynomial};
/// use polyeq::transform::dconj;
///
/// // 1 + 2z  ->  2z^-1 + 1
/// let b = dconj(Polynomial::with_var(vec![1.0, 2.0], 'z'));
/// assert_eq!(b, LaurentPolynomial::new(vec![2.0, 1.0], -1));
/// ```
pub fn dconj<T: Coefficient>(a: impl Into<LaurentPolynomial<T>>) -> LaurentPolynomial<T> {
    let a = a.into();
    let (_, n) = a.exponent_bounds();
    let coeffs = a.coeffs().iter().rev().map(|c| c.conj()).collect();
    LaurentPolynomial::with_var(coeffs, -n, a.var())
}

/// Multiplies by `z^k`: every exponent of the range moves by `k`.
pub fn shift<T: Coefficient>(p: &LaurentPolynomial<T>, k: isize) -> LaurentPolynomial<T> {
    let (m, _) = p.exponent_bounds();
    LaurentPolynomial::with_var(p.coeffs().to_vec(), m + k, p.var())
}
