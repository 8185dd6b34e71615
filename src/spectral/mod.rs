//! Spectral Factorization
//!
//! Given a conjugate-symmetric `a = b̃ b`, these routines return a stable
//! factor `x` with `x̃ x = a` by splitting the roots of `a`. Roots exactly on
//! the stability boundary are not treated specially.

use ndarray_linalg::Scalar;
use num_complex::Complex64;
use tracing::{debug, instrument, warn};

use crate::error::{PolyError, Result};
use crate::poly::{Coefficient, LaurentPolynomial, Polynomial};

/// Hurwitz factor `x` of `a = x̃ x` for the imaginary-axis conjugate.
///
/// Keeps the roots with negative real part and scales the monic product by
/// `sqrt(|lead(a)|)`.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
/// use polyeq::spectral::spectral_factor_continuous;
/// use polyeq::transform::cconj;
///
/// let b = Polynomial::new(vec![2.0, 3.0, 1.0]);
/// let a = &cconj(&b) * &b;
/// let x = spectral_factor_continuous(&a).unwrap();
/// assert!(x.is_approx(&b, 1e-8, 0.0));
/// ```
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` is zero
/// * `PolyError::Linalg` if root finding fails
#[instrument(level = "debug", skip_all)]
pub fn spectral_factor_continuous<T: Coefficient>(a: &Polynomial<T>) -> Result<Polynomial<T>> {
    let roots = a.roots()?;
    let stable: Vec<Complex64> = roots.iter().copied().filter(|r| r.re < 0.0).collect();
    if 2 * stable.len() != roots.len() {
        warn!(
            stable = stable.len(),
            total = roots.len(),
            "roots do not split evenly across the imaginary axis"
        );
    }

    let k = a.leading_coefficient().abs().sqrt();
    debug!(degree = stable.len(), gain = k, "continuous factor");
    let monic: Polynomial<T> = Polynomial::from_roots(&stable);
    Ok(monic.scaled(T::from_real(k)).renamed(a.var()))
}

/// Schur factor of a Laurent polynomial `a = x̃ x` for the unit-circle
/// conjugate.
///
/// `a` must span `[-n, n]`. The roots of `zⁿ a(z)` inside the unit circle
/// form the monic factor, which is scaled so that the `z⁰` coefficient of
/// `x̃ x` equals that of `a`.
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` is zero
/// * `PolyError::InvalidArgument` if the range of `a` is not symmetric or its
///   `z⁰` coefficient is not positive
/// * `PolyError::Linalg` if root finding fails
#[instrument(level = "debug", skip_all)]
pub fn spectral_factor_circle<T: Coefficient>(a: &LaurentPolynomial<T>) -> Result<Polynomial<T>> {
    if a.is_zero() {
        return Err(PolyError::ZeroPolynomial);
    }

    let (p, m) = a.to_polynomial_parts();
    if m + p.degree() != -m {
        return Err(PolyError::InvalidArgument {
            arg: "a",
            reason: format!("exponent range [{}, {}] is not symmetric", m, m + p.degree()),
        });
    }

    let a0 = a.coeff(0).re();
    if a0 <= 0.0 {
        return Err(PolyError::InvalidArgument {
            arg: "a",
            reason: format!("z^0 coefficient {} is not positive", a0),
        });
    }

    let roots = p.roots()?;
    let stable: Vec<Complex64> = roots.iter().copied().filter(|r| r.norm() < 1.0).collect();
    if 2 * stable.len() != roots.len() {
        warn!(
            stable = stable.len(),
            total = roots.len(),
            "roots do not split evenly across the unit circle"
        );
    }

    let monic: Polynomial<T> = Polynomial::from_roots(&stable);
    let k = (a0 / monic.norm().powi(2)).sqrt();
    debug!(degree = stable.len(), gain = k, "circle factor");
    Ok(monic.scaled(T::from_real(k)).renamed(a.var()))
}
