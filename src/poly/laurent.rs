//! Laurent polynomials for the discrete-time (unit circle) setting.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use ndarray_linalg::Scalar;
use num_traits::Zero;

use super::{
    coeff_norm, convolve, forward_owned_binop, write_terms, Coefficient, PolyLike, Polynomial,
};
use crate::transform;

/// Display variable of Laurent polynomials.
pub const DEFAULT_LAURENT_VAR: char = 'z';

/// Laurent polynomial `p[0]*z^m + p[1]*z^(m+1) + ... + p[len-1]*z^n`.
///
/// The exponent range `[m, n]` is the stored range; `m` may be negative.
/// Zeros at either end of the storage are kept until [`trimmed`](Self::trimmed)
/// is called, so builders see exactly the range the caller specified.
///
/// # Examples
///
/// ```
/// use polyeq::poly::LaurentPolynomial;
///
/// // 2 z^-1 + 5 + 2 z
/// let p = LaurentPolynomial::new(vec![2.0, 5.0, 2.0], -1);
/// assert_eq!(p.exponent_bounds(), (-1, 1));
/// assert_eq!(p.coeff(1), 2.0);
/// assert_eq!(p.eval(1.0), 9.0);
/// ```
#[derive(Clone, Debug)]
pub struct LaurentPolynomial<T> {
    coeffs: Vec<T>,
    lowest: isize,
    var: char,
}

impl<T: Coefficient> LaurentPolynomial<T> {
    /// Laurent polynomial in `z` whose first coefficient multiplies `z^lowest`.
    pub fn new(coeffs: Vec<T>, lowest: isize) -> Self {
        Self::with_var(coeffs, lowest, DEFAULT_LAURENT_VAR)
    }

    /// Laurent polynomial in the display variable `var`.
    pub fn with_var(coeffs: Vec<T>, lowest: isize, var: char) -> Self {
        Self {
            coeffs,
            lowest,
            var,
        }
    }

    /// The zero Laurent polynomial.
    pub fn zero() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Display variable.
    pub fn var(&self) -> char {
        self.var
    }

    /// Raw coefficient storage, lowest exponent first.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Stored exponent range `(m, n)`; `n = m - 1` when there is no storage.
    pub fn exponent_bounds(&self) -> (isize, isize) {
        (self.lowest, self.lowest + self.coeffs.len() as isize - 1)
    }

    /// Coefficient of `z^k`, zero outside the stored range.
    pub fn coeff(&self, k: isize) -> T {
        let idx = k - self.lowest;
        if idx < 0 {
            return T::zero();
        }
        self.coeffs.get(idx as usize).copied().unwrap_or_else(T::zero)
    }

    /// True if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Copy without zero coefficients at either end of the range.
    pub fn trimmed(&self) -> Self {
        let first = self.coeffs.iter().position(|c| !c.is_zero());
        let last = self.coeffs.iter().rposition(|c| !c.is_zero());
        match (first, last) {
            (Some(first), Some(last)) => Self::with_var(
                self.coeffs[first..=last].to_vec(),
                self.lowest + first as isize,
                self.var,
            ),
            _ => Self::with_var(Vec::new(), 0, self.var),
        }
    }

    /// Evaluate at a nonzero point `z`.
    pub fn eval(&self, z: T) -> T {
        let (m, _) = self.exponent_bounds();
        let tail = self
            .coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * z + c);
        tail * z.powi(m as i32)
    }

    /// Approximate equality, see [`PolyLike::is_approx`].
    pub fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        let diff = self - other;
        let scale = coeff_norm(&self.coeffs).max(coeff_norm(&other.coeffs));
        coeff_norm(&diff.coeffs) <= atol.max(rtol * scale)
    }

    /// Split as `z^m * p(z)` with `p` an ordinary polynomial; returns `(p, m)`.
    ///
    /// The split is taken on the trimmed range, so `p(0) != 0` unless the
    /// Laurent polynomial is zero.
    pub fn to_polynomial_parts(&self) -> (Polynomial<T>, isize) {
        let t = self.trimmed();
        (Polynomial::with_var(t.coeffs, self.var), t.lowest)
    }
}

impl<T: Coefficient> From<Polynomial<T>> for LaurentPolynomial<T> {
    fn from(p: Polynomial<T>) -> Self {
        LaurentPolynomial::with_var(p.coeffs().to_vec(), 0, p.var())
    }
}

impl<T: Coefficient> PolyLike for LaurentPolynomial<T> {
    type Coeff = T;

    fn exponent_range(&self) -> (isize, isize) {
        self.exponent_bounds()
    }

    fn coeff_at(&self, exponent: isize) -> T {
        self.coeff(exponent)
    }

    fn conjugate(&self) -> Self {
        transform::dconj(self.clone())
    }

    fn reciprocal(&self) -> Self {
        let coeffs = self.coeffs.iter().rev().map(|c| c.conj()).collect();
        Self::with_var(coeffs, self.lowest, self.var)
    }

    fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        LaurentPolynomial::is_approx(self, other, rtol, atol)
    }
}

impl<T: Coefficient> PartialEq for LaurentPolynomial<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.trimmed(), other.trimmed());
        a.coeffs == b.coeffs && (a.coeffs.is_empty() || a.lowest == b.lowest)
    }
}

impl<T: Coefficient> fmt::Display for LaurentPolynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<(isize, T)> = self
            .coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, &c)| (self.lowest + i as isize, c))
            .collect();
        write_terms(f, &terms, self.var)
    }
}

/// Coefficient-wise combination over the union of both ranges.
fn combine<T: Coefficient>(
    a: &LaurentPolynomial<T>,
    b: &LaurentPolynomial<T>,
    op: impl Fn(T, T) -> T,
) -> LaurentPolynomial<T> {
    if a.coeffs.is_empty() && b.coeffs.is_empty() {
        return LaurentPolynomial::with_var(Vec::new(), 0, a.var);
    }
    let (am, an) = a.exponent_bounds();
    let (bm, bn) = b.exponent_bounds();
    let (lo, hi) = match (a.coeffs.is_empty(), b.coeffs.is_empty()) {
        (true, _) => (bm, bn),
        (_, true) => (am, an),
        _ => (am.min(bm), an.max(bn)),
    };
    let coeffs = (lo..=hi).map(|k| op(a.coeff(k), b.coeff(k))).collect();
    LaurentPolynomial::with_var(coeffs, lo, a.var)
}

impl<T: Coefficient> Add for &LaurentPolynomial<T> {
    type Output = LaurentPolynomial<T>;

    fn add(self, rhs: Self) -> LaurentPolynomial<T> {
        combine(self, rhs, |x, y| x + y)
    }
}

impl<T: Coefficient> Sub for &LaurentPolynomial<T> {
    type Output = LaurentPolynomial<T>;

    fn sub(self, rhs: Self) -> LaurentPolynomial<T> {
        combine(self, rhs, |x, y| x - y)
    }
}

impl<T: Coefficient> Mul for &LaurentPolynomial<T> {
    type Output = LaurentPolynomial<T>;

    fn mul(self, rhs: Self) -> LaurentPolynomial<T> {
        LaurentPolynomial::with_var(
            convolve(&self.coeffs, &rhs.coeffs),
            self.lowest + rhs.lowest,
            self.var,
        )
    }
}

impl<T: Coefficient> Neg for &LaurentPolynomial<T> {
    type Output = LaurentPolynomial<T>;

    fn neg(self) -> LaurentPolynomial<T> {
        let coeffs = self.coeffs.iter().map(|&c| -c).collect();
        LaurentPolynomial::with_var(coeffs, self.lowest, self.var)
    }
}

forward_owned_binop!(LaurentPolynomial, Add, add);
forward_owned_binop!(LaurentPolynomial, Sub, sub);
forward_owned_binop!(LaurentPolynomial, Mul, mul);
