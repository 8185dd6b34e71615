//! Polynomial Model
//!
//! This module contains the polynomial value types consumed by every other
//! part of the crate: dense univariate polynomials, Laurent polynomials and
//! the [`PolyLike`] capability interface that the matrix builders and
//! predicates are written against.
//!
//! Coefficients are stored in **increasing** powers of the variable:
//! ```text
//! P(s) = p[0] + p[1]*s + p[2]*s² + ... + p[n]*sⁿ
//! ```
//! Trailing zeros in storage are allowed; [`Polynomial::degree`] always
//! reports the index of the highest nonzero coefficient.

mod laurent;

pub use laurent::LaurentPolynomial;

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use ndarray::Array2;
use ndarray_linalg::{EigVals, Lapack, Scalar};
use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::error::{PolyError, Result};
use crate::transform;

/// Display variable used when none is given.
pub const DEFAULT_VAR: char = 's';

/// Scalar field of polynomial coefficients.
///
/// Implemented for `f64` and `Complex64`. The `Scalar<Real = f64> + Lapack`
/// bound makes every LAPACK routine used by the solvers available for both
/// fields.
pub trait Coefficient: Scalar<Real = f64> + Lapack {
    /// Promote to a complex number.
    fn to_c64(self) -> Complex64;

    /// Demote from a complex number. Real coefficients keep the real part.
    fn from_c64(z: Complex64) -> Self;
}

impl Coefficient for f64 {
    fn to_c64(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }

    fn from_c64(z: Complex64) -> Self {
        z.re
    }
}

impl Coefficient for Complex64 {
    fn to_c64(self) -> Complex64 {
        self
    }

    fn from_c64(z: Complex64) -> Self {
        z
    }
}

/// Capabilities shared by ordinary and Laurent polynomials.
///
/// The structured matrix builders and the conjugate-symmetry predicate only
/// use this interface, so they accept both kinds of polynomial.
pub trait PolyLike: Clone {
    /// Coefficient field
    type Coeff: Coefficient;

    /// Lowest and highest exponent `(m, n)` of the represented terms.
    /// The range is empty (`n < m`) for a polynomial without terms.
    fn exponent_range(&self) -> (isize, isize);

    /// Coefficient of `var^exponent`, zero outside the range.
    fn coeff_at(&self, exponent: isize) -> Self::Coeff;

    /// Coefficients for exponents `m..=n`, in order.
    fn span(&self) -> Vec<Self::Coeff> {
        let (m, n) = self.exponent_range();
        (m..=n).map(|k| self.coeff_at(k)).collect()
    }

    /// Conjugate with respect to the stability boundary of the kind:
    /// the imaginary axis for ordinary polynomials, the unit circle for
    /// Laurent polynomials.
    fn conjugate(&self) -> Self;

    /// Conjugated coefficients in reversed order over the same range.
    fn reciprocal(&self) -> Self;

    /// Approximate equality: `‖p - q‖₂ <= max(atol, rtol * max(‖p‖₂, ‖q‖₂))`.
    fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool;
}

/// Closed set of polynomial kinds sharing the [`PolyLike`] interface.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyPolynomial<T: Coefficient> {
    /// Ordinary polynomial in `s` (continuous-time)
    Ordinary(Polynomial<T>),
    /// Laurent polynomial in `z` (discrete-time)
    Laurent(LaurentPolynomial<T>),
}

impl<T: Coefficient> From<Polynomial<T>> for AnyPolynomial<T> {
    fn from(p: Polynomial<T>) -> Self {
        AnyPolynomial::Ordinary(p)
    }
}

impl<T: Coefficient> From<LaurentPolynomial<T>> for AnyPolynomial<T> {
    fn from(p: LaurentPolynomial<T>) -> Self {
        AnyPolynomial::Laurent(p)
    }
}

impl<T: Coefficient> PolyLike for AnyPolynomial<T> {
    type Coeff = T;

    fn exponent_range(&self) -> (isize, isize) {
        match self {
            AnyPolynomial::Ordinary(p) => p.exponent_range(),
            AnyPolynomial::Laurent(p) => p.exponent_range(),
        }
    }

    fn coeff_at(&self, exponent: isize) -> T {
        match self {
            AnyPolynomial::Ordinary(p) => p.coeff_at(exponent),
            AnyPolynomial::Laurent(p) => p.coeff_at(exponent),
        }
    }

    fn conjugate(&self) -> Self {
        match self {
            AnyPolynomial::Ordinary(p) => AnyPolynomial::Ordinary(p.conjugate()),
            AnyPolynomial::Laurent(p) => AnyPolynomial::Laurent(p.conjugate()),
        }
    }

    fn reciprocal(&self) -> Self {
        match self {
            AnyPolynomial::Ordinary(p) => AnyPolynomial::Ordinary(p.reciprocal()),
            AnyPolynomial::Laurent(p) => AnyPolynomial::Laurent(p.reciprocal()),
        }
    }

    fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        match (self, other) {
            (AnyPolynomial::Ordinary(p), AnyPolynomial::Ordinary(q)) => {
                p.is_approx(q, rtol, atol)
            }
            (AnyPolynomial::Laurent(p), AnyPolynomial::Laurent(q)) => p.is_approx(q, rtol, atol),
            (AnyPolynomial::Ordinary(p), AnyPolynomial::Laurent(q)) => {
                LaurentPolynomial::from(p.clone()).is_approx(q, rtol, atol)
            }
            (AnyPolynomial::Laurent(p), AnyPolynomial::Ordinary(q)) => {
                p.is_approx(&LaurentPolynomial::from(q.clone()), rtol, atol)
            }
        }
    }
}

/// Dense univariate polynomial.
///
/// # Examples
///
/// ```
/// use polyeq::poly::Polynomial;
///
/// let a = Polynomial::new(vec![1.0, 2.0]);
/// let b = Polynomial::new(vec![3.0, 0.0, 1.0]);
/// let c = &a * &b;
/// assert_eq!(c.coeffs(), &[3.0, 6.0, 1.0, 2.0]);
/// assert_eq!(c.degree(), 3);
/// assert_eq!(c.eval(1.0), 12.0);
/// ```
#[derive(Clone, Debug)]
pub struct Polynomial<T> {
    coeffs: Vec<T>,
    var: char,
}

impl<T: Coefficient> Polynomial<T> {
    /// Polynomial in the default variable `s`.
    pub fn new(coeffs: Vec<T>) -> Self {
        Self::with_var(coeffs, DEFAULT_VAR)
    }

    /// Polynomial in the variable `var`. The variable only affects display.
    pub fn with_var(coeffs: Vec<T>, var: char) -> Self {
        Self { coeffs, var }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::new(Vec::new())
    }

    /// Constant polynomial `c`.
    pub fn constant(c: T) -> Self {
        Self::new(vec![c])
    }

    /// Monic polynomial with the given roots (multiplicity by repetition).
    ///
    /// The product is formed in complex arithmetic and demoted to `T`, so
    /// real polynomials need conjugate-closed root sets.
    pub fn from_roots(roots: &[Complex64]) -> Self {
        let mut coeffs = vec![Complex64::one()];
        for &r in roots {
            // Multiply by (s - r)
            coeffs.push(Complex64::zero());
            for i in (1..coeffs.len()).rev() {
                coeffs[i] = coeffs[i - 1] - r * coeffs[i];
            }
            coeffs[0] *= -r;
        }
        Self::new(coeffs.into_iter().map(T::from_c64).collect())
    }

    /// Display variable.
    pub fn var(&self) -> char {
        self.var
    }

    /// Same coefficients under a different display variable.
    pub fn renamed(mut self, var: char) -> Self {
        self.var = var;
        self
    }

    /// Raw coefficient storage (may contain trailing zeros).
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Coefficient of `var^k`, zero beyond the storage.
    pub fn coeff(&self, k: usize) -> T {
        self.coeffs.get(k).copied().unwrap_or_else(T::zero)
    }

    /// Index of the highest nonzero coefficient, `-1` for the zero polynomial.
    pub fn degree(&self) -> isize {
        let mut deg = self.coeffs.len() as isize - 1;
        while deg >= 0 && self.coeffs[deg as usize].is_zero() {
            deg -= 1;
        }

        deg
    }

    /// True if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.degree() < 0
    }

    /// Coefficient of the highest power, zero for the zero polynomial.
    pub fn leading_coefficient(&self) -> T {
        match self.degree() {
            d if d < 0 => T::zero(),
            d => self.coeffs[d as usize],
        }
    }

    /// Copy without trailing zero coefficients.
    pub fn trimmed(&self) -> Self {
        let len = (self.degree() + 1) as usize;
        Self::with_var(self.coeffs[..len].to_vec(), self.var)
    }

    /// Copy with storage zero-padded (or trimmed) to exactly `len` coefficients.
    pub(crate) fn padded(&self, len: usize) -> Vec<T> {
        let mut v = self.coeffs.clone();
        v.resize(len, T::zero());
        v
    }

    /// Evaluate at `x` using Horner's method.
    pub fn eval(&self, x: T) -> T {
        self.coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// Multiply every coefficient by `k`.
    pub fn scaled(&self, k: T) -> Self {
        Self::with_var(self.coeffs.iter().map(|&c| c * k).collect(), self.var)
    }

    /// Euclidean norm of the coefficient vector.
    pub fn norm(&self) -> f64 {
        coeff_norm(&self.coeffs)
    }

    /// Largest coefficient magnitude.
    pub fn norm_inf(&self) -> f64 {
        self.coeffs.iter().map(|c| c.abs()).fold(0.0, f64::max)
    }

    /// Approximate equality, see [`PolyLike::is_approx`].
    pub fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        let diff = self - other;
        diff.norm() <= atol.max(rtol * self.norm().max(other.norm()))
    }

    /// Promote to complex coefficients.
    pub fn to_complex(&self) -> Polynomial<Complex64> {
        Polynomial::with_var(self.coeffs.iter().map(|&c| c.to_c64()).collect(), self.var)
    }

    /// Demote complex coefficients to `T`.
    pub fn from_complex(p: &Polynomial<Complex64>) -> Self {
        Self::with_var(p.coeffs.iter().map(|&c| T::from_c64(c)).collect(), p.var)
    }

    /// Roots of the polynomial, repeated according to multiplicity.
    ///
    /// Computed as the eigenvalues of the companion matrix (LAPACK `xGEEV`
    /// via ndarray-linalg). A constant polynomial has no roots.
    ///
    /// # Errors
    ///
    /// * `PolyError::ZeroPolynomial` for the zero polynomial
    /// * `PolyError::Linalg` if the eigenvalue computation fails
    pub fn roots(&self) -> Result<Vec<Complex64>> {
        let n = self.degree();
        if n < 0 {
            return Err(PolyError::ZeroPolynomial);
        }
        let n = n as usize;
        if n == 0 {
            return Ok(Vec::new());
        }

        let lead = self.coeffs[n].to_c64();
        let mut companion = Array2::<Complex64>::zeros((n, n));
        for i in 1..n {
            companion[(i, i - 1)] = Complex64::one();
        }
        for i in 0..n {
            companion[(i, n - 1)] = -self.coeffs[i].to_c64() / lead;
        }

        let eigenvalues = companion.eigvals()?;
        Ok(eigenvalues.to_vec())
    }
}

impl<T: Coefficient> PolyLike for Polynomial<T> {
    type Coeff = T;

    fn exponent_range(&self) -> (isize, isize) {
        (0, self.degree())
    }

    fn coeff_at(&self, exponent: isize) -> T {
        if exponent < 0 {
            T::zero()
        } else {
            self.coeff(exponent as usize)
        }
    }

    fn conjugate(&self) -> Self {
        transform::cconj(self)
    }

    fn reciprocal(&self) -> Self {
        transform::conj_reciprocal(self)
    }

    fn is_approx(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        Polynomial::is_approx(self, other, rtol, atol)
    }
}

impl<T: Coefficient> PartialEq for Polynomial<T> {
    fn eq(&self, other: &Self) -> bool {
        let (d1, d2) = (self.degree(), other.degree());
        d1 == d2 && self.coeffs[..(d1 + 1) as usize] == other.coeffs[..(d2 + 1) as usize]
    }
}

impl<T: Coefficient> fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<(isize, T)> = self
            .coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(k, &c)| (k as isize, c))
            .collect();
        write_terms(f, &terms, self.var)
    }
}

impl<T: Coefficient> Add for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn add(self, rhs: Self) -> Polynomial<T> {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..len).map(|k| self.coeff(k) + rhs.coeff(k)).collect();
        Polynomial::with_var(coeffs, self.var)
    }
}

impl<T: Coefficient> Sub for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, rhs: Self) -> Polynomial<T> {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..len).map(|k| self.coeff(k) - rhs.coeff(k)).collect();
        Polynomial::with_var(coeffs, self.var)
    }
}

impl<T: Coefficient> Mul for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: Self) -> Polynomial<T> {
        let coeffs = convolve(&self.trimmed().coeffs, &rhs.trimmed().coeffs);
        Polynomial::with_var(coeffs, self.var)
    }
}

impl<T: Coefficient> Neg for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Polynomial<T> {
        Polynomial::with_var(self.coeffs.iter().map(|&c| -c).collect(), self.var)
    }
}

impl<T: Coefficient> Neg for Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Polynomial<T> {
        -&self
    }
}

/// Forward owned operands to the by-reference implementation.
macro_rules! forward_owned_binop {
    ($ty:ident, $tr:ident, $method:ident) => {
        impl<T: Coefficient> $tr for $ty<T> {
            type Output = $ty<T>;

            fn $method(self, rhs: Self) -> $ty<T> {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Polynomial, Add, add);
forward_owned_binop!(Polynomial, Sub, sub);
forward_owned_binop!(Polynomial, Mul, mul);

pub(crate) use forward_owned_binop;

/// Full discrete convolution of two coefficient sequences.
pub(crate) fn convolve<T: Coefficient>(a: &[T], b: &[T]) -> Vec<T> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![T::zero(); a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Euclidean norm of a coefficient slice.
pub(crate) fn coeff_norm<T: Coefficient>(c: &[T]) -> f64 {
    c.iter().map(|x| x.square()).sum::<f64>().sqrt()
}

/// Shared term printer for ordinary and Laurent polynomials.
pub(crate) fn write_terms<T: Coefficient>(
    f: &mut fmt::Formatter<'_>,
    terms: &[(isize, T)],
    var: char,
) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }

    for (i, (k, c)) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, " + ")?;
        }
        match k {
            0 => write!(f, "{}", c)?,
            1 => write!(f, "{}*{}", c, var)?,
            _ => write!(f, "{}*{}^{}", c, var, k)?,
        }
    }
    Ok(())
}
