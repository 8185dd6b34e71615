//! Structured Matrix Builders
//!
//! This module builds the banded Toeplitz and Sylvester matrices that turn
//! polynomial products into matrix-vector products, together with the small
//! set of dense numerical helpers (rank, nullspace, triangular solve) the
//! solvers run on top of them.
//!
//! For `a(s) = a[0] + a[1] s + ... + a[n] sⁿ` and `c` columns the lower
//! triangular banded Toeplitz (LTBT) matrix is
//! ```text
//! ( a0             )
//! ( a1  a0         )
//! ( :   a1  ..     )
//! ( an  :   ..  a0 )
//! (     an  ..  a1 )
//! (         ..  :  )
//! (             an )
//! ```
//! so that `LTBT(a, c) * coeffs(x) = coeffs(a * x)` for every `x` of degree
//! below `c`.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use ndarray_linalg::{Scalar, SVD};
use num_traits::{One, Zero};

use crate::error::{PolyError, Result};
use crate::poly::{Coefficient, PolyLike};

/// Builds the lower-triangular banded Toeplitz matrix of `a` with `c` columns.
///
/// The matrix has `len + c - 1` rows, where `len = n - m + 1` is the length of
/// the exponent range `[m, n]` of `a` (`degree(a) + c` rows for an ordinary
/// polynomial), and entry `(i, j)` is the coefficient of exponent
/// `m + i - j` when that lies inside the range. A zero polynomial produces an
/// all-zero matrix; `c = 0` produces an empty matrix.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use polyeq::matrix::ltbt_matrix;
/// use polyeq::poly::Polynomial;
///
/// let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
/// let t = ltbt_matrix(&a, 2);
/// assert_eq!(t, arr2(&[[1.0, 0.0], [2.0, 1.0], [3.0, 2.0], [0.0, 3.0]]));
/// ```
pub fn ltbt_matrix<P: PolyLike>(a: &P, c: usize) -> Array2<P::Coeff> {
    let span = a.span();
    let rows = (span.len() + c).saturating_sub(1);
    let mut t = Array2::zeros((rows, c));

    for j in 0..c {
        for (k, &v) in span.iter().enumerate() {
            t[(j + k, j)] = v;
        }
    }

    t
}

/// Builds the Sylvester matrix `[LTBT(a, w1) | LTBT(b, w2)]` with explicit
/// block widths.
///
/// Both blocks are zero padded to the common row count
/// `max(deg(a) + w1, deg(b) + w2)`, so that
/// `S * [coeffs(x); coeffs(y)] = coeffs(a*x + b*y)` for `deg(x) < w1` and
/// `deg(y) < w2`. The matrix is square only for matching widths; the
/// rectangular shapes are used by least-squares and nullspace problems.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use polyeq::matrix::sylvester_matrix_widths;
/// use polyeq::poly::Polynomial;
///
/// let a = Polynomial::new(vec![1.0, 2.0]);
/// let b = Polynomial::new(vec![3.0]);
/// let s = sylvester_matrix_widths(&a, &b, (1, 1));
/// assert_eq!(s, arr2(&[[1.0, 3.0], [2.0, 0.0]]));
/// ```
pub fn sylvester_matrix_widths<P: PolyLike>(
    a: &P,
    b: &P,
    widths: (usize, usize),
) -> Array2<P::Coeff> {
    let (w1, w2) = widths;
    let ta = ltbt_matrix(a, w1);
    let tb = ltbt_matrix(b, w2);
    let rows = ta.nrows().max(tb.nrows());

    let mut s = Array2::zeros((rows, w1 + w2));
    s.slice_mut(s![..ta.nrows(), ..w1]).assign(&ta);
    s.slice_mut(s![..tb.nrows(), w1..]).assign(&tb);
    s
}

/// Builds the default-size Sylvester matrix for `a*x + b*y` with `deg(x) = degx`.
///
/// `degx` defaults to `deg(b) - 1`. The right block width follows from
/// `deg(y) = deg(a) + degx - deg(b)`, which makes both products reach the
/// same degree. Negative degrees give empty blocks. This is a thin wrapper
/// over [`sylvester_matrix_widths`].
pub fn sylvester_matrix<P: PolyLike>(a: &P, b: &P, degx: Option<isize>) -> Array2<P::Coeff> {
    let (da, db) = (span_degree(a), span_degree(b));
    let degx = degx.unwrap_or(db - 1);
    let degy = da + degx - db;
    sylvester_matrix_widths(a, b, (block_width(degx), block_width(degy)))
}

/// Builds the square resultant matrix with widths `(deg(b), deg(a))`.
///
/// It has full rank `deg(a) + deg(b)` exactly when `a` and `b` have no common
/// root.
pub fn sylvester_resultant_matrix<P: PolyLike>(a: &P, b: &P) -> Array2<P::Coeff> {
    let (da, db) = (span_degree(a), span_degree(b));
    sylvester_matrix_widths(a, b, (db.max(0) as usize, da.max(0) as usize))
}

/// Width of the block that holds the coefficients of a degree `deg` unknown.
pub(crate) fn block_width(deg: isize) -> usize {
    (deg + 1).max(0) as usize
}

/// Length of the exponent range minus one (`degree` for ordinary polynomials).
pub(crate) fn span_degree<P: PolyLike>(p: &P) -> isize {
    let (m, n) = p.exponent_range();
    n - m
}

/// Numerical rank: the number of singular values above `rtol * sigma_max`.
///
/// `rtol` defaults to `max(rows, cols) * eps`.
pub fn rank<T: Coefficient>(m: &Array2<T>, rtol: Option<f64>) -> Result<usize> {
    if m.is_empty() {
        return Ok(0);
    }

    let (_, sigma, _) = m.svd(false, false)?;
    let tol = rank_threshold(&sigma, rtol, m.dim());
    Ok(sigma.iter().filter(|&&s| s > tol).count())
}

/// Orthonormal basis of the kernel of `m`, one basis vector per column.
///
/// Columns are ordered from the smallest singular value upwards, so the first
/// column is the direction `m` annihilates most strongly. The rank decision
/// uses the same threshold as [`rank`].
pub fn nullspace<T: Coefficient>(m: &Array2<T>, rtol: Option<f64>) -> Result<Array2<T>> {
    let (rows, cols) = m.dim();
    if cols == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    if rows == 0 {
        return Ok(Array2::eye(cols));
    }

    let (_, sigma, vt) = m.svd(false, true)?;
    let vt = vt.ok_or_else(|| {
        PolyError::Numerical("SVD returned no right singular vectors".to_string())
    })?;
    let tol = rank_threshold(&sigma, rtol, (rows, cols));
    let rank = sigma.iter().filter(|&&s| s > tol).count();

    // V = VT^H; trailing rows of VT span the kernel
    let mut basis = Array2::zeros((cols, cols - rank));
    for (j, k) in (rank..cols).rev().enumerate() {
        for i in 0..cols {
            basis[(i, j)] = vt[(k, i)].conj();
        }
    }

    Ok(basis)
}

fn rank_threshold(sigma: &Array1<f64>, rtol: Option<f64>, dim: (usize, usize)) -> f64 {
    let sigma_max = sigma.iter().cloned().fold(0.0, f64::max);
    let rtol = rtol.unwrap_or(dim.0.max(dim.1) as f64 * f64::EPSILON);
    rtol * sigma_max
}

/// Diagonal matrix `diag(+1, -1, +1, ...)` of order `n`.
///
/// Right-multiplying `LTBT(a, n)` by it turns `a * x` into `a * x̃` for real
/// `x`, since the continuous conjugate flips the sign of odd coefficients.
pub(crate) fn alternating_signs<T: Coefficient>(n: usize) -> Array2<T> {
    let d = Array1::from_iter((0..n).map(|k| {
        if k % 2 == 0 {
            T::one()
        } else {
            -T::one()
        }
    }));
    Array2::from_diag(&d)
}

/// Solves `R x = b` for square upper-triangular `R` by back substitution.
pub(crate) fn back_substitute<T: Coefficient>(
    r: ArrayView2<T>,
    b: ArrayView1<T>,
) -> Result<Array1<T>> {
    let n = r.nrows();
    if r.ncols() != n || b.len() != n {
        return Err(PolyError::InvalidArgument {
            arg: "r",
            reason: format!(
                "expected square system, got {}×{} with rhs of length {}",
                n,
                r.ncols(),
                b.len()
            ),
        });
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= r[(i, j)] * x[j];
        }
        if r[(i, i)].is_zero() {
            return Err(PolyError::Numerical(format!(
                "triangular factor is singular at row {}",
                i
            )));
        }
        x[i] = sum / r[(i, i)];
    }

    Ok(x)
}
