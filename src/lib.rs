//! polyeq: polynomial equation solvers
//!
//! Solvers for linear equations whose unknowns are univariate polynomials,
//! built on structured (Toeplitz and Sylvester) matrices and LAPACK through
//! `ndarray-linalg`.
//!
//! # Organization
//!
//! - `poly`: polynomial and Laurent polynomial types, the `PolyLike` interface
//! - `transform`: conjugations, reciprocal, scaling and shift
//! - `matrix`: LTBT and Sylvester matrix builders, rank and nullspace
//! - `solve`: `axb`, `axby0`, `axbyc`, `axaxbb`, `axbycd`
//! - `l1`: L1-optimal solver `axycminl1`
//! - `lp`: dense two-phase simplex used by `l1`
//! - `analysis`: coprimality, Schur/Hurwitz stability, conjugate symmetry
//! - `spectral`: spectral factorization by root splitting
//!
//! Coefficients are stored in increasing powers of the variable.
//!
//! # Example
//!
//! ```
//! use polyeq::poly::Polynomial;
//! use polyeq::solve::{axbyc, DegreePolicy};
//!
//! let a = Polynomial::new(vec![1.0, 2.0, 3.0]);
//! let b = Polynomial::new(vec![4.0, 5.0]);
//! let c = Polynomial::new(vec![6.0, 7.0, 8.0]);
//!
//! let (x, y) = axbyc(&a, &b, &c, DegreePolicy::MinDegreeY, None)
//!     .unwrap()
//!     .expect("a and b are coprime");
//! assert!((x.coeff(0) - 46.0 / 11.0).abs() < 1e-10);
//! assert_eq!(y.degree(), 1);
//! ```

pub mod analysis;
pub mod error;
pub mod l1;
pub mod lp;
pub mod matrix;
pub mod poly;
pub mod solve;
pub mod spectral;
pub mod transform;

pub use error::{PolyError, Result};
pub use poly::{AnyPolynomial, Coefficient, LaurentPolynomial, PolyLike, Polynomial};
