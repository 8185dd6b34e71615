//! L1-Optimal Polynomial Approximation
//!
//! [`axycminl1`] minimises the 1-norm of the coefficients of `y` subject to
//! `a x + y = c`, searching over increasing degrees of `y`. Each degree step
//! is a linear program solved by [`crate::lp::linprog`].

use ndarray::{s, Array1, Array2};
use tracing::{debug, instrument, warn};

use crate::error::{PolyError, Result};
use crate::lp::{linprog, LinProgOptions, LinearProgram, VarKind};
use crate::matrix::ltbt_matrix;
use crate::poly::Polynomial;

/// Options of [`axycminl1`].
#[derive(Debug, Clone)]
pub struct MinL1Options {
    /// Largest degree of `y` to try.
    pub dymax: usize,
    /// Stop once the objective changes by less than this between two steps.
    pub emax: f64,
    /// Options passed to the simplex solver.
    pub lp: LinProgOptions,
}

impl Default for MinL1Options {
    fn default() -> Self {
        Self {
            dymax: 100,
            emax: 1e-4,
            lp: LinProgOptions::default(),
        }
    }
}

/// Outcome of [`axycminl1`].
#[derive(Debug, Clone)]
pub struct MinL1Result {
    /// The polynomial multiplying `a`
    pub x: Polynomial<f64>,
    /// The residual `c - a x`
    pub y: Polynomial<f64>,
    /// `‖y‖₁` over the coefficients
    pub objective: f64,
    /// Degree bound of `y` at the last step
    pub degree: usize,
    /// Number of linear programs solved
    pub iterations: usize,
    /// False if the search stopped at `dymax` without meeting `emax`
    pub converged: bool,
}

/// Minimises `‖y‖₁` subject to `a x + y = c`.
///
/// Starting at `deg(y) = max(deg(a), deg(c))` and going up one degree at a
/// time, every step solves the linear program
/// ```text
/// minimize    Σ (y⁺ᵢ + y⁻ᵢ)
/// subject to  LTBT(a, deg(y) - deg(a) + 1) x + y⁺ - y⁻ = c
///             x free,  y⁺, y⁻ >= 0
/// ```
/// The search stops when two consecutive objectives differ by less than
/// `options.emax`. Reaching `options.dymax` first is a soft stop: the last
/// solution is returned with `converged == false` and a warning is logged.
/// At least one step is always taken.
///
/// # Examples
///
/// ```
/// use polyeq::l1::{axycminl1, MinL1Options};
/// use polyeq::poly::Polynomial;
///
/// let a = Polynomial::new(vec![2.0, 1.0]);
/// let c = Polynomial::new(vec![1.0, 1.0, 1.0]);
/// let res = axycminl1(&a, &c, &MinL1Options::default()).unwrap();
/// assert!(res.converged);
/// let fit = &(&a * &res.x) + &res.y;
/// assert!(fit.is_approx(&c, 0.0, 1e-6));
/// ```
///
/// # Errors
///
/// * `PolyError::ZeroPolynomial` if `a` is zero
/// * `PolyError::LinProg` if a linear program fails
#[instrument(level = "debug", skip_all, fields(dymax = options.dymax, emax = options.emax))]
pub fn axycminl1(
    a: &Polynomial<f64>,
    c: &Polynomial<f64>,
    options: &MinL1Options,
) -> Result<MinL1Result> {
    let da = a.degree();
    if da < 0 {
        return Err(PolyError::ZeroPolynomial);
    }

    let mut dy = da.max(c.degree()) as usize;
    let mut best = l1_step(a, c, dy, &options.lp)?;
    let mut iterations = 1;
    let mut converged = false;
    debug!(dy, objective = best.objective, "initial step");

    while dy < options.dymax {
        dy += 1;
        let step = l1_step(a, c, dy, &options.lp)?;
        iterations += 1;

        let improvement = (best.objective - step.objective).abs();
        debug!(dy, objective = step.objective, improvement, "degree step");
        best = step;

        if improvement < options.emax {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            dy,
            objective = best.objective,
            "degree limit reached before the objective settled"
        );
    }

    Ok(MinL1Result {
        x: best.x,
        y: best.y,
        objective: best.objective,
        degree: dy,
        iterations,
        converged,
    })
}

struct L1Step {
    x: Polynomial<f64>,
    y: Polynomial<f64>,
    objective: f64,
}

/// Solves the L1 problem with `deg(y) <= dy`.
fn l1_step(
    a: &Polynomial<f64>,
    c: &Polynomial<f64>,
    dy: usize,
    lp_options: &LinProgOptions,
) -> Result<L1Step> {
    let t = ltbt_matrix(a, dy + 1 - a.degree() as usize);
    let (rows, nx) = t.dim();

    // Variables: x (nx, free), y+ (rows), y- (rows)
    let nvar = nx + 2 * rows;
    let mut a_eq = Array2::<f64>::zeros((rows, nvar));
    a_eq.slice_mut(s![.., ..nx]).assign(&t);
    for i in 0..rows {
        a_eq[(i, nx + i)] = 1.0;
        a_eq[(i, nx + rows + i)] = -1.0;
    }

    let mut objective = Array1::<f64>::ones(nvar);
    objective.slice_mut(s![..nx]).fill(0.0);

    let mut kinds = vec![VarKind::NonNegative; nvar];
    kinds[..nx].fill(VarKind::Free);

    let program = LinearProgram {
        objective,
        a_eq,
        b_eq: Array1::from(c.padded(rows)),
        kinds,
    };
    let res = linprog(&program, lp_options)?;

    let x = res.x.slice(s![..nx]).to_vec();
    let y = (0..rows)
        .map(|i| res.x[nx + i] - res.x[nx + rows + i])
        .collect();

    Ok(L1Step {
        x: Polynomial::with_var(x, a.var()),
        y: Polynomial::with_var(y, a.var()),
        objective: res.fun,
    })
}
