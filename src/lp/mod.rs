//! Linear Programming
//!
//! Dense two-phase simplex for programs in equality form
//! ```text
//! minimize    cᵀx
//! subject to  A x = b
//!             x_j >= 0   for non-negative variables
//!             x_j free   otherwise
//! ```
//! Free variables are split into the difference of two non-negative
//! columns. Bland's rule is used for both the entering and the leaving
//! variable, which rules out cycling on degenerate vertices.

use ndarray::{Array1, Array2};
use thiserror::Error;
use tracing::{debug, trace};

/// Failure modes of [`linprog`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinProgError {
    /// No point satisfies the constraints
    #[error("linear program is infeasible (phase one objective {0:e})")]
    Infeasible(f64),

    /// The objective decreases without bound along a feasible ray
    #[error("linear program is unbounded along variable {0}")]
    Unbounded(usize),

    /// A basic variable or the phase one objective became negative
    #[error("simplex lost primal feasibility (value {0:e})")]
    LostFeasibility(f64),

    /// The simplex method exhausted its pivot budget
    #[error("simplex did not converge within {0} iterations")]
    IterationLimit(usize),

    /// Inconsistent problem dimensions
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// Sign constraint of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    /// Unrestricted in sign
    Free,
    /// Restricted to `x >= 0`
    NonNegative,
}

/// Options for the simplex solver.
#[derive(Debug, Clone)]
pub struct LinProgOptions {
    /// Maximum number of pivots over both phases.
    pub max_iter: usize,
    /// Pivot and optimality tolerance.
    pub tol: f64,
}

impl Default for LinProgOptions {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tol: 1e-9,
        }
    }
}

/// Linear program in equality form.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// Objective coefficients (minimize `objective · x`).
    pub objective: Array1<f64>,
    /// Equality constraint matrix.
    pub a_eq: Array2<f64>,
    /// Equality constraint right-hand side.
    pub b_eq: Array1<f64>,
    /// Sign constraint of each variable.
    pub kinds: Vec<VarKind>,
}

/// Optimal point of a linear program.
#[derive(Debug, Clone)]
pub struct LinProgResult {
    /// Optimal solution vector.
    pub x: Array1<f64>,
    /// Optimal objective value.
    pub fun: f64,
    /// Number of pivots performed.
    pub nit: usize,
}

/// Solves a linear program with the two-phase simplex method.
///
/// # Examples
///
/// ```
/// use ndarray::{arr1, arr2};
/// use polyeq::lp::{linprog, LinProgOptions, LinearProgram, VarKind};
///
/// // minimize -x1 - 2 x2  s.t.  x1 + x2 + s1 = 4,  x1 + 3 x2 + s2 = 6
/// let lp = LinearProgram {
///     objective: arr1(&[-1.0, -2.0, 0.0, 0.0]),
///     a_eq: arr2(&[[1.0, 1.0, 1.0, 0.0], [1.0, 3.0, 0.0, 1.0]]),
///     b_eq: arr1(&[4.0, 6.0]),
///     kinds: vec![VarKind::NonNegative; 4],
/// };
/// let res = linprog(&lp, &LinProgOptions::default()).unwrap();
/// assert!((res.fun + 5.0).abs() < 1e-9);
/// ```
///
/// # Errors
///
/// * `LinProgError::DimensionMismatch` for inconsistent shapes
/// * `LinProgError::Infeasible` if phase one cannot drive the artificial
///   variables to zero
/// * `LinProgError::Unbounded` if the objective has no lower bound
/// * `LinProgError::IterationLimit` if `max_iter` pivots were not enough
pub fn linprog(
    lp: &LinearProgram,
    options: &LinProgOptions,
) -> Result<LinProgResult, LinProgError> {
    let n = lp.objective.len();
    let (m, ncols) = lp.a_eq.dim();

    if ncols != n {
        return Err(LinProgError::DimensionMismatch(format!(
            "A_eq has {} columns but the objective has {} entries",
            ncols, n
        )));
    }
    if lp.b_eq.len() != m {
        return Err(LinProgError::DimensionMismatch(format!(
            "A_eq has {} rows but b_eq has {} entries",
            m,
            lp.b_eq.len()
        )));
    }
    if lp.kinds.len() != n {
        return Err(LinProgError::DimensionMismatch(format!(
            "{} variable kinds given for {} variables",
            lp.kinds.len(),
            n
        )));
    }

    // Standard-form columns: (original variable, sign)
    let mut columns: Vec<(usize, f64)> = Vec::with_capacity(2 * n);
    for (j, kind) in lp.kinds.iter().enumerate() {
        columns.push((j, 1.0));
        if *kind == VarKind::Free {
            columns.push((j, -1.0));
        }
    }
    let ns = columns.len();
    let rhs = ns + m;

    // Tableau rows 0..m are constraints, row m holds reduced costs and -z.
    // Artificial variable i lives in column ns + i.
    let mut tab = Array2::<f64>::zeros((m + 1, rhs + 1));
    for i in 0..m {
        let flip = if lp.b_eq[i] < 0.0 { -1.0 } else { 1.0 };
        for (c, &(j, sign)) in columns.iter().enumerate() {
            tab[(i, c)] = flip * sign * lp.a_eq[(i, j)];
        }
        tab[(i, ns + i)] = 1.0;
        tab[(i, rhs)] = flip * lp.b_eq[i];
    }
    let mut basis: Vec<usize> = (ns..ns + m).collect();

    // Phase one: minimize the sum of artificial variables
    for c in 0..ns {
        tab[(m, c)] = -(0..m).map(|i| tab[(i, c)]).sum::<f64>();
    }
    tab[(m, rhs)] = -(0..m).map(|i| tab[(i, rhs)]).sum::<f64>();

    let mut nit = 0;
    run_simplex(&mut tab, &mut basis, ns, options, &mut nit)?;

    let b_max = lp.b_eq.iter().map(|v| v.abs()).fold(0.0, f64::max);
    let feas_tol = 1e3 * options.tol * (1.0 + b_max);
    let infeasibility = -tab[(m, rhs)];
    if infeasibility > feas_tol {
        debug!(infeasibility, "phase one ended with positive artificial sum");
        return Err(LinProgError::Infeasible(infeasibility));
    }
    if infeasibility < -feas_tol {
        return Err(LinProgError::LostFeasibility(infeasibility));
    }

    // Drive remaining artificial variables out of the basis. Rows where that
    // is impossible are redundant and stay untouched by later pivots.
    for i in 0..m {
        if basis[i] >= ns {
            if let Some(c) = (0..ns).find(|&c| tab[(i, c)].abs() > options.tol) {
                pivot(&mut tab, i, c);
                basis[i] = c;
            }
        }
    }

    // Phase two: original objective in canonical form
    tab.row_mut(m).fill(0.0);
    for (c, &(j, sign)) in columns.iter().enumerate() {
        tab[(m, c)] = sign * lp.objective[j];
    }
    for i in 0..m {
        let bc = basis[i];
        if bc < ns {
            let cost = tab[(m, bc)];
            if cost != 0.0 {
                let row = tab.row(i).to_owned();
                tab.row_mut(m).scaled_add(-cost, &row);
            }
        }
    }
    run_simplex(&mut tab, &mut basis, ns, options, &mut nit)?;

    let worst = (0..m).map(|i| tab[(i, rhs)]).fold(0.0, f64::min);
    if worst < -feas_tol {
        return Err(LinProgError::LostFeasibility(worst));
    }

    let mut x = Array1::<f64>::zeros(n);
    for (i, &bc) in basis.iter().enumerate() {
        if bc < ns {
            let (j, sign) = columns[bc];
            x[j] += sign * tab[(i, rhs)];
        }
    }
    let fun = lp.objective.dot(&x);
    debug!(nit, fun, "simplex finished");

    Ok(LinProgResult { x, fun, nit })
}

/// Pivots until no structural column has a negative reduced cost.
fn run_simplex(
    tab: &mut Array2<f64>,
    basis: &mut [usize],
    ns: usize,
    options: &LinProgOptions,
    nit: &mut usize,
) -> Result<(), LinProgError> {
    let m = basis.len();
    let rhs = tab.ncols() - 1;

    loop {
        // Bland: lowest-index improving column
        let Some(enter) = (0..ns).find(|&c| tab[(m, c)] < -options.tol) else {
            return Ok(());
        };
        if *nit >= options.max_iter {
            return Err(LinProgError::IterationLimit(options.max_iter));
        }

        // Minimum ratio test, ties broken by the lowest basic index
        let mut leave: Option<(usize, f64)> = None;
        for i in 0..m {
            let a = tab[(i, enter)];
            if a <= options.tol {
                continue;
            }
            let ratio = tab[(i, rhs)] / a;
            let replaces = match leave {
                None => true,
                Some((li, lr)) => {
                    ratio < lr - options.tol
                        || ((ratio - lr).abs() <= options.tol && basis[i] < basis[li])
                }
            };
            if replaces {
                leave = Some((i, ratio));
            }
        }
        let Some((row, ratio)) = leave else {
            return Err(LinProgError::Unbounded(enter));
        };

        trace!(enter, row, ratio, "pivot");
        pivot(tab, row, enter);
        basis[row] = enter;
        *nit += 1;
    }
}

/// Gauss-Jordan pivot on `(row, col)`.
fn pivot(tab: &mut Array2<f64>, row: usize, col: usize) {
    let p = tab[(row, col)];
    tab.row_mut(row).mapv_inplace(|v| v / p);
    let pivot_row = tab.row(row).to_owned();

    for i in 0..tab.nrows() {
        if i == row {
            continue;
        }
        let f = tab[(i, col)];
        if f != 0.0 {
            tab.row_mut(i).scaled_add(-f, &pivot_row);
        }
    }
}
