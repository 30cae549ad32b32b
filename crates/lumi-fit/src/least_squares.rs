//! Damped least-squares (Levenberg-Marquardt) chi-square minimizer.
//!
//! The minimizer is intentionally generic over the model closure: given a
//! parameter vector it returns the expected count per bin, and the routine
//! finds the parameters minimizing the Neyman chi-square against the
//! observed histogram. Bins with zero observed count carry no weight and are
//! skipped, so the degrees of freedom count only populated bins.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;
use serde::{Deserialize, Serialize};

fn fit_error(code: &str, message: impl Into<String>) -> LumiError {
    LumiError::Fit(ErrorInfo::new(code, message.into()))
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iters() -> usize {
    64
}

fn default_lambda_init() -> f64 {
    1e-3
}

/// Minimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitOpts {
    /// Maximum solver iterations.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Relative chi-square improvement below which the fit has converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Initial damping factor.
    #[serde(default = "default_lambda_init")]
    pub lambda_init: f64,
}

impl Default for FitOpts {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            tolerance: default_tolerance(),
            lambda_init: default_lambda_init(),
        }
    }
}

/// Result of a least-squares minimization.
///
/// Non-convergence and a singular normal matrix are reported here rather
/// than as errors; the chi-square is then not meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresOutcome {
    /// Best parameters found.
    pub params: Vec<f64>,
    /// Parameter covariance from the inverted normal matrix at the optimum.
    pub covariance: Option<Vec<Vec<f64>>>,
    /// Chi-square at the best parameters.
    pub chi2: f64,
    /// Degrees of freedom (populated bins minus free parameters).
    pub ndf: usize,
    /// Iterations performed.
    pub n_iters: usize,
    /// Whether the relative-improvement stopping rule was met.
    pub converged: bool,
    /// Reason the covariance could not be computed, if any.
    pub singular: Option<String>,
}

const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e12;

fn clamp_params(params: &mut [f64], bounds: &[(f64, f64)]) {
    for (value, &(lo, hi)) in params.iter_mut().zip(bounds) {
        *value = value.clamp(lo, hi);
    }
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting.
/// Returns `None` when the matrix is singular to working precision.
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot_row = (col..n).max_by(|&a, &b| {
            matrix[a][col]
                .abs()
                .total_cmp(&matrix[b][col].abs())
        })?;
        if matrix[pivot_row][col].abs() < 1e-300 {
            return None;
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);
        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for col in row + 1..n {
            acc -= matrix[row][col] * solution[col];
        }
        solution[row] = acc / matrix[row][row];
        if !solution[row].is_finite() {
            return None;
        }
    }
    Some(solution)
}

fn invert(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut columns = Vec::with_capacity(n);
    for col in 0..n {
        let mut unit = vec![0.0; n];
        unit[col] = 1.0;
        columns.push(solve(matrix.to_vec(), unit)?);
    }
    // columns[j][i] is the (i, j) entry of the inverse.
    let mut inverse = vec![vec![0.0; n]; n];
    for (j, column) in columns.iter().enumerate() {
        for (i, &value) in column.iter().enumerate() {
            inverse[i][j] = value;
        }
    }
    Some(inverse)
}

struct Workspace {
    used: Vec<usize>,
    sigmas: Vec<f64>,
}

impl Workspace {
    fn new(observed: &[f64], n_params: usize) -> Result<Self, LumiError> {
        let used: Vec<usize> = observed
            .iter()
            .enumerate()
            .filter(|(_, &y)| y > 0.0)
            .map(|(i, _)| i)
            .collect();
        if used.len() <= n_params {
            return Err(LumiError::Fit(
                ErrorInfo::new(
                    "insufficient-observations",
                    "need more populated bins than free parameters",
                )
                .with_context("populated_bins", used.len().to_string())
                .with_context("parameters", n_params.to_string()),
            ));
        }
        let sigmas = used.iter().map(|&i| observed[i].max(1.0).sqrt()).collect();
        Ok(Self { used, sigmas })
    }

    fn chi2(&self, observed: &[f64], model: &[f64]) -> f64 {
        self.used
            .iter()
            .zip(&self.sigmas)
            .map(|(&i, sigma)| {
                let r = (observed[i] - model[i]) / sigma;
                r * r
            })
            .sum()
    }
}

fn evaluate_model<F>(
    model: &F,
    params: &[f64],
    expected_len: usize,
) -> Result<Vec<f64>, LumiError>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, LumiError>,
{
    let values = model(params)?;
    if values.len() != expected_len {
        return Err(LumiError::Fit(
            ErrorInfo::new("model-length", "model must cover every observed bin")
                .with_context("model_bins", values.len().to_string())
                .with_context("observed_bins", expected_len.to_string()),
        ));
    }
    Ok(values)
}

/// Jacobian of the weighted model at `params` by forward differences, one
/// row per populated bin.
fn jacobian<F>(
    model: &F,
    params: &[f64],
    bounds: &[(f64, f64)],
    current: &[f64],
    workspace: &Workspace,
    observed_len: usize,
) -> Result<Vec<Vec<f64>>, LumiError>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, LumiError>,
{
    let mut jac = vec![vec![0.0; params.len()]; workspace.used.len()];
    for j in 0..params.len() {
        let step = (params[j].abs() * 1e-6).max(1e-9);
        let mut shifted = params.to_vec();
        shifted[j] = params[j] + step;
        if shifted[j] > bounds[j].1 {
            shifted[j] = params[j] - step;
        }
        let denom = shifted[j] - params[j];
        let values = evaluate_model(model, &shifted, observed_len)?;
        for (row, (&i, sigma)) in workspace.used.iter().zip(&workspace.sigmas).enumerate() {
            jac[row][j] = (values[i] - current[i]) / denom / sigma;
        }
    }
    Ok(jac)
}

fn normal_matrix(jac: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = jac.first().map_or(0, Vec::len);
    let mut normal = vec![vec![0.0; n]; n];
    for row in jac {
        for a in 0..n {
            for b in 0..n {
                normal[a][b] += row[a] * row[b];
            }
        }
    }
    normal
}

/// Minimizes the Neyman chi-square of `model` against `observed`.
///
/// `bounds` holds one `(min, max)` interval per parameter; trial parameters
/// are clamped inside it. The start vector must already satisfy the bounds
/// after clamping. Fit failure (no convergence within `max_iters`) is
/// reported through [`LeastSquaresOutcome::converged`], never as `Err`.
pub fn minimize<F>(
    model: F,
    observed: &[f64],
    start: &[f64],
    bounds: &[(f64, f64)],
    opts: &FitOpts,
) -> Result<LeastSquaresOutcome, LumiError>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, LumiError>,
{
    if start.is_empty() {
        return Err(fit_error("no-parameters", "at least one parameter is required"));
    }
    if bounds.len() != start.len() {
        return Err(LumiError::Fit(
            ErrorInfo::new("bounds-mismatch", "one bound interval per parameter is required")
                .with_context("parameters", start.len().to_string())
                .with_context("bounds", bounds.len().to_string()),
        ));
    }
    let workspace = Workspace::new(observed, start.len())?;
    let ndf = workspace.used.len() - start.len();

    let mut params = start.to_vec();
    clamp_params(&mut params, bounds);
    let mut current = evaluate_model(&model, &params, observed.len())?;
    let mut chi2 = workspace.chi2(observed, &current);
    let mut lambda = opts.lambda_init;
    let mut n_iters = 0;
    let mut converged = false;

    while n_iters < opts.max_iters && !converged {
        n_iters += 1;
        let jac = jacobian(&model, &params, bounds, &current, &workspace, observed.len())?;
        let normal = normal_matrix(&jac);
        let mut gradient = vec![0.0; params.len()];
        for (row, (&i, sigma)) in workspace.used.iter().zip(&workspace.sigmas).enumerate() {
            let residual = (observed[i] - current[i]) / sigma;
            for (slot, &j) in gradient.iter_mut().zip(&jac[row]) {
                *slot += j * residual;
            }
        }

        let mut damped = normal.clone();
        for d in 0..params.len() {
            damped[d][d] *= 1.0 + lambda;
        }
        let Some(delta) = solve(damped, gradient) else {
            lambda = (lambda * 10.0).min(LAMBDA_MAX);
            continue;
        };

        let mut trial = params.clone();
        for (value, step) in trial.iter_mut().zip(&delta) {
            *value += step;
        }
        clamp_params(&mut trial, bounds);
        let trial_counts = evaluate_model(&model, &trial, observed.len())?;
        let trial_chi2 = workspace.chi2(observed, &trial_counts);

        if trial_chi2.is_finite() && trial_chi2 <= chi2 {
            let improvement = chi2 - trial_chi2;
            params = trial;
            current = trial_counts;
            chi2 = trial_chi2;
            lambda = (lambda * 0.3).max(LAMBDA_MIN);
            if improvement <= opts.tolerance * chi2.max(1.0) {
                converged = true;
            }
        } else {
            lambda = (lambda * 10.0).min(LAMBDA_MAX);
        }
    }

    let jac = jacobian(&model, &params, bounds, &current, &workspace, observed.len())?;
    let normal = normal_matrix(&jac);
    let (covariance, singular) = match invert(&normal) {
        Some(inverse) => (Some(inverse), None),
        None => (
            None,
            Some("singular normal matrix at the optimum".to_string()),
        ),
    };

    Ok(LeastSquaresOutcome {
        params,
        covariance,
        chi2,
        ndf,
        n_iters,
        converged,
        singular,
    })
}
