//! ARIMA(1,1,1) estimation for monthly demand series.
//!
//! Hand-rolled conditional least squares: difference the series once,
//! approximate the innovation sequence with a long autoregression, then
//! regress the differenced series on its own lag and the lagged
//! innovation (Hannan-Rissanen). Any numerical degeneracy is reported as
//! an error so the caller can fall back to a mean forecast; nothing in
//! this module panics on data.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArimaError {
    #[error("series too short to difference and fit")]
    SeriesTooShort,
    #[error("differenced series has no variance")]
    DegenerateSeries,
    #[error("normal equations are singular")]
    SingularSystem,
    #[error("estimated coefficients are not finite")]
    NonFiniteEstimate,
}

/// Minimum usable length of the differenced series
const MIN_DIFFERENCED_LEN: usize = 12;

/// Coefficients are clamped inside the stationary/invertible region
const COEFFICIENT_BOUND: f64 = 0.98;

/// Fit ARIMA(1,1,1) on `series` and forecast `horizon` steps ahead.
pub fn fit_forecast(series: &[f64], horizon: usize) -> Result<Vec<f64>, ArimaError> {
    if horizon == 0 {
        return Ok(Vec::new());
    }
    if series.len() < MIN_DIFFERENCED_LEN + 1 {
        return Err(ArimaError::SeriesTooShort);
    }

    // d = 1
    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let n = diff.len();

    let mean = diff.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = diff.iter().map(|v| v - mean).collect();

    let variance = centered.iter().map(|v| v * v).sum::<f64>() / n as f64;
    if !variance.is_finite() || variance < 1e-9 {
        return Err(ArimaError::DegenerateSeries);
    }

    // Stage one: long AR approximation of the innovation sequence
    let p_long = (n / 4).clamp(2, 6);
    let ar = fit_ar(&centered, p_long)?;
    let mut innovations = vec![0.0; n];
    for t in p_long..n {
        let mut predicted = 0.0;
        for (lag, coefficient) in ar.iter().enumerate() {
            predicted += coefficient * centered[t - lag - 1];
        }
        innovations[t] = centered[t] - predicted;
    }

    // Stage two: w[t] on w[t-1] and e[t-1]
    let start = p_long + 1;
    if n <= start + 2 {
        return Err(ArimaError::SeriesTooShort);
    }
    let mut xtx = vec![vec![0.0; 2]; 2];
    let mut xty = vec![0.0; 2];
    for t in start..n {
        let x = [centered[t - 1], innovations[t - 1]];
        for i in 0..2 {
            xty[i] += x[i] * centered[t];
            for j in 0..2 {
                xtx[i][j] += x[i] * x[j];
            }
        }
    }
    let solution = solve(xtx, xty).ok_or(ArimaError::SingularSystem)?;
    let (phi, theta) = (solution[0], solution[1]);
    if !phi.is_finite() || !theta.is_finite() {
        return Err(ArimaError::NonFiniteEstimate);
    }
    let phi = phi.clamp(-COEFFICIENT_BOUND, COEFFICIENT_BOUND);
    let theta = theta.clamp(-COEFFICIENT_BOUND, COEFFICIENT_BOUND);

    // Forecast the differenced series recursively, then integrate.
    // Future innovations are zero, so only the AR term survives past
    // the first step.
    let last_w = centered[n - 1];
    let last_e = innovations[n - 1];
    let mut centered_step = phi * last_w + theta * last_e;
    let mut level = series[series.len() - 1];
    let mut forecasts = Vec::with_capacity(horizon);
    for _ in 0..horizon {
        level += mean + centered_step;
        if !level.is_finite() {
            return Err(ArimaError::NonFiniteEstimate);
        }
        forecasts.push(level);
        centered_step *= phi;
    }
    Ok(forecasts)
}

/// Least-squares AR(p) fit via the normal equations
fn fit_ar(series: &[f64], p: usize) -> Result<Vec<f64>, ArimaError> {
    let n = series.len();
    if n <= p + 1 {
        return Err(ArimaError::SeriesTooShort);
    }
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for t in p..n {
        for i in 0..p {
            xty[i] += series[t - i - 1] * series[t];
            for j in 0..p {
                xtx[i][j] += series[t - i - 1] * series[t - j - 1];
            }
        }
    }
    solve(xtx, xty).ok_or(ArimaError::SingularSystem)
}

/// Gaussian elimination with partial pivoting for the small normal
/// systems above. Returns None when the matrix is singular.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot_row = (col..n).max_by(|&x, &y| {
            a[x][col]
                .abs()
                .partial_cmp(&a[y][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() < 1e-10 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
        if !x[row].is_finite() {
            return None;
        }
    }
    Some(x)
}
