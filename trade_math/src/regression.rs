//! Ordinary least squares via the normal equations
//!
//! The normal matrix is stabilised with a ridge term proportional to its
//! mean diagonal, so collinear regressors (for example lags of a series
//! with a constant difference) share weight instead of failing outright.

use crate::{MathError, Result};

/// Ridge term as a fraction of the mean diagonal of `X'X`
pub const RIDGE_FACTOR: f64 = 1e-8;

/// Pivots smaller than this fraction of the largest entry are singular
const PIVOT_TOLERANCE: f64 = 1e-13;

/// Solve `min ||X b - y||` for `b`
///
/// `design` holds one row of regressors per observation; every row must
/// have the same width.
pub fn least_squares(design: &[Vec<f64>], target: &[f64]) -> Result<Vec<f64>> {
    if design.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            design.len(),
            target.len()
        )));
    }

    let width = match design.first() {
        Some(row) => row.len(),
        None => {
            return Err(MathError::InsufficientData(
                "Least squares needs at least one observation".to_string(),
            ))
        }
    };

    if width == 0 {
        return Ok(Vec::new());
    }

    if design.len() < width {
        return Err(MathError::InsufficientData(format!(
            "{} regressors need at least {} observations, have {}",
            width,
            width,
            design.len()
        )));
    }

    let mut normal = vec![vec![0.0; width]; width];
    let mut rhs = vec![0.0; width];

    for (row, &y) in design.iter().zip(target) {
        if row.len() != width {
            return Err(MathError::InvalidInput(format!(
                "Ragged design row of width {} (expected {})",
                row.len(),
                width
            )));
        }
        for i in 0..width {
            rhs[i] += row[i] * y;
            for j in 0..width {
                normal[i][j] += row[i] * row[j];
            }
        }
    }

    let trace: f64 = (0..width).map(|i| normal[i][i]).sum();
    let ridge = RIDGE_FACTOR * trace / width as f64;
    for (i, row) in normal.iter_mut().enumerate() {
        row[i] += ridge;
    }

    solve_linear_system(normal, rhs)
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Expected a {}x{} system",
            n, n
        )));
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max);
    if !scale.is_finite() || scale == 0.0 {
        return Err(MathError::SingularMatrix(
            "Matrix has no finite non-zero entry".to_string(),
        ));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() <= PIVOT_TOLERANCE * scale {
            return Err(MathError::SingularMatrix(format!(
                "Pivot {} is numerically zero",
                col
            )));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Solution contains non-finite values".to_string(),
        ));
    }

    Ok(x)
}
