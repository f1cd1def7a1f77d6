//! Small linear-algebra routines.

use crate::error::SplineError;
use num_traits::Float;

/// Solves a tridiagonal system in place using the Thomas algorithm.
///
/// Row `i` of the system reads
/// `lower[i] * x[i-1] + diag[i] * x[i] + upper[i] * x[i+1] = rhs[i]`;
/// `lower[0]` and `upper[n-1]` are ignored. `rhs` holds `columns`
/// right-hand sides stored row-major (`rhs[i * columns + c]`), which lets
/// all coordinates of a point sequence be solved in one sweep. On success
/// `rhs` contains the solution.
///
/// The matrix must be strictly diagonally dominant, which guarantees the
/// sweep never divides by zero and needs no pivoting. Runs in `O(n * columns)`.
///
/// # Errors
///
/// - [`SplineError::DimensionMismatch`] if the slice lengths disagree.
/// - [`SplineError::NotDiagonallyDominant`] for the first offending row.
///
/// # Example
///
/// ```
/// use splinum::linalg::solve_tridiagonal;
///
/// // 2x + y = 3, x + 2y = 3  =>  x = y = 1
/// let mut rhs = vec![3.0, 3.0];
/// solve_tridiagonal(&[0.0, 1.0], &[2.0, 2.0], &[1.0, 0.0], &mut rhs, 1).unwrap();
/// assert!((rhs[0] - 1.0_f64).abs() < 1e-12);
/// assert!((rhs[1] - 1.0_f64).abs() < 1e-12);
/// ```
pub fn solve_tridiagonal<F: Float>(
    lower: &[F],
    diag: &[F],
    upper: &[F],
    rhs: &mut [F],
    columns: usize,
) -> Result<(), SplineError> {
    let n = diag.len();
    for len in [lower.len(), upper.len()] {
        if len != n {
            return Err(SplineError::DimensionMismatch {
                expected: n,
                found: len,
            });
        }
    }
    if rhs.len() != n * columns {
        return Err(SplineError::DimensionMismatch {
            expected: n * columns,
            found: rhs.len(),
        });
    }
    if n == 0 {
        return Ok(());
    }

    let off_diagonal = |i: usize| {
        let a = if i > 0 { lower[i].abs() } else { F::zero() };
        let c = if i + 1 < n { upper[i].abs() } else { F::zero() };
        a + c
    };
    if let Some(row) = (0..n).find(|&i| diag[i].abs() <= off_diagonal(i)) {
        return Err(SplineError::NotDiagonallyDominant { row });
    }

    // Forward sweep
    let mut scaled_upper = vec![F::zero(); n];
    scaled_upper[0] = if n > 1 { upper[0] / diag[0] } else { F::zero() };
    for value in &mut rhs[..columns] {
        *value = *value / diag[0];
    }
    for i in 1..n {
        let m = F::one() / (diag[i] - lower[i] * scaled_upper[i - 1]);
        if i + 1 < n {
            scaled_upper[i] = upper[i] * m;
        }
        for c in 0..columns {
            let prev = rhs[(i - 1) * columns + c];
            let cur = &mut rhs[i * columns + c];
            *cur = (*cur - lower[i] * prev) * m;
        }
    }

    // Back substitution
    for i in (0..n - 1).rev() {
        for c in 0..columns {
            let next = rhs[(i + 1) * columns + c];
            let cur = &mut rhs[i * columns + c];
            *cur = *cur - scaled_upper[i] * next;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_row() {
        let mut rhs = vec![8.0_f64, -4.0];
        solve_tridiagonal(&[0.0], &[4.0], &[0.0], &mut rhs, 2).unwrap();
        assert_eq!(rhs, vec![2.0, -1.0]);
    }

    #[test]
    fn test_natural_spline_system() {
        // Tangent system of the natural cubic through x = [1, -1, 1, 4, 7].
        let lower = [0.0_f64, 1.0, 1.0, 1.0, 1.0];
        let diag = [2.0, 4.0, 4.0, 4.0, 2.0];
        let upper = [1.0, 1.0, 1.0, 1.0, 0.0];
        let mut rhs = vec![-6.0, 0.0, 15.0, 18.0, 9.0];
        solve_tridiagonal(&lower, &diag, &upper, &mut rhs, 1).unwrap();

        let expected = [-3.0, 0.0, 3.0, 3.0, 3.0];
        for (got, want) in rhs.iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_multiple_columns() {
        // Same matrix, second column is twice the first.
        let lower = [0.0_f64, 1.0, 1.0];
        let diag = [4.0, 4.0, 4.0];
        let upper = [1.0, 1.0, 0.0];
        let mut rhs = vec![5.0, 10.0, 6.0, 12.0, 5.0, 10.0];
        solve_tridiagonal(&lower, &diag, &upper, &mut rhs, 2).unwrap();
        for row in rhs.chunks_exact(2) {
            assert_relative_eq!(row[0], 1.0, epsilon = 1e-12);
            assert_relative_eq!(row[1], 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_dominant() {
        let mut rhs = vec![1.0_f64, 1.0];
        let err = solve_tridiagonal(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], &mut rhs, 1)
            .unwrap_err();
        assert_eq!(err, SplineError::NotDiagonallyDominant { row: 0 });
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut rhs = vec![1.0_f64; 3];
        let err = solve_tridiagonal(&[0.0, 1.0], &[4.0, 4.0], &[1.0, 0.0], &mut rhs, 1)
            .unwrap_err();
        assert_eq!(
            err,
            SplineError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
