//! Pairwise Pearson correlation between numeric columns.

use crate::types::CorrelationMatrix;

/// Minimum paired observations for a defined coefficient.
const MIN_PAIRS: usize = 2;

/// Pearson coefficient over rows where both values are present.
///
/// Returns `None` when fewer than two pairs remain or either side has zero
/// variance over those pairs.
pub(crate) fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < MIN_PAIRS {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Build the symmetric matrix for the given named columns.
///
/// Each off-diagonal coefficient is computed once and mirrored. A diagonal
/// entry is `1.0` when the column varies, `None` otherwise.
pub(crate) fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let k = columns.len();
    let mut values = vec![vec![None; k]; k];

    for i in 0..k {
        values[i][i] = pearson(&columns[i].1, &columns[i].1).map(|_| 1.0);
        for j in (i + 1)..k {
            let r = pearson(&columns[i].1, &columns[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let r = pearson(&some(&[1.0, 2.0, 3.0, 4.0]), &some(&[2.0, 4.0, 6.0, 8.0])).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson(&some(&[1.0, 2.0, 3.0]), &some(&[3.0, 2.0, 1.0])).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_incomplete_pairs() {
        let xs = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = vec![Some(10.0), Some(99.0), None, Some(30.0)];
        // Only rows 0 and 3 are complete
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert_eq!(pearson(&some(&[1.0]), &some(&[2.0])), None);
        assert_eq!(pearson(&some(&[5.0, 5.0, 5.0]), &some(&[1.0, 2.0, 3.0])), None);
        assert_eq!(pearson(&[None, Some(1.0)], &[Some(1.0), None]), None);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let columns = vec![
            ("a".to_string(), some(&[1.0, 2.0, 3.0, 4.0])),
            ("b".to_string(), some(&[1.0, 3.0, 2.0, 5.0])),
            ("c".to_string(), some(&[4.0, 1.0, 0.0, 2.0])),
        ];
        let matrix = correlation_matrix(&columns);

        assert_eq!(matrix.columns, vec!["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(matrix.values[i][i], Some(1.0));
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
    }

    #[test]
    fn test_matrix_zero_variance_column() {
        let columns = vec![
            ("a".to_string(), some(&[1.0, 2.0, 3.0])),
            ("flat".to_string(), some(&[7.0, 7.0, 7.0])),
        ];
        let matrix = correlation_matrix(&columns);

        assert_eq!(matrix.get("flat", "flat"), None);
        assert_eq!(matrix.get("a", "flat"), None);
        assert_eq!(matrix.get("a", "a"), Some(1.0));
    }

    #[test]
    fn test_matrix_empty() {
        let matrix = correlation_matrix(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.values.is_empty());
    }
}
