//! Drawdown from the running peak of an equity curve.

use crate::domain::error::BarstatError;

fn validate(equity: &[f64]) -> Result<(), BarstatError> {
    if equity.len() < 2 {
        return Err(BarstatError::validation(
            "equity curve must contain at least two values",
        ));
    }
    if let Some((i, value)) = equity
        .iter()
        .enumerate()
        .find(|(_, v)| v.is_nan() || **v <= 0.0)
    {
        return Err(BarstatError::validation(format!(
            "equity values must be > 0 (index {i}: {value})"
        )));
    }
    Ok(())
}

/// (peak - value) / peak at every point, peak being the running maximum.
pub fn drawdown_series(equity: &[f64]) -> Result<Vec<f64>, BarstatError> {
    validate(equity)?;

    let mut peak = equity[0];
    Ok(equity
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            (peak - value) / peak
        })
        .collect())
}

/// Largest drawdown over the curve, in `[0, 1)`.
pub fn max_drawdown(equity: &[f64]) -> Result<f64, BarstatError> {
    Ok(drawdown_series(equity)?.into_iter().fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn series_tracks_running_peak() {
        let dd = drawdown_series(&[100.0, 90.0, 95.0, 80.0]).unwrap();
        assert_eq!(dd.len(), 4);
        assert_eq!(dd[0], 0.0);
        assert_relative_eq!(dd[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(dd[2], 0.05, epsilon = 1e-12);
        assert_relative_eq!(dd[3], 0.20, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_picks_deepest_point() {
        assert_relative_eq!(
            max_drawdown(&[100.0, 90.0, 95.0, 80.0]).unwrap(),
            0.20,
            epsilon = 1e-12
        );
    }

    #[test]
    fn new_peak_resets_reference() {
        let mdd = max_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]).unwrap();
        assert_relative_eq!(mdd, (110.0 - 80.0) / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn non_decreasing_curve_has_zero_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 2.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn decreasing_curve_measures_first_to_last() {
        let equity = [200.0, 150.0, 120.0, 50.0];
        assert_relative_eq!(
            max_drawdown(&equity).unwrap(),
            (200.0 - 50.0) / 200.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rejects_short_curve() {
        assert!(matches!(
            max_drawdown(&[100.0]),
            Err(BarstatError::Validation { .. })
        ));
        assert!(max_drawdown(&[]).is_err());
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(matches!(
            max_drawdown(&[100.0, 0.0, 50.0]),
            Err(BarstatError::Validation { .. })
        ));
        assert!(max_drawdown(&[-1.0, 5.0]).is_err());
        assert!(drawdown_series(&[5.0, -0.5]).is_err());
    }
}
