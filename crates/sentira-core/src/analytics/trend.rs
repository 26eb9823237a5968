//! Least-squares trend fitting and dispersion helpers.

use sentira_types::report::{TrendAnalysis, TrendLabel};

const STABLE_BAND: f64 = 0.01;

/// Ordinary least-squares slope of `values` against their ordinal index.
/// Needs at least two points.
pub fn ols_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    // denominator is zero only for n < 2, handled above.
    Some(numerator / denominator)
}

/// Fit a trend over an ordered series. Empty input reports no data, a
/// single point reports insufficient data.
pub fn trend_of(values: &[f64]) -> TrendAnalysis {
    if values.is_empty() {
        return TrendAnalysis {
            label: TrendLabel::NoData,
            slope: None,
            strength: None,
        };
    }
    match ols_slope(values) {
        None => TrendAnalysis {
            label: TrendLabel::InsufficientData,
            slope: None,
            strength: None,
        },
        Some(slope) => {
            let label = if slope > STABLE_BAND {
                TrendLabel::Improving
            } else if slope < -STABLE_BAND {
                TrendLabel::Declining
            } else {
                TrendLabel::Stable
            };
            TrendAnalysis {
                label,
                slope: Some(slope),
                strength: Some(slope.abs()),
            }
        }
    }
}

/// Population standard deviation. Zero for empty input.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_of_increasing_series() {
        let slope = ols_slope(&[0.1, 0.3, 0.5, 0.7]).unwrap();
        assert!((slope - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_slope_needs_two_points() {
        assert!(ols_slope(&[]).is_none());
        assert!(ols_slope(&[0.5]).is_none());
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(trend_of(&[0.1, 0.3, 0.6]).label, TrendLabel::Improving);
        assert_eq!(trend_of(&[0.9, 0.5, 0.2]).label, TrendLabel::Declining);
        assert_eq!(trend_of(&[0.5, 0.5, 0.5]).label, TrendLabel::Stable);
        assert_eq!(trend_of(&[0.5, 0.505]).label, TrendLabel::Stable);
        assert_eq!(trend_of(&[0.5]).label, TrendLabel::InsufficientData);
        assert_eq!(trend_of(&[]).label, TrendLabel::NoData);
    }

    #[test]
    fn test_trend_strength_is_slope_magnitude() {
        let trend = trend_of(&[0.9, 0.5, 0.1]);
        assert!((trend.slope.unwrap() + 0.4).abs() < 1e-9);
        assert!((trend.strength.unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_stddev_constant_series_is_zero() {
        assert_eq!(population_stddev(&[0.4, 0.4, 0.4]), 0.0);
        assert_eq!(population_stddev(&[]), 0.0);
    }

    #[test]
    fn test_stddev_spread_series() {
        // {0, 1} has population stddev 0.5.
        assert!((population_stddev(&[0.0, 1.0]) - 0.5).abs() < 1e-9);
    }
}
