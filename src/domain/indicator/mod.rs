//! Streaming moving-average indicators.
//!
//! This module provides:
//! - `Indicator`: the streaming contract shared by every moving average
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a batch result aligned one-to-one with the input bars
//! - `compute_indicator`: batch dispatch over an `IndicatorType`

pub mod twma;
pub mod vwma;

use std::fmt;

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;

pub use twma::TimeWeightedMovingAverage;
pub use vwma::VolumeWeightedMovingAverage;

/// A stateful transform fed one bar at a time.
///
/// Instances own their state exclusively; `update` calls on one instance
/// must be issued sequentially.
pub trait Indicator {
    /// Feed the next bar and return the indicator value after it.
    fn update(&mut self, bar: &Bar) -> Result<f64, BarstatError>;

    /// Drop all accumulated state.
    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorType {
    Twma(f64),
    Vwma(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    /// Values that are ready, i.e. not the warmup sentinel.
    pub fn ready_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| !v.is_nan())
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Twma(time_constant) => write!(f, "TWMA({})", time_constant),
            IndicatorType::Vwma(window) => write!(f, "VWMA({})", window),
        }
    }
}

/// Run the batch form of `indicator_type` over `bars`.
pub fn compute_indicator(
    bars: &[Bar],
    indicator_type: &IndicatorType,
) -> Result<IndicatorSeries, BarstatError> {
    let values = match *indicator_type {
        IndicatorType::Twma(time_constant) => {
            TimeWeightedMovingAverage::compute(bars, time_constant)?
        }
        IndicatorType::Vwma(window) => VolumeWeightedMovingAverage::compute(bars, window)?,
    };
    Ok(IndicatorSeries {
        indicator_type: indicator_type.clone(),
        values,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::make_bars;
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Twma(5.0).to_string(), "TWMA(5)");
        assert_eq!(IndicatorType::Twma(2.5).to_string(), "TWMA(2.5)");
        assert_eq!(IndicatorType::Vwma(20).to_string(), "VWMA(20)");
    }

    #[test]
    fn compute_indicator_dispatches_twma() {
        let bars = make_bars(&[10.0, 20.0], &[1.0, 1.0]);
        let series = compute_indicator(&bars, &IndicatorType::Twma(5.0)).unwrap();
        assert_eq!(series.indicator_type, IndicatorType::Twma(5.0));
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.values[0], 10.0);
    }

    #[test]
    fn compute_indicator_dispatches_vwma() {
        let bars = make_bars(&[10.0, 20.0, 30.0], &[1.0, 1.0, 1.0]);
        let series = compute_indicator(&bars, &IndicatorType::Vwma(2)).unwrap();
        assert_eq!(series.values.len(), 3);
        assert!(series.values[0].is_nan());
        assert_eq!(series.ready_values().count(), 2);
        assert_eq!(series.last(), Some(25.0));
    }

    #[test]
    fn compute_indicator_propagates_validation() {
        let bars = make_bars(&[10.0], &[1.0]);
        assert!(matches!(
            compute_indicator(&bars, &IndicatorType::Vwma(3)),
            Err(BarstatError::Validation { .. })
        ));
    }

    #[test]
    fn trait_objects_share_the_streaming_contract() {
        let bars = make_bars(&[10.0, 20.0], &[1.0, 1.0]);
        let mut indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(TimeWeightedMovingAverage::new(5.0).unwrap()),
            Box::new(VolumeWeightedMovingAverage::new(1).unwrap()),
        ];
        for indicator in indicators.iter_mut() {
            for bar in &bars {
                indicator.update(bar).unwrap();
            }
            indicator.reset();
        }
    }
}
