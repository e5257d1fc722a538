//! Time-Weighted Moving Average.
//!
//! An EMA whose decay depends on elapsed calendar days rather than on the
//! number of observations:
//!
//! u = exp(-(t[i] - t[i-1]) / T)
//! EMA[i] = u * EMA[i-1] + (1 - u) * C[i]
//!
//! Seeded with the first close. Dates that move backward count as zero
//! elapsed days, which leaves the EMA unchanged for that bar.

use tracing::{debug, trace, warn};

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;
use crate::domain::indicator::Indicator;

/// Default time constant, in days.
pub const DEFAULT_TIME_CONSTANT_DAYS: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct TimeWeightedMovingAverage {
    time_constant_days: f64,
    initialized: bool,
    ema: f64,
    last_day: i64,
}

impl TimeWeightedMovingAverage {
    pub fn new(time_constant_days: f64) -> Result<Self, BarstatError> {
        if time_constant_days.is_nan() || time_constant_days <= 0.0 {
            return Err(BarstatError::validation(format!(
                "time constant must be > 0 days, got {time_constant_days}"
            )));
        }
        Ok(Self {
            time_constant_days,
            initialized: false,
            ema: 0.0,
            last_day: 0,
        })
    }

    pub fn time_constant_days(&self) -> f64 {
        self.time_constant_days
    }

    pub fn reset(&mut self) {
        self.initialized = false;
        self.ema = 0.0;
        self.last_day = 0;
    }

    /// Fold `bar` into the average and return the new value.
    ///
    /// A malformed `bar.date` fails before any state is touched.
    pub fn update(&mut self, bar: &Bar) -> Result<f64, BarstatError> {
        let day = bar.day_number()?;

        if !self.initialized {
            self.ema = bar.close;
            self.last_day = day;
            self.initialized = true;
            trace!(date = %bar.date, ema = self.ema, "twma seeded");
            return Ok(self.ema);
        }

        let mut delta = day - self.last_day;
        self.last_day = day;
        if delta < 0 {
            warn!(
                date = %bar.date,
                delta_days = delta,
                "twma date moved backward, treating as zero elapsed time"
            );
            delta = 0;
        }

        let u = (-(delta as f64) / self.time_constant_days).exp();
        self.ema = u * self.ema + (1.0 - u) * bar.close;
        trace!(date = %bar.date, delta_days = delta, decay = u, ema = self.ema, "twma update");

        Ok(self.ema)
    }

    pub fn has_value(&self) -> bool {
        self.initialized
    }

    pub fn value(&self) -> Result<f64, BarstatError> {
        if !self.initialized {
            return Err(BarstatError::State {
                reason: "time-weighted moving average has no value yet".into(),
            });
        }
        Ok(self.ema)
    }

    /// Feed every bar through a fresh instance; output is aligned with `bars`.
    pub fn compute(bars: &[Bar], time_constant_days: f64) -> Result<Vec<f64>, BarstatError> {
        if bars.is_empty() {
            return Err(BarstatError::validation("bars must not be empty"));
        }
        debug!(bars = bars.len(), time_constant_days, "computing twma");

        let mut twma = Self::new(time_constant_days)?;
        bars.iter().map(|bar| twma.update(bar)).collect()
    }
}

impl Indicator for TimeWeightedMovingAverage {
    fn update(&mut self, bar: &Bar) -> Result<f64, BarstatError> {
        TimeWeightedMovingAverage::update(self, bar)
    }

    fn reset(&mut self) {
        TimeWeightedMovingAverage::reset(self)
    }
}
