//! Period and annualized return metrics.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::domain::error::BarstatError;

/// Periods per year used when the configured value is not positive.
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;

/// How the average period return is scaled to a yearly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Annualization {
    /// avg_period_return * periods_per_year
    #[default]
    Simple,
    /// (1 + cumulative_return)^(periods_per_year / periods) - 1
    Compounded,
}

impl fmt::Display for Annualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annualization::Simple => write!(f, "simple"),
            Annualization::Compounded => write!(f, "compounded"),
        }
    }
}

impl FromStr for Annualization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Annualization::Simple),
            "compounded" => Ok(Annualization::Compounded),
            other => Err(format!(
                "unknown annualization mode '{other}', expected simple or compounded"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnMetrics {
    pub cumulative_return: f64,
    pub avg_period_return: f64,
    pub annualized_return: f64,
}

/// Computes [`ReturnMetrics`] for a fixed sampling frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnCalculator {
    periods_per_year: u32,
    annualization: Annualization,
}

impl Default for ReturnCalculator {
    fn default() -> Self {
        Self {
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            annualization: Annualization::Simple,
        }
    }
}

impl ReturnCalculator {
    /// Non-positive `periods_per_year` falls back to [`DEFAULT_PERIODS_PER_YEAR`].
    pub fn new(periods_per_year: i64) -> Self {
        Self {
            periods_per_year: normalize_periods_per_year(periods_per_year),
            annualization: Annualization::Simple,
        }
    }

    pub fn with_annualization(mut self, annualization: Annualization) -> Self {
        self.annualization = annualization;
        self
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    pub fn annualization(&self) -> Annualization {
        self.annualization
    }

    /// Metrics from an equity curve (one value per period).
    pub fn from_equity(&self, equity: &[f64]) -> Result<ReturnMetrics, BarstatError> {
        if equity.len() < 2 {
            return Err(BarstatError::validation(
                "equity curve must contain at least two values",
            ));
        }
        let starting_value = equity[0];
        if starting_value == 0.0 {
            return Err(BarstatError::validation("equity start value cannot be zero"));
        }
        debug!(points = equity.len(), "computing return metrics from equity");

        let mut sum_returns = 0.0;
        for (i, pair) in equity.windows(2).enumerate() {
            if pair[0] == 0.0 {
                return Err(BarstatError::arithmetic(format!(
                    "equity value at index {i} is zero, period return is undefined"
                )));
            }
            sum_returns += pair[1] / pair[0] - 1.0;
        }

        let periods = equity.len() - 1;
        let cumulative_return = equity[periods] / starting_value - 1.0;
        let avg_period_return = sum_returns / periods as f64;
        self.finish(cumulative_return, avg_period_return, periods)
    }

    /// Metrics from per-period arithmetic returns.
    pub fn from_returns(&self, returns: &[f64]) -> Result<ReturnMetrics, BarstatError> {
        if returns.is_empty() {
            return Err(BarstatError::validation("returns must not be empty"));
        }
        debug!(periods = returns.len(), "computing return metrics from returns");

        let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
        let avg_period_return = returns.iter().sum::<f64>() / returns.len() as f64;
        self.finish(growth - 1.0, avg_period_return, returns.len())
    }

    fn finish(
        &self,
        cumulative_return: f64,
        avg_period_return: f64,
        periods: usize,
    ) -> Result<ReturnMetrics, BarstatError> {
        let per_year = f64::from(self.periods_per_year);
        let annualized_return = match self.annualization {
            Annualization::Simple => avg_period_return * per_year,
            Annualization::Compounded => {
                let growth = 1.0 + cumulative_return;
                if growth <= 0.0 {
                    return Err(BarstatError::arithmetic(format!(
                        "cannot compound a total growth factor of {growth}"
                    )));
                }
                growth.powf(per_year / periods as f64) - 1.0
            }
        };

        Ok(ReturnMetrics {
            cumulative_return,
            avg_period_return,
            annualized_return,
        })
    }
}

fn normalize_periods_per_year(periods_per_year: i64) -> u32 {
    match u32::try_from(periods_per_year) {
        Ok(p) if p > 0 => p,
        _ => {
            warn!(
                periods_per_year,
                fallback = DEFAULT_PERIODS_PER_YEAR,
                "periods_per_year out of range, using default"
            );
            DEFAULT_PERIODS_PER_YEAR
        }
    }
}
