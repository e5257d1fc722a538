//! One-call analysis of a bar series.
//!
//! Runs both moving averages and the equity -> drawdown / returns chain over
//! the same bars. The two paths are independent; any failure aborts the
//! whole analysis.

use tracing::{debug, info};

use crate::domain::bar::Bar;
use crate::domain::drawdown;
use crate::domain::equity::{self, DEFAULT_STARTING_EQUITY};
use crate::domain::error::BarstatError;
use crate::domain::indicator::twma::DEFAULT_TIME_CONSTANT_DAYS;
use crate::domain::indicator::{compute_indicator, IndicatorSeries, IndicatorType};
use crate::domain::returns::{
    Annualization, ReturnCalculator, ReturnMetrics, DEFAULT_PERIODS_PER_YEAR,
};

pub const DEFAULT_VWMA_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub time_constant_days: f64,
    pub vwma_window: usize,
    pub starting_equity: f64,
    pub periods_per_year: i64,
    pub annualization: Annualization,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_constant_days: DEFAULT_TIME_CONSTANT_DAYS,
            vwma_window: DEFAULT_VWMA_WINDOW,
            starting_equity: DEFAULT_STARTING_EQUITY,
            periods_per_year: i64::from(DEFAULT_PERIODS_PER_YEAR),
            annualization: Annualization::Simple,
        }
    }
}

impl AnalysisConfig {
    pub fn return_calculator(&self) -> ReturnCalculator {
        ReturnCalculator::new(self.periods_per_year).with_annualization(self.annualization)
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub twma: IndicatorSeries,
    /// `None` when there are fewer bars than the window.
    pub vwma: Option<IndicatorSeries>,
    pub equity: Vec<f64>,
    /// `None` for a single-bar series.
    pub max_drawdown: Option<f64>,
    /// `None` for a single-bar series.
    pub returns: Option<ReturnMetrics>,
}

pub fn analyze(bars: &[Bar], config: &AnalysisConfig) -> Result<Analysis, BarstatError> {
    if bars.is_empty() {
        return Err(BarstatError::validation("bars must not be empty"));
    }
    debug!(bars = bars.len(), ?config, "starting analysis");

    let twma = compute_indicator(bars, &IndicatorType::Twma(config.time_constant_days))?;

    let vwma = if bars.len() >= config.vwma_window {
        Some(compute_indicator(
            bars,
            &IndicatorType::Vwma(config.vwma_window),
        )?)
    } else {
        debug!(
            bars = bars.len(),
            window = config.vwma_window,
            "series shorter than vwma window, skipping"
        );
        None
    };

    let equity = equity::build(bars, config.starting_equity)?;

    let (max_drawdown, returns) = if equity.len() >= 2 {
        let mdd = drawdown::max_drawdown(&equity)?;
        let metrics = config.return_calculator().from_equity(&equity)?;
        (Some(mdd), Some(metrics))
    } else {
        (None, None)
    };

    info!(
        bars = bars.len(),
        final_equity = equity.last().copied(),
        max_drawdown,
        "analysis complete"
    );

    Ok(Analysis {
        twma,
        vwma,
        equity,
        max_drawdown,
        returns,
    })
}
