//! Buy-and-hold equity curve from close-to-close returns.
//!
//! equity[0] = S
//! equity[i] = equity[i-1] * (C[i] / C[i-1])

use tracing::debug;

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;
use crate::ports::data_port::BarSource;

/// Starting equity used when none is configured.
pub const DEFAULT_STARTING_EQUITY: f64 = 1.0;

/// Compound `starting_equity` through the close-to-close returns of `bars`.
///
/// The result has one point per bar. No transaction costs, no reinvestment
/// timing.
pub fn build(bars: &[Bar], starting_equity: f64) -> Result<Vec<f64>, BarstatError> {
    if starting_equity.is_nan() || starting_equity <= 0.0 {
        return Err(BarstatError::validation(format!(
            "starting equity must be > 0, got {starting_equity}"
        )));
    }
    if bars.is_empty() {
        return Err(BarstatError::validation("bars must not be empty"));
    }
    debug!(bars = bars.len(), starting_equity, "building equity curve");

    let mut equity = Vec::with_capacity(bars.len());
    equity.push(starting_equity);

    let mut current = starting_equity;
    for (i, pair) in bars.windows(2).enumerate() {
        let prev_close = pair[0].close;
        let curr_close = pair[1].close;
        if prev_close.is_nan() || curr_close.is_nan() || prev_close <= 0.0 || curr_close <= 0.0 {
            return Err(BarstatError::validation(format!(
                "bar close must be > 0 to compute returns (bars {} and {}: {} -> {})",
                i,
                i + 1,
                prev_close,
                curr_close
            )));
        }
        current *= curr_close / prev_close;
        equity.push(current);
    }

    Ok(equity)
}

/// Load bars from `source`, then [`build`] over them.
pub fn build_from_source(
    source: &dyn BarSource,
    starting_equity: f64,
) -> Result<Vec<f64>, BarstatError> {
    let bars = source.load_bars()?;
    build(&bars, starting_equity)
}
