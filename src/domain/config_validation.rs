//! Configuration validation.
//!
//! Validates the `[analysis]` section, then builds an [`AnalysisConfig`].
//! Missing keys take their defaults; present keys must parse and be in range.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::error::BarstatError;
use crate::domain::returns::Annualization;
use crate::ports::config_port::ConfigPort;

pub const SECTION: &str = "analysis";

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), BarstatError> {
    load_analysis_config(config).map(|_| ())
}

/// Read every key once, check it, and fall back to defaults for absent keys.
pub fn load_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, BarstatError> {
    let defaults = AnalysisConfig::default();
    Ok(AnalysisConfig {
        time_constant_days: read_time_constant(config)?.unwrap_or(defaults.time_constant_days),
        vwma_window: read_vwma_window(config)?.unwrap_or(defaults.vwma_window),
        starting_equity: read_starting_equity(config)?.unwrap_or(defaults.starting_equity),
        periods_per_year: read_periods_per_year(config)?.unwrap_or(defaults.periods_per_year),
        annualization: read_annualization(config)?.unwrap_or(defaults.annualization),
    })
}

fn invalid(key: &str, reason: impl Into<String>) -> BarstatError {
    BarstatError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn positive_double(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, BarstatError> {
    let value = config
        .get_double(SECTION, key)
        .map_err(|reason| invalid(key, reason))?;
    match value {
        Some(v) if v.is_nan() || v <= 0.0 => {
            Err(invalid(key, format!("{key} must be positive")))
        }
        other => Ok(other),
    }
}

fn read_time_constant(config: &dyn ConfigPort) -> Result<Option<f64>, BarstatError> {
    positive_double(config, "time_constant_days")
}

fn read_vwma_window(config: &dyn ConfigPort) -> Result<Option<usize>, BarstatError> {
    let key = "vwma_window";
    match config.get_int(SECTION, key).map_err(|reason| invalid(key, reason))? {
        None => Ok(None),
        Some(v) => usize::try_from(v)
            .ok()
            .filter(|w| *w >= 1)
            .map(Some)
            .ok_or_else(|| invalid(key, "vwma_window must be at least 1")),
    }
}

fn read_starting_equity(config: &dyn ConfigPort) -> Result<Option<f64>, BarstatError> {
    positive_double(config, "starting_equity")
}

// Non-positive values are normalized by the return calculator; only the type is checked.
fn read_periods_per_year(config: &dyn ConfigPort) -> Result<Option<i64>, BarstatError> {
    config
        .get_int(SECTION, "periods_per_year")
        .map_err(|reason| invalid("periods_per_year", reason))
}

fn read_annualization(config: &dyn ConfigPort) -> Result<Option<Annualization>, BarstatError> {
    config
        .get_string(SECTION, "annualization")
        .map(|mode| {
            mode.parse::<Annualization>()
                .map_err(|reason| invalid("annualization", reason))
        })
        .transpose()
}
