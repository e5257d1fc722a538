//! Price bar record consumed by the analytics engine.

use chrono::NaiveDate;

use crate::domain::calendar;
use crate::domain::error::BarstatError;

/// One sampled OHLCV observation.
///
/// `date` is kept in its `YYYYMMDD` wire form; only `close` and `volume`
/// feed the statistics, the rest is carried through for callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bar {
    pub symbol: String,
    pub period: String,
    pub date: String,
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub open_interest: u64,
}

impl Bar {
    /// Day number of `date`, usable only for differences.
    pub fn day_number(&self) -> Result<i64, BarstatError> {
        calendar::day_number(&self.date)
    }

    /// `date` as a validated Gregorian calendar date.
    pub fn calendar_date(&self) -> Result<NaiveDate, BarstatError> {
        NaiveDate::parse_from_str(&self.date, "%Y%m%d").map_err(|e| {
            BarstatError::MalformedInput {
                input: self.date.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// close * volume
    pub fn turnover(&self) -> f64 {
        self.close * self.volume
    }
}
