#![allow(dead_code)]

use barstat::domain::bar::Bar;
use chrono::{Duration, NaiveDate};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: NaiveDate, close: f64, volume: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        period: "D".to_string(),
        date: date.format("%Y%m%d").to_string(),
        time: "000000".to_string(),
        open: close,
        high: close,
        low: close,
        close,
        volume,
        open_interest: 0,
    }
}

/// Consecutive daily bars from `start`.
pub fn daily_bars(start: NaiveDate, closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            make_bar("TEST", start + Duration::days(i as i64), close, volume)
        })
        .collect()
}

pub const CSV_HEADER: &str =
    "<TICKER>,<PER>,<DATE>,<TIME>,<OPEN>,<HIGH>,<LOW>,<CLOSE>,<VOL>,<OPENINT>";

/// Render bars in the loader's CSV layout.
pub fn to_csv(bars: &[Bar]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            b.symbol, b.period, b.date, b.time, b.open, b.high, b.low, b.close, b.volume,
            b.open_interest
        ));
    }
    out
}
