//! CSV file bar adapter.
//!
//! Expects a header naming `TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT`
//! in any order. Header cells may be wrapped in angle brackets (`<TICKER>`);
//! extra columns are ignored.

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;
use crate::ports::data_port::BarSource;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 10] = [
    "TICKER", "PER", "DATE", "TIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOL", "OPENINT",
];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BarSource for CsvAdapter {
    fn load_bars(&self) -> Result<Vec<Bar>, BarstatError> {
        let file = File::open(&self.path).map_err(|e| BarstatError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let bars = read_bars(file)?;
        debug!(path = %self.path.display(), bars = bars.len(), "loaded bars");
        Ok(bars)
    }
}

fn clean(cell: &str) -> &str {
    cell.trim_matches(|c: char| c.is_whitespace() || c == '<' || c == '>')
}

/// Parse bars from any reader, in file order.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, BarstatError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers().map_err(|e| BarstatError::Data {
        reason: format!("CSV header error: {}", e),
    })?;
    let mut index = [0usize; COLUMNS.len()];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| clean(h).eq_ignore_ascii_case(name))
            .ok_or_else(|| BarstatError::Data {
                reason: format!("missing {} column", name),
            })?;
    }
    let [ticker, per, date, time, open, high, low, close, vol, openint] = index;

    let mut bars = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = result.map_err(|e| BarstatError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let text = |col: usize, name: &str| -> Result<String, BarstatError> {
            record
                .get(col)
                .map(|cell| clean(cell).to_string())
                .ok_or_else(|| BarstatError::Data {
                    reason: format!("line {}: missing {} value", line, name),
                })
        };
        let number = |col: usize, name: &str| -> Result<f64, BarstatError> {
            text(col, name)?.parse::<f64>().map_err(|e| BarstatError::Data {
                reason: format!("line {}: invalid {} value: {}", line, name, e),
            })
        };

        let bar = Bar {
            symbol: text(ticker, "TICKER")?,
            period: text(per, "PER")?,
            date: text(date, "DATE")?,
            time: text(time, "TIME")?,
            open: number(open, "OPEN")?,
            high: number(high, "HIGH")?,
            low: number(low, "LOW")?,
            close: number(close, "CLOSE")?,
            volume: number(vol, "VOL")?,
            open_interest: text(openint, "OPENINT")?.parse::<u64>().map_err(|e| {
                BarstatError::Data {
                    reason: format!("line {}: invalid OPENINT value: {}", line, e),
                }
            })?,
        };

        bar.day_number()
            .and_then(|_| bar.calendar_date())
            .map_err(|e| BarstatError::Data {
                reason: format!("line {}: {}", line, e),
            })?;

        bars.push(bar);
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
        <TICKER>,<PER>,<DATE>,<TIME>,<OPEN>,<HIGH>,<LOW>,<CLOSE>,<VOL>,<OPENINT>\n\
        130A.JP,D,20240209,000000,2851,3005,2606,3005,2075000,0\n\
        130A.JP,D,20240213,000000,3100,3200,2950,3050,1500000,0\n\
        130A.JP,D,20240214,000000,3000,3010,2900,2950,980000,0\n";

    #[test]
    fn read_bars_parses_rows_in_order() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);

        let first = &bars[0];
        assert_eq!(first.symbol, "130A.JP");
        assert_eq!(first.period, "D");
        assert_eq!(first.date, "20240209");
        assert_eq!(first.time, "000000");
        assert_eq!(first.open, 2851.0);
        assert_eq!(first.high, 3005.0);
        assert_eq!(first.low, 2606.0);
        assert_eq!(first.close, 3005.0);
        assert_eq!(first.volume, 2_075_000.0);
        assert_eq!(first.open_interest, 0);

        assert_eq!(bars[2].date, "20240214");
        assert_eq!(bars[2].close, 2950.0);
    }

    #[test]
    fn read_bars_accepts_plain_headers_and_extra_columns() {
        let csv = "DATE,TICKER,PER,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT,NOTE\n\
            20240102,ABC,D,000000,1,2,0.5,1.5,100,0,hello\n";
        let bars = read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].symbol, "ABC");
        assert_eq!(bars[0].date, "20240102");
        assert_eq!(bars[0].close, 1.5);
    }

    #[test]
    fn read_bars_keeps_out_of_order_dates() {
        let csv = "TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT\n\
            X,D,20240105,0,1,1,1,1,1,0\n\
            X,D,20240103,0,1,1,1,1,1,0\n";
        let bars = read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].date, "20240105");
        assert_eq!(bars[1].date, "20240103");
    }

    #[test]
    fn read_bars_rejects_missing_column() {
        let csv = "TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("OPENINT"));
    }

    #[test]
    fn read_bars_rejects_bad_number() {
        let csv = "TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT\n\
            X,D,20240105,0,1,1,1,abc,1,0\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, BarstatError::Data { .. }));
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("CLOSE"));
    }

    #[test]
    fn read_bars_rejects_invalid_calendar_date() {
        let csv = "TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT\n\
            X,D,20230230,0,1,1,1,1,1,0\n";
        assert!(matches!(
            read_bars(csv.as_bytes()),
            Err(BarstatError::Data { .. })
        ));
    }

    #[test]
    fn read_bars_rejects_short_row() {
        let csv = "TICKER,PER,DATE,TIME,OPEN,HIGH,LOW,CLOSE,VOL,OPENINT\n\
            X,D,20240105,0,1,1\n";
        assert!(read_bars(csv.as_bytes()).is_err());
    }

    #[test]
    fn load_bars_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.csv");
        fs::write(&path, SAMPLE).unwrap();

        let bars = CsvAdapter::new(path).load_bars().unwrap();
        assert_eq!(bars.len(), 3);
    }

    #[test]
    fn load_bars_errors_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().join("missing.csv"));
        assert!(matches!(
            adapter.load_bars(),
            Err(BarstatError::Data { .. })
        ));
    }
}
