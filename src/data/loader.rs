use crate::data::bar::{Bar, BarPrices};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

//columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "date",
    "contract",
    "open",
    "high",
    "low",
    "close",
    "settle",
    "pre_close",
    "pre_settle",
    "volume",
    "oi",
];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    contract: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    settle: f64,
    pre_close: f64,
    pre_settle: f64,
    volume: f64,
    oi: f64,
    #[serde(default)]
    amount: Option<f64>,
}

//parses YYYYMMDD, also YYYY-MM-DD as written back by the merge step
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .with_context(|| format!("unrecognised date '{}'", raw))
}

//loads bars from a csv file
//the file is read fully and closed before returning
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    //validate schema once before touching any row
    let headers = reader
        .headers()
        .context(format!("Failed to read CSV header of {:?}", path))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("{:?} is missing required columns: {}", path, missing.join(", "));
    }

    let mut bars = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", line))?;

        let date = parse_date(&record.date).context(format!("Bad date at line {}", line))?;

        if !seen.insert((date, record.contract.clone())) {
            bail!(
                "Duplicate row for contract {} on {} at line {}",
                record.contract,
                date,
                line
            );
        }

        let prices = BarPrices {
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            settle: record.settle,
            pre_close: record.pre_close,
            pre_settle: record.pre_settle,
        };

        let bar = Bar::new(
            date,
            record.contract,
            prices,
            record.volume,
            record.oi,
            record.amount,
        )
        .context(format!("Invalid bar at line {}", line))?;

        bars.push(bar);
    }

    //date then contract, so downstream order never depends on file layout
    bars.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.contract.cmp(&b.contract)));

    info!(path = ?path, rows = bars.len(), "loaded bars");
    Ok(bars)
}

//keeps bars whose contract contains the instrument code, ignoring case
pub fn filter_by_instrument(bars: &[Bar], instrument: &str) -> Vec<Bar> {
    let needle = instrument.to_lowercase();
    let filtered: Vec<Bar> = bars
        .iter()
        .filter(|bar| bar.contract.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    debug!(instrument, kept = filtered.len(), "filtered by instrument");
    filtered
}

//keeps bars inside the inclusive [start, end] window, open ends allowed
pub fn filter_by_date_range(
    bars: Vec<Bar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Bar> {
    bars.into_iter()
        .filter(|bar| start.map_or(true, |s| bar.date >= s))
        .filter(|bar| end.map_or(true, |e| bar.date <= e))
        .collect()
}
