use crate::engine::calendar::TradingCalendar;
use crate::engine::rollover::Rollover;
use crate::engine::selector::Selection;
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeSet;

//summary of one continuous-series build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub instrument: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub trading_days: usize,
    pub distinct_contracts: usize,
    pub num_rollovers: usize,
    pub disagreement_days: usize,
    pub delivery_month_exclusions: usize,
    pub mean_volume: f64,
    pub std_volume: f64,
    pub mean_open_interest: f64,
    pub std_open_interest: f64,
}

impl SeriesSummary {
    pub fn from_selection(
        instrument: &str,
        calendar: &TradingCalendar,
        selection: &Selection,
        rollovers: &[Rollover],
    ) -> Self {
        let series = &selection.series;

        let distinct_contracts = series
            .iter()
            .map(|s| s.contract())
            .collect::<BTreeSet<_>>()
            .len();

        let delivery_month_exclusions = series
            .iter()
            .filter(|s| s.delivery_month_excluded)
            .count();

        let volumes: Vec<f64> = series.iter().map(|s| s.bar.volume as f64).collect();
        let open_interest: Vec<f64> = series.iter().map(|s| s.bar.open_interest as f64).collect();
        let (mean_volume, std_volume) = mean_and_std(&volumes);
        let (mean_open_interest, std_open_interest) = mean_and_std(&open_interest);

        SeriesSummary {
            instrument: instrument.to_string(),
            first_date: calendar.first(),
            last_date: calendar.last(),
            trading_days: calendar.len(),
            distinct_contracts,
            num_rollovers: rollovers.len(),
            disagreement_days: selection.diagnostics.len(),
            delivery_month_exclusions,
            mean_volume,
            std_volume,
            mean_open_interest,
            std_open_interest,
        }
    }

    //prints the summary in a formatted table
    pub fn pretty_print_table(&self) {
        let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());

        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Instrument"),
            Cell::new(&self.instrument),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Date Range"),
            Cell::new(&format!(
                "{} to {}",
                fmt_date(self.first_date),
                fmt_date(self.last_date)
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Trading Days"),
            Cell::new(&format!("{}", self.trading_days)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Main Contracts Used"),
            Cell::new(&format!("{}", self.distinct_contracts)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Rollovers"),
            Cell::new(&format!("{}", self.num_rollovers)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("OI/Volume Disagreements"),
            Cell::new(&format!(
                "{} ({:.2}%)",
                self.disagreement_days,
                self.disagreement_ratio() * 100.0
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Delivery-Month Exclusions"),
            Cell::new(&format!("{}", self.delivery_month_exclusions)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Volume (mean / std)"),
            Cell::new(&format!("{:.0} / {:.0}", self.mean_volume, self.std_volume)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Open Interest (mean / std)"),
            Cell::new(&format!(
                "{:.0} / {:.0}",
                self.mean_open_interest, self.std_open_interest
            )),
        ]));

        table.printstd();
    }

    //share of trading days where the leaders disagreed
    pub fn disagreement_ratio(&self) -> f64 {
        if self.trading_days == 0 {
            return 0.0;
        }
        self.disagreement_days as f64 / self.trading_days as f64
    }
}

//prints rollovers in a formatted table
pub fn pretty_print_rollovers(rollovers: &[Rollover]) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Day"),
        Cell::new("Date"),
        Cell::new("From"),
        Cell::new("To"),
    ]));

    for rollover in rollovers {
        table.add_row(Row::new(vec![
            Cell::new(&format!("{}", rollover.trading_day)),
            Cell::new(&rollover.date.to_string()),
            Cell::new(&rollover.from),
            Cell::new(&rollover.to),
        ]));
    }

    table.printstd();
}

//sample mean and standard deviation, zero where undefined
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mean = values.mean();
    let std_dev = if values.len() < 2 { 0.0 } else { values.std_dev() };

    (mean, std_dev)
}
