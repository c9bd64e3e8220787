use crate::engine::calendar::TradingCalendar;
use crate::engine::selector::ContinuousSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a switch of the main contract between consecutive trading days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollover {
    pub date: NaiveDate,
    //1-based trading-day index of date
    pub trading_day: usize,
    pub from: String,
    pub to: String,
}

pub fn detect_rollovers(series: &ContinuousSeries, calendar: &TradingCalendar) -> Vec<Rollover> {
    series
        .windows(2)
        .filter(|pair| pair[0].contract() != pair[1].contract())
        .map(|pair| {
            let date = pair[1].date();
            Rollover {
                date,
                trading_day: calendar.index_of(date).unwrap_or_default(),
                from: pair[0].contract().to_string(),
                to: pair[1].contract().to_string(),
            }
        })
        .collect()
}
