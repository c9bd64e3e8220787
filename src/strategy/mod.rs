pub mod rollover;

use crate::engine::calendar::TradingCalendar;
use crate::engine::selector::{ContinuousSeries, DailySelection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//what a strategy wants done on a trading day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Hold,
    //close the old main contract and open the new one
    Roll { close: String, open: String },
}

//read-only view of the series up to and including the current day
#[derive(Debug, Clone, Copy)]
pub struct SeriesState<'a> {
    //1-based trading-day index of today
    pub trading_day: usize,
    history: &'a [DailySelection],
}

impl<'a> SeriesState<'a> {
    pub fn new(trading_day: usize, history: &'a [DailySelection]) -> Self {
        SeriesState {
            trading_day,
            history,
        }
    }

    //today's selection
    pub fn current(&self) -> Option<&'a DailySelection> {
        self.history.last()
    }

    //previous trading day's selection
    pub fn previous(&self) -> Option<&'a DailySelection> {
        self.history.len().checked_sub(2).map(|i| &self.history[i])
    }

    pub fn history(&self) -> &'a [DailySelection] {
        self.history
    }
}

//the one capability a strategy has to provide
pub trait Strategy {
    fn name(&self) -> &str;

    fn produce_signal(&mut self, date: NaiveDate, state: &SeriesState) -> Signal;
}

//walks the series in calendar order and collects one signal per day
pub fn run_strategy(
    series: &ContinuousSeries,
    calendar: &TradingCalendar,
    strategy: &mut dyn Strategy,
) -> Vec<(NaiveDate, Signal)> {
    series
        .iter()
        .enumerate()
        .map(|(i, selection)| {
            let date = selection.date();
            let trading_day = calendar.index_of(date).unwrap_or(i + 1);
            let state = SeriesState::new(trading_day, &series[..=i]);
            (date, strategy.produce_signal(date, &state))
        })
        .collect()
}
