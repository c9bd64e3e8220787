use crate::strategy::{SeriesState, Signal, Strategy};
use chrono::NaiveDate;

//rolls the position whenever the main contract changes
#[derive(Debug, Clone, Default)]
pub struct RolloverStrategy {
    rolls: usize,
}

impl RolloverStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    //number of roll signals emitted so far
    pub fn rolls(&self) -> usize {
        self.rolls
    }
}

impl Strategy for RolloverStrategy {
    fn name(&self) -> &str {
        "rollover"
    }

    fn produce_signal(&mut self, _date: NaiveDate, state: &SeriesState) -> Signal {
        match (state.previous(), state.current()) {
            (Some(prev), Some(today)) if prev.contract() != today.contract() => {
                self.rolls += 1;
                Signal::Roll {
                    close: prev.contract().to_string(),
                    open: today.contract().to_string(),
                }
            }
            _ => Signal::Hold,
        }
    }
}
