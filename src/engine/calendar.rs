use crate::data::Bar;
use crate::engine::error::SelectionError;
use chrono::NaiveDate;
use indexmap::IndexMap;

//ordered trading dates of one instrument, each with a 1-based trading-day index
//immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingCalendar {
    days: IndexMap<NaiveDate, usize>,
}

impl TradingCalendar {
    //builds a calendar from an explicit list of dates
    //duplicates collapse and order is ascending regardless of input order
    pub fn from_dates<I>(dates: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
        if sorted.is_empty() {
            return Err(SelectionError::EmptyInput);
        }
        sorted.sort_unstable();
        sorted.dedup();

        let days = sorted
            .into_iter()
            .enumerate()
            .map(|(i, date)| (date, i + 1))
            .collect();

        Ok(TradingCalendar { days })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    //dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    //(index, date) pairs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        self.days.iter().map(|(date, index)| (*index, *date))
    }

    //1-based trading-day index of a date
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.get(&date).copied()
    }

    //date at a 1-based trading-day index
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index == 0 {
            return None;
        }
        self.days.get_index(index - 1).map(|(date, _)| *date)
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().map(|(date, _)| *date)
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().map(|(date, _)| *date)
    }

    //number of trading days from a to b, negative when b is before a
    //none if either date is not a trading day
    pub fn trading_days_between(&self, a: NaiveDate, b: NaiveDate) -> Option<i64> {
        let from = self.index_of(a)? as i64;
        let to = self.index_of(b)? as i64;
        Some(to - from)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }
}

//derives the trading calendar from bars already narrowed to one instrument
pub fn build_calendar(bars: &[Bar]) -> Result<TradingCalendar, SelectionError> {
    TradingCalendar::from_dates(bars.iter().map(|bar| bar.date))
}
