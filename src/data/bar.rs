use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarError {
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
    #[error("Fractional volume: {0}")]
    FractionalVolume(f64),
    #[error("Volume out of range: {0}")]
    VolumeOutOfRange(f64),
    #[error("Negative open interest: {0}")]
    NegativeOpenInterest(f64),
    #[error("Fractional open interest: {0}")]
    FractionalOpenInterest(f64),
    #[error("Open interest out of range: {0}")]
    OpenInterestOutOfRange(f64),
}

//one contract's daily trading record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub contract: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub settle: f64,
    pub pre_close: f64,
    pub pre_settle: f64,
    pub volume: u64,
    pub open_interest: u64,
    //turnover, passed through when the source file carries it
    pub amount: Option<f64>,
}

//2^64; any whole float at or above it would saturate when cast to u64
const COUNT_LIMIT: f64 = u64::MAX as f64;

//raw numeric fields of a bar as read from a file
#[derive(Debug, Clone, Copy)]
pub struct BarPrices {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub settle: f64,
    pub pre_close: f64,
    pub pre_settle: f64,
}

impl Bar {
    //creates a new Bar with validation
    //volume and open interest arrive as floats from re-saved tables and must be whole
    pub fn new(
        date: NaiveDate,
        contract: String,
        prices: BarPrices,
        volume: f64,
        open_interest: f64,
        amount: Option<f64>,
    ) -> Result<Self, BarError> {
        if prices.high < prices.low {
            return Err(BarError::InvalidHighLow {
                high: prices.high,
                low: prices.low,
            });
        }

        if volume < 0.0 {
            return Err(BarError::NegativeVolume(volume));
        }
        if volume.fract() != 0.0 {
            return Err(BarError::FractionalVolume(volume));
        }
        if volume >= COUNT_LIMIT {
            return Err(BarError::VolumeOutOfRange(volume));
        }

        if open_interest < 0.0 {
            return Err(BarError::NegativeOpenInterest(open_interest));
        }
        if open_interest.fract() != 0.0 {
            return Err(BarError::FractionalOpenInterest(open_interest));
        }
        if open_interest >= COUNT_LIMIT {
            return Err(BarError::OpenInterestOutOfRange(open_interest));
        }

        Ok(Bar {
            date,
            contract,
            open: prices.open,
            high: prices.high,
            low: prices.low,
            close: prices.close,
            settle: prices.settle,
            pre_close: prices.pre_close,
            pre_settle: prices.pre_settle,
            volume: volume as u64,
            open_interest: open_interest as u64,
            amount,
        })
    }

    //close - pre_settle
    pub fn ch1(&self) -> f64 {
        self.close - self.pre_settle
    }

    //settle - pre_settle
    pub fn ch2(&self) -> f64 {
        self.settle - self.pre_settle
    }
}
