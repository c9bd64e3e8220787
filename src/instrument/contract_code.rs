use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractCodeError {
    #[error("contract code '{0}' is shorter than the 4-character YYMM suffix")]
    TooShort(String),
    #[error("contract code '{0}' has a non-numeric YYMM suffix")]
    NonNumericSuffix(String),
    #[error("contract code '{code}' has month {month} outside 01-12")]
    InvalidMonth { code: String, month: u32 },
    #[error("contract code '{0}' has no variety prefix before the YYMM suffix")]
    MissingVariety(String),
}

//a parsed futures contract code in VVYYMM form (eg rb2110, IF2109)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCode {
    //variety prefix as written (eg rb)
    pub variety: String,

    //2-digit delivery year
    pub year: u32,

    //delivery month 1-12
    pub month: u32,
}

impl ContractCode {
    //parses the trailing 4 characters as YYMM, everything before is the variety
    pub fn parse(code: &str) -> Result<Self, ContractCodeError> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() < 4 {
            return Err(ContractCodeError::TooShort(code.to_string()));
        }

        let split = chars.len() - 4;
        let suffix = &chars[split..];
        if !suffix.iter().all(|c| c.is_ascii_digit()) {
            return Err(ContractCodeError::NonNumericSuffix(code.to_string()));
        }

        let variety: String = chars[..split].iter().collect();
        if variety.is_empty() || !variety.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ContractCodeError::MissingVariety(code.to_string()));
        }

        //suffix is ascii digits so to_digit cannot fail
        let digit = |c: char| c.to_digit(10).unwrap_or(0);
        let year = digit(suffix[0]) * 10 + digit(suffix[1]);
        let month = digit(suffix[2]) * 10 + digit(suffix[3]);

        if !(1..=12).contains(&month) {
            return Err(ContractCodeError::InvalidMonth {
                code: code.to_string(),
                month,
            });
        }

        Ok(ContractCode {
            variety,
            year,
            month,
        })
    }

    //true when date falls in this contract's delivery month
    //compares the 2-digit year the same way the code encodes it
    pub fn is_delivery_month(&self, date: NaiveDate) -> bool {
        let yy = date.year().rem_euclid(100) as u32;
        self.year == yy && self.month == date.month()
    }
}

impl fmt::Display for ContractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{:02}", self.variety, self.year, self.month)
    }
}
