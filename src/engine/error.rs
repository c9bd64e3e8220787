use crate::instrument::ContractCodeError;
use chrono::NaiveDate;
use thiserror::Error;

//errors that abort a construction run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no bars to build a trading calendar from")]
    EmptyInput,
    #[error("calendar date {date} has no contracts trading")]
    NoContractsForDate { date: NaiveDate },
    #[error("malformed contract code: {0}")]
    MalformedContractCode(#[from] ContractCodeError),
}
