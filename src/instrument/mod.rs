pub mod contract_code;

pub use contract_code::{ContractCode, ContractCodeError};
