pub mod builder;
pub mod calendar;
pub mod error;
pub mod rollover;
pub mod selector;

pub use builder::{BuildResult, ContinuousBuilder};
pub use calendar::{build_calendar, TradingCalendar};
pub use error::SelectionError;
pub use rollover::{detect_rollovers, Rollover};
pub use selector::{
    select_main_contracts, select_main_contracts_parallel, ContinuousSeries,
    DailySelection, DisagreementEvent, Selection,
};
