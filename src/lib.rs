//a Rust-based continuous (main) contract builder for daily futures data

pub mod config;
pub mod data;
pub mod engine;
pub mod instrument;
pub mod metrics;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::BuildConfiguration;
    pub use crate::data::{
        filter_by_date_range, filter_by_instrument, load_csv, save_outputs, Bar, BarPrices,
    };
    pub use crate::engine::{
        build_calendar, detect_rollovers, select_main_contracts, select_main_contracts_parallel,
        BuildResult, ContinuousBuilder, ContinuousSeries, DailySelection, DisagreementEvent,
        Rollover, Selection, SelectionError, TradingCalendar,
    };
    pub use crate::instrument::{ContractCode, ContractCodeError};
    pub use crate::metrics::{pretty_print_rollovers, SeriesSummary};
    pub use crate::strategy::{
        rollover::RolloverStrategy, run_strategy, SeriesState, Signal, Strategy,
    };
}
