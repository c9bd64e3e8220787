pub mod bar;
pub mod loader;
pub mod writer;

pub use bar::{Bar, BarError, BarPrices};
pub use loader::{filter_by_date_range, filter_by_instrument, load_csv, parse_date};
pub use writer::{save_outputs, write_diagnostics, write_series};
