pub mod summary;

pub use summary::{pretty_print_rollovers, SeriesSummary};
