pub mod chart;
pub mod metrics;
pub mod reports;
pub mod snapshot;

pub use chart::{ChartKind, ChartSpec, MemorySink, Series, SeriesSink, SinkError};
pub use metrics::{derive, derive_all};
pub use reports::{ReportConfig, ReportError};
pub use snapshot::{CoinQuote, CoinSnapshot};
