pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ExportConfig;

pub use adapters::{CsvDirectorySink, CsvFileSource, InputSource, NewestCsvSource};
pub use core::{
    etl::{ExportEngine, ExportSummary},
    pipeline::DraftPipeline,
    projector::{FieldDefaults, Projector},
    selector::{ListedFilter, SelectionRule, SkipReason},
};
pub use utils::error::{ExportError, Result};
