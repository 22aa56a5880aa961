pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ConverterConfig;

pub use adapters::diagnostics::{RecordingDiagnostics, TracingDiagnostics};
pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    transformer::{convert_upc, RowTransformer, TransformOptions},
};
pub use utils::error::{EtlError, Result, TransformError};
