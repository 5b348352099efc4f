pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::viacep::ViaCepClient;
pub use config::Settings;
pub use crate::core::{
    batch::CepBatch, range_table::RangeTable, report_writer::ReportWriter, resolver::Resolver,
};
pub use domain::model::{BatchReport, LookupResult};
pub use utils::error::{CepError, Result};
