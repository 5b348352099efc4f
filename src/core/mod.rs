pub mod batch;
pub mod code_validator;
pub mod range_table;
pub mod report_writer;
pub mod resolver;

pub use crate::domain::model::{LookupResult, RangeEntry};
pub use crate::domain::ports::{ConfigProvider, RemoteLookup, TransportFailurePolicy};
pub use crate::utils::error::Result;
