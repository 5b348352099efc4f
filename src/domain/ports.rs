use crate::domain::model::ViaCepRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
#[cfg(feature = "cli")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Remote address lookup, one request per normalized code.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn fetch(&self, code: &str) -> Result<ViaCepRecord>;
}

/// What to do when the remote service cannot be reached or answers with an
/// unexpected body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TransportFailurePolicy {
    #[default]
    NotFound,
    ErrorRow,
    Abort,
}

pub trait ConfigProvider: Send + Sync {
    fn range_table_path(&self) -> &str;
    fn input_path(&self) -> &str;
    fn output_name(&self) -> &str;
    fn header(&self) -> &str;
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn concurrent_requests(&self) -> usize;
    fn transport_failure_policy(&self) -> TransportFailurePolicy;
}
