use crate::core::range_table::RangeTable;
use crate::domain::model::LookupResult;
use crate::domain::ports::{RemoteLookup, TransportFailurePolicy};
use crate::utils::error::{CepError, Result};
use futures::stream::{self, StreamExt, TryStreamExt};

pub struct Resolver<L: RemoteLookup> {
    table: RangeTable,
    remote: L,
    policy: TransportFailurePolicy,
}

impl<L: RemoteLookup> Resolver<L> {
    pub fn new(table: RangeTable, remote: L) -> Self {
        Self {
            table,
            remote,
            policy: TransportFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransportFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Local table first, remote service on miss. Returns `Err` only for a
    /// transport failure under [`TransportFailurePolicy::Abort`].
    pub async fn resolve(&self, code: &str) -> Result<LookupResult> {
        if let Some(locality) = self.table.contains(code) {
            tracing::debug!("CEP {} found in local table: {}", code, locality);
            return Ok(LookupResult::local(locality));
        }

        tracing::debug!("CEP {} not in local table, querying remote service", code);
        let failure = match self.remote.fetch(code).await {
            Ok(record) if record.is_error() => {
                tracing::debug!("CEP {} reported as not found by remote service", code);
                return Ok(LookupResult::NotFound(code.to_string()));
            }
            Ok(record) => match record.localidade {
                Some(name) => return Ok(LookupResult::remote(name)),
                None => "response has neither 'localidade' nor 'erro'".to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::warn!("Remote lookup for CEP {} failed: {}", code, failure);
        match self.policy {
            TransportFailurePolicy::NotFound => Ok(LookupResult::NotFound(code.to_string())),
            TransportFailurePolicy::ErrorRow => Ok(LookupResult::Unavailable(code.to_string())),
            TransportFailurePolicy::Abort => Err(CepError::RemoteTransportError {
                code: code.to_string(),
                message: failure,
            }),
        }
    }

    /// Resolves `codes` with up to `concurrency` lookups in flight. Results keep
    /// input order.
    pub async fn resolve_all(
        &self,
        codes: &[String],
        concurrency: usize,
    ) -> Result<Vec<LookupResult>> {
        stream::iter(codes)
            .map(|code| self.resolve(code))
            .buffered(concurrency.max(1))
            .try_collect()
            .await
    }
}
