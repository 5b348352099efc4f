use crate::adapters::viacep::ViaCepClient;
use crate::core::code_validator::read_code_list;
use crate::core::range_table::RangeTable;
use crate::core::report_writer::ReportWriter;
use crate::core::resolver::Resolver;
use crate::domain::model::BatchReport;
use crate::domain::ports::{ConfigProvider, RemoteLookup};
use crate::utils::error::Result;
use std::time::Duration;

/// Reads the code list, resolves every code and writes the report.
pub struct CepBatch<L: RemoteLookup> {
    resolver: Resolver<L>,
    writer: ReportWriter,
    input_path: String,
    output_name: String,
    header: String,
    concurrent_requests: usize,
}

impl CepBatch<ViaCepClient> {
    /// Loads the range table and builds the HTTP client from `config`.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let table = RangeTable::load(config.range_table_path())?;
        let remote = ViaCepClient::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )?;
        let resolver =
            Resolver::new(table, remote).with_policy(config.transport_failure_policy());

        Ok(Self::new(resolver, config))
    }
}

impl<L: RemoteLookup> CepBatch<L> {
    pub fn new<C: ConfigProvider>(resolver: Resolver<L>, config: &C) -> Self {
        Self {
            resolver,
            writer: ReportWriter::new(),
            input_path: config.input_path().to_string(),
            output_name: config.output_name().to_string(),
            header: config.header().to_string(),
            concurrent_requests: config.concurrent_requests(),
        }
    }

    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("Reading CEP list from {}", self.input_path);
        let codes = read_code_list(&self.input_path)?;

        if codes.is_empty() {
            tracing::warn!("Empty code list in {}, nothing to resolve", self.input_path);
            return Ok(BatchReport::default());
        }

        tracing::info!(
            "Resolving {} codes against {} local ranges",
            codes.len(),
            self.resolver.table().len()
        );
        let results = self
            .resolver
            .resolve_all(&codes, self.concurrent_requests)
            .await?;

        let mut report = BatchReport {
            results,
            output_path: None,
        };

        let path = self
            .writer
            .write(&self.output_name, &self.header, &report.rows())?;
        report.output_path = Some(path.display().to_string());

        tracing::info!(
            "Resolved {} codes: {} local, {} remote, {} not found, {} unavailable",
            report.results.len(),
            report.local_hits(),
            report.remote_hits(),
            report.not_found(),
            report.unavailable()
        );

        Ok(report)
    }
}
