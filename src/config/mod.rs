#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::viacep::DEFAULT_BASE_URL;
use crate::core::range_table::SUPPORTED_EXTENSIONS;
use crate::core::{ConfigProvider, TransportFailurePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_at_least, validate_base_url, validate_file_extension, validate_non_empty, Validate,
};
use toml_config::TomlConfig;

pub const DEFAULT_RANGE_TABLE: &str = "data/Banco_ceps.xlsx";
pub const DEFAULT_INPUT: &str = "data/ceps.csv";
pub const DEFAULT_OUTPUT: &str = "output_cities";
pub const DEFAULT_HEADER: &str = "Localidade";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 1;

/// Effective run settings: command line over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub range_table: String,
    pub input: String,
    pub output: String,
    pub header: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub concurrent_requests: usize,
    pub on_transport_failure: TransportFailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            range_table: DEFAULT_RANGE_TABLE.to_string(),
            input: DEFAULT_INPUT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            header: DEFAULT_HEADER.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            on_transport_failure: TransportFailurePolicy::default(),
        }
    }
}

impl Settings {
    pub fn merge_toml(mut self, file: &TomlConfig) -> Self {
        if let Some(v) = file.local.range_table.clone() {
            self.range_table = v;
        }
        if let Some(v) = file.input.path.clone() {
            self.input = v;
        }
        if let Some(v) = file.output.name.clone() {
            self.output = v;
        }
        if let Some(v) = file.output.header.clone() {
            self.header = v;
        }
        if let Some(v) = file.remote.base_url.clone() {
            self.base_url = v;
        }
        if let Some(v) = file.remote.timeout_seconds {
            self.timeout_seconds = v;
        }
        if let Some(v) = file.remote.concurrent_requests {
            self.concurrent_requests = v;
        }
        if let Some(v) = file.remote.on_transport_failure {
            self.on_transport_failure = v;
        }
        self
    }
}

impl ConfigProvider for Settings {
    fn range_table_path(&self) -> &str {
        &self.range_table
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_name(&self) -> &str {
        &self.output
    }

    fn header(&self) -> &str {
        &self.header
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn transport_failure_policy(&self) -> TransportFailurePolicy {
        self.on_transport_failure
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty("range_table", &self.range_table)?;
        validate_file_extension(&self.range_table, SUPPORTED_EXTENSIONS)?;
        validate_non_empty("input", &self.input)?;
        validate_non_empty("output", &self.output)?;
        validate_non_empty("header", &self.header)?;
        validate_base_url("base_url", &self.base_url)?;
        validate_at_least("timeout_seconds", self.timeout_seconds, 1)?;
        validate_at_least("concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CepError;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.range_table_path(), "data/Banco_ceps.xlsx");
        assert_eq!(settings.input_path(), "data/ceps.csv");
        assert_eq!(settings.output_name(), "output_cities");
        assert_eq!(settings.header(), "Localidade");
        assert_eq!(settings.base_url(), "http://www.viacep.com.br/ws");
        assert_eq!(
            settings.transport_failure_policy(),
            TransportFailurePolicy::NotFound
        );
    }

    #[test]
    fn test_merge_toml_overrides_only_present_fields() {
        let file = TomlConfig::from_toml_str(
            r#"
[local]
range_table = "ranges.csv"

[remote]
concurrent_requests = 8
on_transport_failure = "error-row"
"#,
        )
        .unwrap();

        let settings = Settings::default().merge_toml(&file);

        assert_eq!(settings.range_table, "ranges.csv");
        assert_eq!(settings.concurrent_requests, 8);
        assert_eq!(settings.on_transport_failure, TransportFailurePolicy::ErrorRow);
        assert_eq!(settings.input, DEFAULT_INPUT);
        assert_eq!(settings.header, DEFAULT_HEADER);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_ext = Settings {
            range_table: "ranges.txt".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            bad_ext.validate(),
            Err(CepError::UnsupportedExtensionError { .. })
        ));

        let bad_url = Settings {
            base_url: "viacep".to_string(),
            ..Settings::default()
        };
        assert!(bad_url.validate().is_err());

        let no_workers = Settings {
            concurrent_requests: 0,
            ..Settings::default()
        };
        assert!(no_workers.validate().is_err());

        let blank_header = Settings {
            header: " ".to_string(),
            ..Settings::default()
        };
        assert!(blank_header.validate().is_err());
    }
}
