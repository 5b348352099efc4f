use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::core::TransportFailurePolicy;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;

/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cep-lookup")]
#[command(about = "Resolve Brazilian postal codes (CEP) to localities and write a CSV report")]
pub struct CliConfig {
    /// Local range table (.csv, .xlsx, .xls or .ods) [default: data/Banco_ceps.xlsx]
    #[arg(long)]
    pub range_table: Option<String>,

    /// Code list, one CEP per line [default: data/ceps.csv]
    #[arg(long)]
    pub input: Option<String>,

    /// Output file name without the .csv extension [default: output_cities]
    #[arg(long)]
    pub output: Option<String>,

    /// Header of the single output column [default: Localidade]
    #[arg(long)]
    pub header: Option<String>,

    /// Address service base URL [default: http://www.viacep.com.br/ws]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout [default: 10]
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Remote lookups in flight at once [default: 1]
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Handling of unreachable service or malformed responses [default: not-found]
    #[arg(long, value_enum)]
    pub on_transport_failure: Option<TransportFailurePolicy>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn into_settings(self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::info!("Loading configuration from: {}", path);
            settings = settings.merge_toml(&TomlConfig::from_file(path)?);
        }

        if let Some(v) = self.range_table {
            settings.range_table = v;
        }
        if let Some(v) = self.input {
            settings.input = v;
        }
        if let Some(v) = self.output {
            settings.output = v;
        }
        if let Some(v) = self.header {
            settings.header = v;
        }
        if let Some(v) = self.base_url {
            settings.base_url = v;
        }
        if let Some(v) = self.timeout_seconds {
            settings.timeout_seconds = v;
        }
        if let Some(v) = self.concurrent_requests {
            settings.concurrent_requests = v;
        }
        if let Some(v) = self.on_transport_failure {
            settings.on_transport_failure = v;
        }

        Ok(settings)
    }
}
