use thiserror::Error;

#[derive(Error, Debug)]
pub enum CepError {
    #[error("Local range table '{path}' does not exist")]
    RangeTableMissingError { path: String },

    #[error("Unsupported range table extension: '{path}' (expected .csv, .xlsx, .xls or .ods)")]
    UnsupportedExtensionError { path: String },

    #[error("Malformed range table row {row}: {reason}")]
    MalformedRangeRowError { row: usize, reason: String },

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Code list file '{path}' does not exist")]
    InputFileMissingError { path: String },

    #[error("Remote lookup for CEP {code} failed: {message}")]
    RemoteTransportError { code: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration file error: {message}")]
    ConfigFileError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CepError {
    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            CepError::RangeTableMissingError { .. }
            | CepError::UnsupportedExtensionError { .. }
            | CepError::MalformedRangeRowError { .. }
            | CepError::SpreadsheetError(_) => 2,
            CepError::InputFileMissingError { .. } => 3,
            CepError::RemoteTransportError { .. } => 4,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CepError::RangeTableMissingError { path } => {
                format!("Local CEP database '{}' was not found", path)
            }
            CepError::UnsupportedExtensionError { path } => {
                format!("Cannot read local CEP database '{}'", path)
            }
            CepError::MalformedRangeRowError { row, .. } => {
                format!("Local CEP database has an invalid row ({})", row)
            }
            CepError::InputFileMissingError { path } => format!("File {} does not exist", path),
            CepError::RemoteTransportError { code, .. } => {
                format!("Remote lookup for CEP {} failed, batch aborted", code)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CepError::RangeTableMissingError { .. } => "Check the --range-table path",
            CepError::UnsupportedExtensionError { .. } => "Use a .csv, .xlsx, .xls or .ods range table",
            CepError::MalformedRangeRowError { .. } | CepError::SpreadsheetError(_) => {
                "The range table needs 'Localidade', 'CEP Inicial' and 'CEP Final' columns with integer codes"
            }
            CepError::InputFileMissingError { .. } => "Check the --input path",
            CepError::RemoteTransportError { .. } | CepError::ApiError(_) => {
                "Check network connectivity and --base-url, or use --on-transport-failure not-found"
            }
            CepError::InvalidConfigValueError { .. } | CepError::ConfigFileError { .. } => {
                "Review the command line flags and the configuration file"
            }
            _ => "Re-run with --verbose for more details",
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;
