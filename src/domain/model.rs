use serde::{Deserialize, Serialize};
use std::fmt;

/// One contiguous block of CEP codes mapped to a locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub locality: String,
    pub start_code: u32,
    pub end_code: u32,
}

impl RangeEntry {
    pub fn new(locality: impl Into<String>, start_code: u32, end_code: u32) -> Self {
        Self {
            locality: locality.into(),
            start_code,
            end_code,
        }
    }

    pub fn contains(&self, code: u32) -> bool {
        self.start_code <= code && code <= self.end_code
    }
}

/// Where a resolved locality came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Locality { name: String, origin: Origin },
    NotFound(String),
    /// The remote service could not be reached or answered garbage.
    Unavailable(String),
}

impl LookupResult {
    pub fn local(name: impl Into<String>) -> Self {
        LookupResult::Locality {
            name: name.into(),
            origin: Origin::Local,
        }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        LookupResult::Locality {
            name: name.into(),
            origin: Origin::Remote,
        }
    }

    pub fn locality(&self) -> Option<&str> {
        match self {
            LookupResult::Locality { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The literal report row.
    pub fn to_row(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupResult::Locality { name, .. } => write!(f, "{}", name),
            LookupResult::NotFound(code) => write!(f, "CEP {} não encontrado", code),
            LookupResult::Unavailable(code) => write!(f, "CEP {} não consultado", code),
        }
    }
}

/// Response body of the address service. `erro` may be `true`, `"true"`, `1`
/// or even `null` depending on the service version; only the key counts.
#[derive(Debug, Clone, Deserialize)]
pub struct ViaCepRecord {
    #[serde(default, rename = "erro", deserialize_with = "key_present")]
    pub has_error_marker: bool,
    pub localidade: Option<String>,
    pub cep: Option<String>,
    pub uf: Option<String>,
}

impl ViaCepRecord {
    pub fn is_error(&self) -> bool {
        self.has_error_marker
    }
}

fn key_present<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer).map(|_| true)
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<LookupResult>,
    pub output_path: Option<String>,
}

impl BatchReport {
    pub fn rows(&self) -> Vec<String> {
        self.results.iter().map(LookupResult::to_row).collect()
    }

    pub fn local_hits(&self) -> usize {
        self.count(|r| matches!(r, LookupResult::Locality { origin: Origin::Local, .. }))
    }

    pub fn remote_hits(&self) -> usize {
        self.count(|r| matches!(r, LookupResult::Locality { origin: Origin::Remote, .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|r| matches!(r, LookupResult::NotFound(_)))
    }

    pub fn unavailable(&self) -> usize {
        self.count(|r| matches!(r, LookupResult::Unavailable(_)))
    }

    fn count(&self, pred: impl Fn(&LookupResult) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r)).count()
    }
}
