use crate::utils::error::{CepError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl Display, reason: impl Into<String>) -> CepError {
    CepError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The code and `/json/` are appended to the path, so a query or fragment
/// would end up in the wrong place.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            url_str,
            "URL must not carry a query or fragment",
        ));
    }
    Ok(())
}

/// Paths and labels: not blank, no NUL bytes.
pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field_name, value, "Value contains null bytes"));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + Display>(field_name: &str, value: T, min: T) -> Result<()> {
    if value < min {
        return Err(invalid(field_name, &value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

/// Reports `UnsupportedExtensionError`, so a bad range table path exits with
/// the same code whether it is caught here or at load.
pub fn validate_file_extension(path: &str, allowed_extensions: &[&str]) -> Result<()> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        _ => Err(CepError::UnsupportedExtensionError {
            path: path.to_string(),
        }),
    }
}
