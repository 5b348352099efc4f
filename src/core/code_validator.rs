use crate::utils::error::{CepError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// The first separator slot is a bare `.`: any single character is accepted there.
static CEP_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^\d{2}.\d{3}-\d{3}$").expect("valid CEP pattern"),
        Regex::new(r"^\d{8}$").expect("valid CEP pattern"),
    ]
});

pub fn is_valid(raw: &str) -> bool {
    CEP_PATTERNS.iter().any(|pattern| pattern.is_match(raw))
}

/// Strips `.` and `-`. Only meaningful for input that passed [`is_valid`].
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != '.' && *c != '-').collect()
}

/// Reads one candidate code per line, dropping lines of any other shape.
pub fn read_code_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CepError::InputFileMissingError {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read(path)?;
    let mut codes = Vec::new();
    let mut skipped = 0usize;

    for raw_line in content.split(|b| *b == b'\n') {
        // Lines that are not UTF-8 cannot hold a CEP either.
        let Ok(line) = std::str::from_utf8(raw_line) else {
            skipped += 1;
            continue;
        };
        let line = line.trim();
        if is_valid(line) {
            codes.push(normalize(line));
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        "Read {} codes from {} ({} lines skipped)",
        codes.len(),
        path.display(),
        skipped
    );
    Ok(codes)
}
