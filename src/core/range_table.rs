use crate::domain::model::RangeEntry;
use crate::utils::error::{CepError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

pub const LOCALITY_COLUMN: &str = "Localidade";
pub const START_COLUMN: &str = "CEP Inicial";
pub const END_COLUMN: &str = "CEP Final";

pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "ods"];

static FORMATTED_CEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.?\d{3}-\d{3}$").expect("valid CEP pattern"));

#[derive(Debug, Deserialize)]
struct CsvRangeRow {
    #[serde(rename = "Localidade")]
    locality: String,
    #[serde(rename = "CEP Inicial")]
    start_code: String,
    #[serde(rename = "CEP Final")]
    end_code: String,
}

/// Local CEP ranges, kept in file order. Lookups are a linear scan and the
/// first containing range wins.
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    entries: Vec<RangeEntry>,
}

impl RangeTable {
    pub fn from_entries(entries: Vec<RangeEntry>) -> Self {
        Self { entries }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(CepError::RangeTableMissingError { path: shown });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let entries = match extension.as_deref() {
            Some("csv") => Self::read_csv(path)?,
            Some("xlsx") | Some("xls") | Some("ods") => Self::read_spreadsheet(path)?,
            _ => return Err(CepError::UnsupportedExtensionError { path: shown }),
        };

        tracing::info!("Loaded {} CEP ranges from {}", entries.len(), shown);
        Ok(Self { entries })
    }

    fn read_csv(path: &Path) -> Result<Vec<RangeEntry>> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut entries = Vec::new();

        for (index, row) in reader.deserialize::<CsvRangeRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = row.map_err(|e| CepError::MalformedRangeRowError {
                row: line,
                reason: e.to_string(),
            })?;

            entries.push(RangeEntry::new(
                row.locality,
                parse_code_text(&row.start_code, line, START_COLUMN)?,
                parse_code_text(&row.end_code, line, END_COLUMN)?,
            ));
        }

        Ok(entries)
    }

    fn read_spreadsheet(path: &Path) -> Result<Vec<RangeEntry>> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CepError::MalformedRangeRowError {
                row: 0,
                reason: "workbook has no worksheets".to_string(),
            })??;

        let mut rows = range.rows();
        let header = rows.next().ok_or_else(|| CepError::MalformedRangeRowError {
            row: 1,
            reason: "worksheet is empty".to_string(),
        })?;

        let locality_col = column_index(header, LOCALITY_COLUMN)?;
        let start_col = column_index(header, START_COLUMN)?;
        let end_col = column_index(header, END_COLUMN)?;

        let mut entries = Vec::new();
        for (index, row) in rows.enumerate() {
            let line = index + 2;
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }

            let locality = row
                .get(locality_col)
                .map(|cell| cell.to_string().trim().to_string())
                .unwrap_or_default();

            entries.push(RangeEntry::new(
                locality,
                parse_code_cell(row.get(start_col), line, START_COLUMN)?,
                parse_code_cell(row.get(end_col), line, END_COLUMN)?,
            ));
        }

        Ok(entries)
    }

    /// Locality of the first range containing `code`. Codes that are not
    /// purely numeric never match.
    pub fn contains(&self, code: &str) -> Option<&str> {
        let value: u32 = code.parse().ok()?;
        self.entries
            .iter()
            .find(|entry| entry.contains(value))
            .map(|entry| entry.locality.as_str())
    }

    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn column_index(header: &[Data], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().trim() == name)
        .ok_or_else(|| CepError::MalformedRangeRowError {
            row: 1,
            reason: format!("missing column '{}'", name),
        })
}

/// Text cells hold either a formatted CEP (`01.000-000`, `01000-000`) or a
/// plain number, possibly exported as `1000000.0`.
fn parse_code_text(raw: &str, line: usize, column: &str) -> Result<u32> {
    let text = raw.trim();
    let invalid = || CepError::MalformedRangeRowError {
        row: line,
        reason: format!("'{}' in column '{}' is not a CEP", raw, column),
    };

    if FORMATTED_CEP.is_match(text) {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        return digits.parse().map_err(|_| invalid());
    }

    if let Ok(value) = text.parse::<u32>() {
        return Ok(value);
    }

    match text.parse::<f64>() {
        Ok(value) => whole_code(value).ok_or_else(invalid),
        Err(_) => Err(invalid()),
    }
}

fn whole_code(value: f64) -> Option<u32> {
    if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

fn parse_code_cell(cell: Option<&Data>, line: usize, column: &str) -> Result<u32> {
    let invalid = |value: String| CepError::MalformedRangeRowError {
        row: line,
        reason: format!("'{}' in column '{}' is not a CEP", value, column),
    };

    match cell {
        Some(Data::Int(value)) => u32::try_from(*value).map_err(|_| invalid(value.to_string())),
        Some(Data::Float(value)) => whole_code(*value).ok_or_else(|| invalid(value.to_string())),
        Some(Data::String(text)) => parse_code_text(text, line, column),
        Some(other) => Err(invalid(other.to_string())),
        None => Err(invalid(String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, Worksheet};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv_keeps_file_order() {
        let file = csv_file(
            "Localidade,CEP Inicial,CEP Final\n\
             Centro,01000000,01000999\n\
             \"Sé, São Paulo\",01001000,01001999\n",
        );

        let table = RangeTable::load(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0], RangeEntry::new("Centro", 1_000_000, 1_000_999));
        assert_eq!(table.entries()[1].locality, "Sé, São Paulo");
    }

    #[test]
    fn test_load_csv_ignores_extra_columns_and_order() {
        let file = csv_file(
            "UF,CEP Final,Localidade,CEP Inicial\n\
             SP,01000999,Centro,01000000\n",
        );

        let table = RangeTable::load(file.path()).unwrap();
        assert_eq!(table.entries()[0], RangeEntry::new("Centro", 1_000_000, 1_000_999));
    }

    #[test]
    fn test_load_csv_accepts_formatted_codes() {
        let file = csv_file("Localidade,CEP Inicial,CEP Final\nCentro,01.000-000,01.000-999\n");

        let table = RangeTable::load(file.path()).unwrap();
        assert_eq!(table.contains("01000500"), Some("Centro"));
    }

    #[test]
    fn test_load_csv_accepts_decimal_exports() {
        let file = csv_file("Localidade,CEP Inicial,CEP Final\nCentro,1000000.0,1000999.0\n");

        let table = RangeTable::load(file.path()).unwrap();
        assert_eq!(table.entries()[0], RangeEntry::new("Centro", 1_000_000, 1_000_999));
        assert_eq!(table.contains("01000500"), Some("Centro"));
    }

    #[test]
    fn test_parse_code_text_shapes() {
        assert_eq!(parse_code_text("01.000-000", 2, START_COLUMN).unwrap(), 1_000_000);
        assert_eq!(parse_code_text("01000-999", 2, END_COLUMN).unwrap(), 1_000_999);
        assert_eq!(parse_code_text(" 01000999 ", 2, END_COLUMN).unwrap(), 1_000_999);
        assert_eq!(parse_code_text("1000999.0", 2, END_COLUMN).unwrap(), 1_000_999);
        assert!(parse_code_text("1000999.5", 2, END_COLUMN).is_err());
        assert!(parse_code_text("01.000.000", 2, START_COLUMN).is_err());
        assert!(parse_code_text("-5", 2, START_COLUMN).is_err());
    }

    fn workbook(dir: &TempDir, header: &[&str], write_rows: impl FnOnce(&mut Worksheet)) -> PathBuf {
        let path = dir.path().join("Banco_ceps.xlsx");
        let mut book = Workbook::new();
        let sheet = book.add_worksheet();
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        write_rows(sheet);
        book.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_xlsx_mixed_cells() {
        let dir = TempDir::new().unwrap();
        let path = workbook(&dir, &["UF", "Localidade", "CEP Inicial", "CEP Final"], |sheet| {
            sheet.write_string(1, 0, "SP").unwrap();
            sheet.write_string(1, 1, "Centro").unwrap();
            sheet.write_number(1, 2, 1_000_000.0).unwrap();
            sheet.write_number(1, 3, 1_000_999.0).unwrap();
            // Row 3 left blank.
            sheet.write_string(3, 1, " Sé ").unwrap();
            sheet.write_string(3, 2, "01001000").unwrap();
            sheet.write_string(3, 3, "01.001-999").unwrap();
        });

        let table = RangeTable::load(&path).unwrap();

        assert_eq!(
            table.entries(),
            &[
                RangeEntry::new("Centro", 1_000_000, 1_000_999),
                RangeEntry::new("Sé", 1_001_000, 1_001_999),
            ]
        );
        assert_eq!(table.contains("01001500"), Some("Sé"));
    }

    #[test]
    fn test_load_xlsx_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = workbook(&dir, &["Localidade", "CEP Inicial"], |sheet| {
            sheet.write_string(1, 0, "Centro").unwrap();
            sheet.write_number(1, 1, 1_000_000.0).unwrap();
        });

        let err = RangeTable::load(&path).unwrap_err();
        assert!(
            matches!(err, CepError::MalformedRangeRowError { row: 1, ref reason } if reason.contains("CEP Final"))
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_csv_rejects_non_numeric_code() {
        let file = csv_file("Localidade,CEP Inicial,CEP Final\nCentro,abc,01000999\n");

        let err = RangeTable::load(file.path()).unwrap_err();
        assert!(matches!(err, CepError::MalformedRangeRowError { row: 2, .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_csv_rejects_missing_column() {
        let file = csv_file("Localidade,CEP Inicial\nCentro,01000000\n");

        let err = RangeTable::load(file.path()).unwrap_err();
        assert!(matches!(err, CepError::MalformedRangeRowError { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Banco_ceps.xlsx");

        let err = RangeTable::load(&path).unwrap_err();
        assert!(matches!(err, CepError::RangeTableMissingError { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Localidade,CEP Inicial,CEP Final\n").unwrap();

        let err = RangeTable::load(file.path()).unwrap_err();
        assert!(matches!(err, CepError::UnsupportedExtensionError { .. }));
    }

    #[test]
    fn test_contains_inclusive_bounds() {
        let table = RangeTable::from_entries(vec![RangeEntry::new("Centro", 1_000_000, 1_000_999)]);

        assert_eq!(table.contains("01000000"), Some("Centro"));
        assert_eq!(table.contains("01000999"), Some("Centro"));
        assert_eq!(table.contains("01001000"), None);
        assert_eq!(table.contains("00999999"), None);
    }

    #[test]
    fn test_contains_first_match_wins_on_overlap() {
        let table = RangeTable::from_entries(vec![
            RangeEntry::new("Primeira", 1_000_000, 1_000_999),
            RangeEntry::new("Segunda", 1_000_500, 1_001_999),
        ]);

        assert_eq!(table.contains("01000700"), Some("Primeira"));
        assert_eq!(table.contains("01001500"), Some("Segunda"));
    }

    #[test]
    fn test_contains_non_numeric_code_misses() {
        let table = RangeTable::from_entries(vec![RangeEntry::new("Centro", 0, 99_999_999)]);
        assert_eq!(table.contains("01x310100"), None);
    }

    #[test]
    fn test_parse_code_cell_variants() {
        assert_eq!(parse_code_cell(Some(&Data::Int(1_000_000)), 2, START_COLUMN).unwrap(), 1_000_000);
        assert_eq!(
            parse_code_cell(Some(&Data::Float(1_000_999.0)), 2, END_COLUMN).unwrap(),
            1_000_999
        );
        assert_eq!(
            parse_code_cell(Some(&Data::String("01000-000".to_string())), 2, START_COLUMN).unwrap(),
            1_000_000
        );
        assert!(parse_code_cell(Some(&Data::Float(1.5)), 2, START_COLUMN).is_err());
        assert!(parse_code_cell(Some(&Data::Empty), 2, START_COLUMN).is_err());
        assert!(parse_code_cell(None, 2, START_COLUMN).is_err());
    }
}
