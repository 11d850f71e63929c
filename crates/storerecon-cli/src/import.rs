//! Reads POS export files into [`ImportRow`]s.
//!
//! CSV-like files (`.csv`, `.tsv`, `.txt`) have their delimiter sniffed and
//! their first record used as the header. `.json` files hold an array of
//! objects. Column order is preserved in both cases.

use std::path::Path;

use anyhow::{bail, Context};
use storerecon_core::{CellValue, ImportRow};

/// Data-source name for a file: its stem, e.g. `"datafono_marzo"`.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Read every row of an export file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or cannot be parsed.
pub(crate) fn read_rows(path: &Path) -> anyhow::Result<Vec<ImportRow>> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let content = read_file_as_utf8(path)?;

    let rows = match extension.as_str() {
        "csv" | "tsv" | "txt" => {
            let delimiter = if extension == "tsv" {
                b'\t'
            } else {
                sniff_delimiter(&content)
            };
            rows_from_delimited(&content, delimiter)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        "json" => rows_from_json(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        other => bail!(
            "unsupported file type '{other}' for {} (expected csv, tsv, txt or json)",
            path.display()
        ),
    };

    tracing::debug!(path = %path.display(), rows = rows.len(), "read export file");
    Ok(rows)
}

/// Read a file as UTF-8, falling back to Windows-1252 for spreadsheet
/// exports that are not valid UTF-8. A leading byte-order mark is dropped.
fn read_file_as_utf8(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(path = %path.display(), "file is not UTF-8; decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Pick the delimiter under which the export reads as a table.
///
/// The header record must split into at least two columns, not all blank.
/// Candidates are ranked by how many sampled data records have the header's
/// width, then by that width; ties go to the earlier candidate. Semicolon
/// comes first since spreadsheets with a decimal comma export with it.
/// Comma is the fallback when no candidate yields a header.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

    let mut best = b',';
    let mut best_score = (0usize, 0usize);
    for delim in CANDIDATES {
        let Some(score) = table_shape(content, delim) else {
            continue;
        };
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// `(records matching the header width, header width)` for `delim`, or
/// `None` when the header does not split into named columns.
fn table_shape(content: &str, delim: u8) -> Option<(usize, usize)> {
    const SAMPLE_RECORDS: usize = 20;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().ok()?;
    let width = headers.len();
    if width < 2 || headers.iter().all(|h| h.trim().is_empty()) {
        return None;
    }

    let matching = reader
        .records()
        .take(SAMPLE_RECORDS)
        .filter_map(Result::ok)
        .filter(|record| record.len() == width)
        .count();
    Some((matching, width))
}

fn rows_from_delimited(content: &str, delimiter: u8) -> anyhow::Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read data row {}", idx + 1))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let row: ImportRow = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                let column = headers
                    .get(col)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", col + 1));
                (column, CellValue::from_field(field))
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn rows_from_json(content: &str) -> anyhow::Result<Vec<ImportRow>> {
    serde_json::from_str::<Vec<ImportRow>>(content)
        .context("expected a JSON array of objects mapping column names to values")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn sniffs_semicolon_exports() {
        let content = "Fecha;Comercio;Terminal\n2024-03-01;NARANKA SAS;12345\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniff_prefers_delimiter_consistent_with_header() {
        // The comma in the first column name splits the header but none of
        // the data rows.
        let content = "Tienda, sede;Monto\nCentro;10\nNorte;20\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniff_keeps_decimal_commas_inside_semicolon_fields() {
        let content = "Comercio;Monto\nNARANKA SAS;55000,50\nArmenia 14;1,5\n";
        assert_eq!(sniff_delimiter(content), b';');
        let rows = rows_from_delimited(content, b';').unwrap();
        assert_eq!(
            rows[1].get("Monto"),
            Some(&CellValue::Text("1,5".to_string()))
        );
    }

    #[test]
    fn sniff_ties_go_to_semicolon() {
        assert_eq!(sniff_delimiter("a;b,c\n"), b';');
    }

    #[test]
    fn sniffs_tab_and_defaults_to_comma() {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter("single column\nvalue\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn reads_csv_rows_in_column_order() {
        let file = write_temp(
            ".csv",
            b"Comercio,Terminal,Monto\nNARANKA SAS,12345,55000\nArmenia 14,,1.5\n",
        );
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);

        let columns: Vec<&str> = rows[0].iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["Comercio", "Terminal", "Monto"]);
        assert_eq!(rows[0].get("Terminal"), Some(&CellValue::Number(12345.0)));
        assert_eq!(rows[1].get("Terminal"), Some(&CellValue::Empty));
        assert_eq!(rows[1].get("Monto"), Some(&CellValue::Number(1.5)));
    }

    #[test]
    fn skips_blank_records_and_names_missing_headers() {
        let file = write_temp(".csv", b"Comercio,\nCentro,x\n,\nNorte,y,extra\n");
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("column_2"),
            Some(&CellValue::Text("x".to_string()))
        );
        assert_eq!(
            rows[1].get("column_3"),
            Some(&CellValue::Text("extra".to_string()))
        );
    }

    #[test]
    fn decodes_windows_1252_and_strips_bom() {
        // "Pereña" in Windows-1252: ñ = 0xF1.
        let latin = write_temp(".csv", b"Tienda;Monto\nPere\xf1a;10\n");
        let rows = read_rows(latin.path()).unwrap();
        assert_eq!(
            rows[0].get("Tienda"),
            Some(&CellValue::Text("Pereña".to_string()))
        );

        let bom = write_temp(".csv", b"\xef\xbb\xbfTienda,Monto\nCentro,10\n");
        let rows = read_rows(bom.path()).unwrap();
        assert!(rows[0].get("Tienda").is_some());
    }

    #[test]
    fn reads_json_rows() {
        let file = write_temp(
            ".json",
            br#"[{"store_name": "armenia-14", "total": 23900}, {"store_name": null}]"#,
        );
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("total"), Some(&CellValue::Number(23900.0)));
        assert_eq!(rows[1].get("store_name"), Some(&CellValue::Empty));
    }

    #[test]
    fn rejects_json_that_is_not_an_array_of_objects() {
        let file = write_temp(".json", br#"{"store_name": "x"}"#);
        assert!(read_rows(file.path()).is_err());
    }

    #[test]
    fn rejects_unsupported_extension() {
        let file = write_temp(".xlsx", b"PK");
        let err = read_rows(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported file type 'xlsx'"));
    }

    #[test]
    fn source_name_is_file_stem() {
        assert_eq!(source_name(Path::new("/tmp/datafono_marzo.csv")), "datafono_marzo");
    }
}
