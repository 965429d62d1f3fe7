use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::table::{Cell, DataSource, Dataset};
use crate::{DatasetError, Hash32, Result};

/// Field values read as missing (exact match, no trimming).
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DELIMITER_CANDIDATES: &[u8] = b",;\t|";
const SNIFF_LINES: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Strict,
    Permissive,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub mode: ParseMode,
    pub delimiter: char,
    pub skipped_lines: u64,
}

/// Parse, then normalize column names.
pub fn load_csv(bytes: &[u8], source: DataSource) -> Result<Dataset> {
    let mut ds = parse_csv(bytes, source)?;
    ds.normalize_columns();
    Ok(ds)
}

/// Parse CSV bytes without touching column names.
///
/// Strict comma parsing first; on any error, one permissive retry with an inferred
/// delimiter that skips malformed lines. In both modes a record shorter than the
/// header is padded with missing values; a longer one is malformed.
pub fn parse_csv(bytes: &[u8], source: DataSource) -> Result<Dataset> {
    let fingerprint: Hash32 = blake3::hash(bytes).into();
    let body = strip_bom(bytes);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DatasetError::Empty);
    }

    let strict_err = match parse_strict(body) {
        Ok((columns, rows)) => {
            debug!(rows = rows.len(), columns = columns.len(), "csv parsed (strict)");
            let report = IngestReport { mode: ParseMode::Strict, delimiter: ',', skipped_lines: 0 };
            return Ok(Dataset::from_parts(columns, rows, source, fingerprint, report));
        }
        Err(e) => e,
    };
    if matches!(strict_err, DatasetError::Empty) {
        return Err(DatasetError::Empty);
    }
    warn!(error = %strict_err, "strict csv parse failed; retrying permissively");

    match parse_permissive(body) {
        Ok((columns, rows, report)) => {
            if report.skipped_lines > 0 {
                warn!(skipped = report.skipped_lines, delimiter = ?report.delimiter, "skipped malformed lines");
            }
            Ok(Dataset::from_parts(columns, rows, source, fingerprint, report))
        }
        Err(DatasetError::Empty) => Err(DatasetError::Empty),
        Err(permissive_err) => Err(DatasetError::Unparseable {
            strict: strict_err.to_string(),
            permissive: permissive_err.to_string(),
        }),
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

fn to_cell(field: &str) -> Cell {
    if NA_VALUES.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Blank names become `Unnamed: <i>`, repeats get a `.N` suffix.
fn header_names(raw: impl Iterator<Item = String>) -> Result<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();
    for (i, name) in raw.enumerate() {
        let base = if name.trim().is_empty() { format!("Unnamed: {i}") } else { name };
        let mut candidate = base.clone();
        let mut n = 1;
        while columns.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        columns.push(candidate);
    }
    if columns.iter().all(|c| c.starts_with("Unnamed: ")) {
        return Err(DatasetError::Empty);
    }
    Ok(columns)
}

fn parse_strict(body: &[u8]) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let headers = rdr.headers()?.clone();
    let columns = header_names(headers.iter().map(str::to_string))?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(DatasetError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: columns.len(),
                actual: record.len(),
            });
        }
        rows.push(padded(record.iter().map(to_cell), columns.len()));
    }
    Ok((columns, rows))
}

/// Fill a short record up to `width` with missing values.
fn padded(cells: impl Iterator<Item = Cell>, width: usize) -> Vec<Cell> {
    let mut row: Vec<Cell> = cells.collect();
    row.resize(width, None);
    row
}

fn parse_permissive(body: &[u8]) -> Result<(Vec<String>, Vec<Vec<Cell>>, IngestReport)> {
    let delimiter = sniff_delimiter(body);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(body);

    let mut records = rdr.byte_records();
    let header = match records.next() {
        Some(rec) => rec?,
        None => return Err(DatasetError::Empty),
    };
    let columns = header_names(header.iter().map(lossy))?;

    let mut rows = Vec::new();
    let mut skipped = 0u64;
    for record in records {
        match record {
            Ok(rec) if rec.len() <= columns.len() => {
                rows.push(padded(rec.iter().map(|f| to_cell(&lossy(f))), columns.len()));
            }
            Ok(_) | Err(_) => skipped += 1,
        }
    }
    if rows.is_empty() && skipped > 0 {
        return Err(DatasetError::NoValidRows { skipped });
    }

    let report = IngestReport {
        mode: ParseMode::Permissive,
        delimiter: char::from(delimiter),
        skipped_lines: skipped,
    };
    Ok((columns, rows, report))
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Pick the candidate that splits the header into the most fields while keeping
/// the sampled lines consistent with it. Ties go to the earlier candidate.
pub fn sniff_delimiter(body: &[u8]) -> u8 {
    let mut best = b',';
    let mut best_score = (0usize, 0usize);

    for &candidate in DELIMITER_CANDIDATES {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(candidate)
            .from_reader(body);

        let sample: Vec<ByteRecord> = rdr
            .byte_records()
            .take(SNIFF_LINES)
            .filter_map(|r| r.ok())
            .collect();
        let Some(header) = sample.first() else {
            continue;
        };
        let width = header.len();
        if width < 2 {
            continue;
        }
        let consistent = sample.iter().skip(1).filter(|r| r.len() == width).count();
        let score = (consistent, width);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse_with_missing_values() {
        let csv = "Tweet,Score\nhello there,1\nNA,\n";
        let ds = parse_csv(csv.as_bytes(), DataSource::Inline).unwrap();
        assert_eq!(ds.columns(), ["Tweet", "Score"]);
        assert_eq!(ds.report().mode, ParseMode::Strict);
        assert_eq!(ds.rows()[1], vec![None, None]);
    }

    #[test]
    fn test_semicolon_falls_back_to_permissive() {
        let csv = "text;rating\ngreat, really great;5\nmeh;2\n";
        let ds = parse_csv(csv.as_bytes(), DataSource::Inline).unwrap();
        assert_eq!(ds.report().mode, ParseMode::Permissive);
        assert_eq!(ds.report().delimiter, ';');
        assert_eq!(ds.columns(), ["text", "rating"]);
        assert_eq!(ds.rows()[0][0].as_deref(), Some("great, really great"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let csv = "a,b\n1,2\n3,4,5\n6,7\n";
        let ds = parse_csv(csv.as_bytes(), DataSource::Inline).unwrap();
        assert_eq!(ds.report().mode, ParseMode::Permissive);
        assert_eq!(ds.report().skipped_lines, 1);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "Text,Stars,Source\nI really love this phone so much,5,web\nworst phone I ever owned honestly,1\n";
        let ds = parse_csv(csv.as_bytes(), DataSource::Inline).unwrap();
        assert_eq!(ds.report().mode, ParseMode::Strict);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][1].as_deref(), Some("1"));
        assert_eq!(ds.rows()[1][2], None);
    }

    #[test]
    fn test_short_rows_are_padded_permissively() {
        let csv = "a;b;c\n1;2,5;3\n4\n5;6;7;8\n";
        let ds = parse_csv(csv.as_bytes(), DataSource::Inline).unwrap();
        assert_eq!(ds.report().mode, ParseMode::Permissive);
        assert_eq!(ds.report().skipped_lines, 1);
        assert_eq!(ds.rows(), [
            vec![Some("1".to_string()), Some("2,5".to_string()), Some("3".to_string())],
            vec![Some("4".to_string()), None, None],
        ]);
    }

    #[test]
    fn test_every_row_malformed_is_unparseable() {
        let err = parse_csv(b"a,b\n1,2,3\n4,5,6\n", DataSource::Inline).unwrap_err();
        let DatasetError::Unparseable { strict, permissive } = err else {
            panic!("expected Unparseable, got {err:?}");
        };
        assert!(strict.contains("expected 2 fields, found 3"));
        assert!(permissive.contains("2 malformed"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_csv(b"", DataSource::Inline), Err(DatasetError::Empty)));
        assert!(matches!(parse_csv(b"  \n\n", DataSource::Inline), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let mut bytes = b"\xEF\xBB\xBFname,text\n".to_vec();
        bytes.extend_from_slice(b"x,caf\xE9 time\n");
        let ds = parse_csv(&bytes, DataSource::Inline).unwrap();
        assert_eq!(ds.columns()[0], "name");
        assert_eq!(ds.report().mode, ParseMode::Permissive);
        assert!(ds.rows()[0][1].as_deref().unwrap().starts_with("caf"));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let ds = parse_csv(b"a,a,\n1,2,3\n", DataSource::Inline).unwrap();
        assert_eq!(ds.columns(), ["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_load_csv_normalizes() {
        let ds = load_csv(b" tweet ,SENTIMENT\nhi,Positive\n", DataSource::Inline).unwrap();
        assert_eq!(ds.columns(), ["Tweet", "Sentiment"]);
    }

    #[test]
    fn test_fingerprint_is_over_raw_bytes() {
        let a = parse_csv(b"a,b\n1,2\n", DataSource::Inline).unwrap();
        let b = parse_csv(b"a,b\n1,2\n", DataSource::Sample { url: "x".into() }).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), <[u8; 32]>::from(blake3::hash(b"a,b\n1,2\n")));
    }

    #[test]
    fn test_sniff_prefers_consistent_delimiter() {
        assert_eq!(sniff_delimiter(b"a|b|c\n1|2|3\n"), b'|');
        assert_eq!(sniff_delimiter(b"a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter(b"single\nvalue\n"), b',');
    }
}
