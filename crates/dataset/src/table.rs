use serde::{Deserialize, Serialize};

use crate::{DatasetError, Hash32, IngestReport, Result};

/// One field. `None` is a missing value.
pub type Cell = Option<String>;

/// String form of a missing value, used wherever a cell is coerced to text.
pub const MISSING_PLACEHOLDER: &str = "nan";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Upload { file_name: String },
    Sample { url: String },
    Inline,
}

/// In-memory table: ordered rows sharing one column set.
#[derive(Clone, Debug)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    source: DataSource,
    fingerprint: Hash32,
    report: IngestReport,
}

impl Dataset {
    /// Build from already-split rows. Every row must have one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(DatasetError::LengthMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        let fingerprint = content_hash(&columns, &rows);
        Ok(Self {
            columns,
            rows,
            source: DataSource::Inline,
            fingerprint,
            report: IngestReport::default(),
        })
    }

    pub(crate) fn from_parts(
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
        source: DataSource,
        fingerprint: Hash32,
        report: IngestReport,
    ) -> Self {
        Self { columns, rows, source, fingerprint, report }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn fingerprint(&self) -> Hash32 {
        self.fingerprint
    }

    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Exact name lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Case-insensitive name lookup, first match wins.
    pub fn find_column_ci(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.columns.iter().position(|c| c.to_lowercase() == wanted)
    }

    /// Cells of one column in row order. Panics if `idx` is out of range.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        assert!(idx < self.columns.len(), "column index {idx} out of range");
        self.rows.iter().map(move |row| row[idx].as_deref())
    }

    /// Cells of one column coerced to text (missing → placeholder).
    pub fn column_text(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.column_cells(idx).map(display_cell)
    }

    /// Replace the column called `name`, or append it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(DatasetError::LengthMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Rename columns by exact name. Pairs naming an absent column are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for col in self.columns.iter_mut() {
            if let Some((_, to)) = renames.iter().find(|(from, _)| *from == col.as_str()) {
                *col = (*to).to_string();
            }
        }
    }

    /// Project onto `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Dataset> {
        let indices = names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| DatasetError::MissingColumn(n.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Dataset {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
            source: self.source.clone(),
            fingerprint: self.fingerprint,
            report: self.report.clone(),
        })
    }

    /// Trim and capitalize every column name.
    pub fn normalize_columns(&mut self) {
        for col in self.columns.iter_mut() {
            *col = normalize_column_name(col);
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<Cell>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

pub fn display_cell(cell: Option<&str>) -> &str {
    cell.unwrap_or(MISSING_PLACEHOLDER)
}

/// Strip surrounding whitespace; first character upper case, the rest lower case.
pub fn normalize_column_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn content_hash(columns: &[String], rows: &[Vec<Cell>]) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(columns.join("\x1f").as_bytes());
    hasher.update(b"\n");
    for row in rows {
        for cell in row {
            match cell {
                Some(v) => {
                    hasher.update(b"s");
                    hasher.update(v.as_bytes());
                }
                None => {
                    hasher.update(b"n");
                }
            }
            hasher.update(b"\x1f");
        }
        hasher.update(b"\n");
    }
    hasher.finalize().into()
}
