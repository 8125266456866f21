// src/table/mod.rs — In-memory tabular data
//
// The common currency between the sandbox (which parses candidate parser
// output), the comparator (which diffs it against ground truth), and the
// prompt layer (which describes the expected shape to the model).

use std::path::Path;

use anyhow::Context;

/// A rectangular table of string cells with a header row.
///
/// Cells are kept as raw strings; typing is inferred on demand for the
/// schema summary and applied leniently during comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Inferred type of a column, for the model-facing schema summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Date,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        }
    }
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parse CSV text into a table.
    ///
    /// Rejects empty input and ragged rows; candidate parser output that
    /// trips either is malformed, not merely wrong.
    pub fn from_csv_str(text: &str) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("failed to read header row")?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            anyhow::bail!("no header row found");
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("malformed CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read and parse a CSV file.
    pub fn from_csv_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_csv_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Render the table back to CSV text, header row first.
    ///
    /// Output parses back to an equal table; cells with commas, quotes,
    /// or newlines come out quoted.
    pub fn to_csv_string(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.headers)
            .context("failed to write header row")?;
        for row in &self.rows {
            writer.write_record(row).context("failed to write row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {e}"))?;
        String::from_utf8(bytes).context("rendered CSV was not UTF-8")
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// Inferred kind of each column, in header order.
    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        (0..self.headers.len())
            .map(|col| {
                let values: Vec<&str> = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(col).map(String::as_str))
                    .filter(|v| !v.trim().is_empty())
                    .collect();
                infer_column_kind(&values)
            })
            .collect()
    }

    /// Human/model-readable description of the table's shape.
    ///
    /// One line per column with name, inferred type, and non-null count.
    /// This is what the planner sees as the target schema.
    pub fn schema_summary(&self) -> String {
        let kinds = self.column_kinds();
        let name_width = self
            .headers
            .iter()
            .map(|h| h.len())
            .max()
            .unwrap_or(0);

        let mut out = format!(
            "{} columns, {} rows\n",
            self.headers.len(),
            self.rows.len()
        );
        for (i, header) in self.headers.iter().enumerate() {
            let non_null = self
                .rows
                .iter()
                .filter(|r| r.get(i).map(|v| !v.trim().is_empty()).unwrap_or(false))
                .count();
            out.push_str(&format!(
                "  {:<name_width$}  {:<7}  {} non-null\n",
                header,
                kinds[i].as_str(),
                non_null,
            ));
        }
        out
    }
}

/// Infer a column kind from its non-empty values.
///
/// Most specific wins: integer before float before date, text as the
/// fallback. Empty columns are text.
fn infer_column_kind(values: &[&str]) -> ColumnKind {
    if values.is_empty() {
        return ColumnKind::Text;
    }
    if values.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
        return ColumnKind::Integer;
    }
    if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        return ColumnKind::Float;
    }
    if values.iter().all(|v| looks_like_date(v.trim())) {
        return ColumnKind::Date;
    }
    ColumnKind::Text
}

/// Recognize the date layouts bank exports actually use:
/// `YYYY-MM-DD`, `DD/MM/YYYY`, and `DD-MM-YYYY`.
fn looks_like_date(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 10 {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);
    // YYYY-MM-DD
    if b[4] == b'-' && b[7] == b'-' {
        return digits(0..4) && digits(5..7) && digits(8..10);
    }
    // DD/MM/YYYY or DD-MM-YYYY
    if (b[2] == b'/' && b[5] == b'/') || (b[2] == b'-' && b[5] == b'-') {
        return digits(0..2) && digits(3..5) && digits(6..10);
    }
    false
}
