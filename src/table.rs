//! Batch table: a header row plus string cells, kept verbatim from the upload.

use crate::errors::PayscopeError;

pub const PREDICTION_COLUMN: &str = "Predicted_Salary";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parse comma-delimited bytes with a header row. Short rows are padded
    /// with empty cells and left for the model to judge; rows wider than the
    /// header, invalid UTF-8 and header-less input are parse failures.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, PayscopeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PayscopeError::Upload(
                "the uploaded file has no header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(PayscopeError::RowShape(format!(
                    "expected {} fields on line {line}, saw {}",
                    headers.len(),
                    record.len()
                )));
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, PayscopeError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| PayscopeError::Other(format!("failed to flush CSV: {}", e.error())))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First `n` rows, same headers.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Set a column's values, one per row. An existing column of that name is
    /// overwritten in place; otherwise the column is appended last.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), PayscopeError> {
        if values.len() != self.rows.len() {
            return Err(PayscopeError::Other(format!(
                "column `{name}` has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}
