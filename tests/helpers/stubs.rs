use payscope::model::{ModelError, SalaryModel};
use payscope::table::Table;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns the same value for every row.
pub struct FixedModel(pub f64);

impl SalaryModel for FixedModel {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError> {
        Ok(vec![self.0; table.len()])
    }
}

/// Always fails the way a model does when the schema drifts.
pub struct FailingModel;

impl SalaryModel for FailingModel {
    fn predict(&self, _table: &Table) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::MissingColumns(vec!["Location".to_string()]))
    }
}

/// Age * 1000 per row, so row order shows up in the output.
pub struct AgeTimesThousand;

impl SalaryModel for AgeTimesThousand {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError> {
        let idx = table
            .column_index("Age")
            .ok_or_else(|| ModelError::MissingColumns(vec!["Age".to_string()]))?;
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row[idx]
                    .parse::<f64>()
                    .map(|age| age * 1000.0)
                    .map_err(|_| ModelError::InvalidNumber {
                        column: "Age".to_string(),
                        row: i + 1,
                        value: row[idx].clone(),
                    })
            })
            .collect()
    }
}

/// Counts calls and rows seen.
#[derive(Default)]
pub struct CountingModel {
    calls: AtomicUsize,
    rows: AtomicUsize,
}

impl CountingModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> usize {
        self.rows.load(Ordering::SeqCst)
    }
}

impl SalaryModel for CountingModel {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.fetch_add(table.len(), Ordering::SeqCst);
        Ok(vec![50000.0; table.len()])
    }
}
