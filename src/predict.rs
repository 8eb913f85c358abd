//! The two prediction flows: one record from the form, or a whole uploaded
//! table. Both are all-or-nothing and hold no state between calls.

use crate::errors::PayscopeError;
use crate::model::{ModelError, SalaryModel};
use crate::record::EmployeeRecord;
use crate::table::{Table, PREDICTION_COLUMN};

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub record: EmployeeRecord,
    pub salary: f64,
}

impl Prediction {
    pub fn display_salary(&self) -> String {
        format_currency(self.salary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// First rows of the upload as received.
    pub uploaded_preview: Table,
    /// Full upload with the prediction column set.
    pub table: Table,
}

pub fn predict_single(
    model: &dyn SalaryModel,
    record: &EmployeeRecord,
) -> Result<Prediction, PayscopeError> {
    record.validate()?;
    let values = invoke(model, &record.to_table())?;
    let prediction = Prediction {
        record: record.clone(),
        salary: values[0],
    };
    tracing::info!(
        employee_id = prediction.record.display_id(),
        salary = prediction.salary,
        "Predicted salary"
    );
    Ok(prediction)
}

/// Parse an uploaded CSV file and predict every row in one model call.
pub fn predict_batch(
    model: &dyn SalaryModel,
    upload: &[u8],
    preview_rows: usize,
) -> Result<BatchOutcome, PayscopeError> {
    let table = Table::from_csv(upload)?;
    tracing::debug!(
        rows = table.len(),
        columns = table.headers().len(),
        "Parsed batch upload"
    );
    let uploaded_preview = table.head(preview_rows);
    let table = augment(model, table)?;
    Ok(BatchOutcome {
        uploaded_preview,
        table,
    })
}

/// Run the model over `table` and set the prediction column.
pub fn augment(model: &dyn SalaryModel, mut table: Table) -> Result<Table, PayscopeError> {
    let values = invoke(model, &table)?;
    let cells = values.iter().map(|v| format!("{v:.2}")).collect();
    table.set_column(PREDICTION_COLUMN, cells)?;
    tracing::info!(rows = table.len(), "Predicted batch salaries");
    Ok(table)
}

/// One model call, checked for a value per row and finite output.
fn invoke(model: &dyn SalaryModel, table: &Table) -> Result<Vec<f64>, PayscopeError> {
    let values = model.predict(table)?;
    if values.len() != table.len() {
        return Err(ModelError::OutputMismatch {
            expected: table.len(),
            got: values.len(),
        }
        .into());
    }
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { row: row + 1 }.into());
    }
    Ok(values)
}

/// `$75,000.00` style: two decimals, comma-grouped thousands.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}
