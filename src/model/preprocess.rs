use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::errors::ModelError;
use crate::table::Table;

/// Column transformer stored in the artifact: numeric columns are
/// standardized, categorical columns one-hot encoded. Encoded layout is all
/// numeric features in order, then each categorical block in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    #[serde(default)]
    pub numeric: Vec<NumericFeature>,
    #[serde(default)]
    pub categorical: Vec<CategoricalFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub column: String,
    pub categories: Vec<String>,
}

impl Preprocessor {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err(ModelError::Artifact("no input features declared".into()));
        }

        let mut seen = HashSet::new();
        for column in self.columns() {
            if !seen.insert(column) {
                return Err(ModelError::Artifact(format!(
                    "column `{column}` is declared twice"
                )));
            }
        }

        for f in &self.numeric {
            if !f.mean.is_finite() || !f.scale.is_finite() || f.scale == 0.0 {
                return Err(ModelError::Artifact(format!(
                    "numeric column `{}` needs a finite mean and a finite non-zero scale",
                    f.column
                )));
            }
        }

        for f in &self.categorical {
            if f.categories.is_empty() {
                return Err(ModelError::Artifact(format!(
                    "categorical column `{}` has no categories",
                    f.column
                )));
            }
            let unique: HashSet<_> = f.categories.iter().collect();
            if unique.len() != f.categories.len() {
                return Err(ModelError::Artifact(format!(
                    "categorical column `{}` lists a category twice",
                    f.column
                )));
            }
        }
        Ok(())
    }

    /// Input columns, numeric first.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.numeric
            .iter()
            .map(|f| f.column.as_str())
            .chain(self.categorical.iter().map(|f| f.column.as_str()))
    }

    /// Length of an encoded row.
    pub fn width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|f| f.categories.len())
                .sum::<usize>()
    }

    /// Encode every row of `table`. Columns are matched by name; extra
    /// columns are ignored. Unknown categories encode to an all-zero block.
    pub fn transform(&self, table: &Table) -> Result<Vec<Vec<f64>>, ModelError> {
        let mut missing = Vec::new();
        let mut numeric_idx = Vec::with_capacity(self.numeric.len());
        for f in &self.numeric {
            match table.column_index(&f.column) {
                Some(i) => numeric_idx.push(i),
                None => missing.push(f.column.clone()),
            }
        }
        let mut categorical_idx = Vec::with_capacity(self.categorical.len());
        for f in &self.categorical {
            match table.column_index(&f.column) {
                Some(i) => categorical_idx.push(i),
                None => missing.push(f.column.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(ModelError::MissingColumns(missing));
        }

        let width = self.width();
        let mut encoded = Vec::with_capacity(table.len());
        for (row_no, row) in table.rows().iter().enumerate() {
            let mut out = Vec::with_capacity(width);

            for (f, &idx) in self.numeric.iter().zip(&numeric_idx) {
                let raw = row[idx].trim();
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ModelError::InvalidNumber {
                        column: f.column.clone(),
                        row: row_no + 1,
                        value: row[idx].clone(),
                    })?;
                out.push((value - f.mean) / f.scale);
            }

            for (f, &idx) in self.categorical.iter().zip(&categorical_idx) {
                let raw = row[idx].trim();
                out.extend(f.categories.iter().map(|c| if c == raw { 1.0 } else { 0.0 }));
            }

            encoded.push(out);
        }
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_gender() -> Preprocessor {
        Preprocessor {
            numeric: vec![NumericFeature {
                column: "Age".into(),
                mean: 40.0,
                scale: 10.0,
            }],
            categorical: vec![CategoricalFeature {
                column: "Gender".into(),
                categories: vec!["Female".into(), "Male".into()],
            }],
        }
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_transform_scales_and_one_hot_encodes() {
        let p = age_gender();
        assert_eq!(p.width(), 3);
        let t = table(
            &["Name", "Gender", "Age"],
            &[&["a", "Male", "50"], &["b", "Female", " 30 "], &["c", "Other", "40"]],
        );
        let x = p.transform(&t).unwrap();
        assert_eq!(x[0], vec![1.0, 0.0, 1.0]);
        assert_eq!(x[1], vec![-1.0, 1.0, 0.0]);
        assert_eq!(x[2], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_transform_reports_all_missing_columns() {
        let p = age_gender();
        let t = table(&["Name"], &[&["a"]]);
        match p.transform(&t).unwrap_err() {
            ModelError::MissingColumns(cols) => assert_eq!(cols, vec!["Age", "Gender"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_transform_rejects_non_numeric_cell() {
        let p = age_gender();
        let t = table(&["Age", "Gender"], &[&["30", "Male"], &["old", "Male"]]);
        let err = p.transform(&t).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not convert `old` in column `Age` (row 2) to a number"
        );

        let t = table(&["Age", "Gender"], &[&["NaN", "Male"]]);
        assert!(p.transform(&t).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(age_gender().validate().is_ok());

        let mut p = age_gender();
        p.numeric[0].scale = 0.0;
        assert!(p.validate().is_err());

        let mut p = age_gender();
        p.categorical[0].categories.push("Male".into());
        assert!(p.validate().is_err());

        let mut p = age_gender();
        p.categorical[0].column = "Age".into();
        assert!(p.validate().is_err());

        let empty = Preprocessor {
            numeric: vec![],
            categorical: vec![],
        };
        assert!(empty.validate().is_err());
    }
}
