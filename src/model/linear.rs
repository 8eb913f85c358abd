use serde::{Deserialize, Serialize};

use crate::model::errors::ModelError;
use crate::model::preprocess::Preprocessor;
use crate::model::SalaryModel;
use crate::table::Table;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub features: Preprocessor,
    #[serde(default)]
    pub intercept: f64,
    /// One coefficient per encoded feature.
    pub coefficients: Vec<f64>,
}

#[derive(Debug)]
pub struct LinearRegressor {
    features: Preprocessor,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn from_params(params: LinearParams) -> Result<Self, ModelError> {
        params.features.validate()?;
        let width = params.features.width();
        if params.coefficients.len() != width {
            return Err(ModelError::Artifact(format!(
                "linear artifact has {} coefficients for {} encoded features",
                params.coefficients.len(),
                width
            )));
        }
        if !params.intercept.is_finite() || params.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Artifact(
                "linear coefficients must be finite".into(),
            ));
        }
        Ok(Self {
            features: params.features,
            intercept: params.intercept,
            coefficients: params.coefficients,
        })
    }
}

impl SalaryModel for LinearRegressor {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError> {
        let encoded = self.features.transform(table)?;
        Ok(encoded
            .iter()
            .map(|x| {
                self.intercept
                    + x.iter()
                        .zip(&self.coefficients)
                        .map(|(v, c)| v * c)
                        .sum::<f64>()
            })
            .collect())
    }
}
