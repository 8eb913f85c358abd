pub mod errors;
pub mod knn;
pub mod linear;
pub mod preprocess;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub use errors::ModelError;
use knn::{KnnRegressor, KnnParams};
use linear::{LinearRegressor, LinearParams};

use crate::table::Table;

/// The pre-trained salary model. Given a table keyed by column name, returns
/// one prediction per row in row order. Extra columns are ignored; missing
/// ones are an error.
pub trait SalaryModel: Send + Sync {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError>;
}

/// Shared, read-only handle loaded once at startup.
pub type SharedModel = Arc<dyn SalaryModel>;

/// On-disk artifact, tagged by estimator kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Knn(KnnParams),
    Linear(LinearParams),
}

impl Artifact {
    pub fn into_model(self) -> Result<SharedModel, ModelError> {
        Ok(match self {
            Artifact::Knn(params) => {
                let model = KnnRegressor::from_params(params)?;
                tracing::info!(
                    kind = "knn",
                    k = model.k(),
                    samples = model.sample_count(),
                    "Built salary model"
                );
                Arc::new(model)
            }
            Artifact::Linear(params) => {
                let model = LinearRegressor::from_params(params)?;
                tracing::info!(kind = "linear", "Built salary model");
                Arc::new(model)
            }
        })
    }
}

/// Read and build the model artifact at `path`.
pub fn load(path: &Path) -> Result<SharedModel, ModelError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Load {
        path: path.display().to_string(),
        source,
    })?;
    let artifact: Artifact =
        serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    let model = artifact.into_model()?;
    tracing::info!(path = %path.display(), "Loaded model artifact");
    Ok(model)
}
