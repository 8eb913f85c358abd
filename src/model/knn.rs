use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::errors::ModelError;
use crate::model::preprocess::Preprocessor;
use crate::model::SalaryModel;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weights {
    #[default]
    Uniform,
    Distance,
}

/// Serialized form of a k-nearest-neighbours pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnParams {
    pub features: Preprocessor,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub weights: Weights,
    /// Training rows keyed by column name.
    pub samples: Vec<Map<String, Value>>,
    pub targets: Vec<f64>,
}

fn default_k() -> usize {
    5
}

#[derive(Debug)]
pub struct KnnRegressor {
    features: Preprocessor,
    k: usize,
    weights: Weights,
    points: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl KnnRegressor {
    pub fn from_params(params: KnnParams) -> Result<Self, ModelError> {
        params.features.validate()?;

        if params.samples.is_empty() {
            return Err(ModelError::Artifact("knn artifact has no samples".into()));
        }
        if params.samples.len() != params.targets.len() {
            return Err(ModelError::Artifact(format!(
                "knn artifact has {} samples but {} targets",
                params.samples.len(),
                params.targets.len()
            )));
        }
        if params.k == 0 || params.k > params.samples.len() {
            return Err(ModelError::Artifact(format!(
                "k must be between 1 and {} (the number of samples), got {}",
                params.samples.len(),
                params.k
            )));
        }
        if let Some(i) = params.targets.iter().position(|t| !t.is_finite()) {
            return Err(ModelError::Artifact(format!(
                "target {} is not a finite number",
                i + 1
            )));
        }

        let training = samples_table(&params.features, &params.samples)?;
        let points = params.features.transform(&training).map_err(|e| {
            ModelError::Artifact(format!("training samples do not match the features: {e}"))
        })?;

        Ok(Self {
            features: params.features,
            k: params.k,
            weights: params.weights,
            points,
            targets: params.targets,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn sample_count(&self) -> usize {
        self.points.len()
    }

    fn predict_point(&self, x: &[f64]) -> f64 {
        let mut neighbours: Vec<(f64, f64)> = self
            .points
            .iter()
            .zip(&self.targets)
            .map(|(p, &t)| (euclidean(p, x), t))
            .collect();
        // stable sort: ties resolve to training order
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        let nearest = &neighbours[..self.k];

        match self.weights {
            Weights::Uniform => mean(nearest.iter().map(|(_, t)| *t)),
            Weights::Distance => {
                let exact: Vec<f64> = nearest
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, t)| *t)
                    .collect();
                if !exact.is_empty() {
                    return mean(exact.into_iter());
                }
                let (num, den) = nearest
                    .iter()
                    .fold((0.0, 0.0), |(num, den), (d, t)| (num + t / d, den + 1.0 / d));
                num / den
            }
        }
    }
}

impl SalaryModel for KnnRegressor {
    fn predict(&self, table: &Table) -> Result<Vec<f64>, ModelError> {
        let encoded = self.features.transform(table)?;
        Ok(encoded.iter().map(|x| self.predict_point(x)).collect())
    }
}

/// Lay the JSON samples out as a table so they go through the same encoding
/// path as incoming requests.
fn samples_table(
    features: &Preprocessor,
    samples: &[Map<String, Value>],
) -> Result<Table, ModelError> {
    let headers: Vec<String> = features.columns().map(str::to_string).collect();
    let mut rows = Vec::with_capacity(samples.len());
    for (i, sample) in samples.iter().enumerate() {
        let mut row = Vec::with_capacity(headers.len());
        for column in &headers {
            let cell = match sample.get(column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(other) => {
                    return Err(ModelError::Artifact(format!(
                        "sample {} has unsupported value {other} for `{column}`",
                        i + 1
                    )))
                }
                None => {
                    return Err(ModelError::Artifact(format!(
                        "sample {} has no value for `{column}`",
                        i + 1
                    )))
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(Table::new(headers, rows))
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}
