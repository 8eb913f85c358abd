use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("columns are missing: {}", .0.join(", "))]
    #[diagnostic(
        code(payscope::model::missing_columns),
        help("The table must carry Age, Gender, Department, Job_Title, Experience_Years, Education_Level and Location")
    )]
    MissingColumns(Vec<String>),

    #[error("could not convert `{value}` in column `{column}` (row {row}) to a number")]
    #[diagnostic(code(payscope::model::invalid_number))]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("model returned {got} predictions for {expected} rows")]
    #[diagnostic(code(payscope::model::output_mismatch))]
    OutputMismatch { expected: usize, got: usize },

    #[error("model returned a non-finite prediction for row {row}")]
    #[diagnostic(code(payscope::model::non_finite))]
    NonFinite { row: usize },

    #[error("Failed to read model artifact `{path}`")]
    #[diagnostic(
        code(payscope::model::load),
        help("Set `model.path` in the config file or PAYSCOPE__MODEL__PATH")
    )]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact `{path}`: {source}")]
    #[diagnostic(code(payscope::model::parse))]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    #[diagnostic(code(payscope::model::artifact))]
    Artifact(String),
}
