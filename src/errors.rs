use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error, Diagnostic)]
pub enum PayscopeError {
    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(payscope::input),
        help("Age must be 18-70, experience 0-50, and choices must come from the form's lists")
    )]
    Input(String),

    #[error("Could not parse CSV: {0}")]
    #[diagnostic(
        code(payscope::csv),
        help("Upload a comma-delimited file with a header row")
    )]
    Csv(#[from] csv::Error),

    #[error("Could not parse CSV: {0}")]
    #[diagnostic(
        code(payscope::csv::row_shape),
        help("Every row may have at most as many fields as the header row")
    )]
    RowShape(String),

    #[error("Upload error: {0}")]
    #[diagnostic(code(payscope::upload))]
    Upload(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    #[diagnostic(code(payscope::other))]
    Other(String),
}

impl PayscopeError {
    pub fn status(&self) -> StatusCode {
        match self {
            PayscopeError::Input(_)
            | PayscopeError::Csv(_)
            | PayscopeError::RowShape(_)
            | PayscopeError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            PayscopeError::Model(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PayscopeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
