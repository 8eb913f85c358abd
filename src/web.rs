//! HTTP surface: the form page, the two prediction actions and a JSON
//! endpoint. Every request is independent; the only shared state is the
//! settings and the read-only model handle.
use crate::errors::PayscopeError;
use crate::model::SharedModel;
use crate::predict::{self, BatchOutcome};
use crate::record::{EmployeeForm, EmployeeRecord};
use crate::render::{self, PageParts, DOWNLOAD_FILE_NAME};
use crate::settings::Settings;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Form, Multipart, State};
use axum::http::{header, HeaderName, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use miette::IntoDiagnostic;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub model: SharedModel,
}

impl AppState {
    pub fn new(settings: Settings, model: SharedModel) -> Self {
        Self {
            settings: Arc::new(settings),
            model,
        }
    }
}

async fn security_headers(request: Request<Body>, next: Next) -> impl IntoResponse {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    // inline styles only; the download link is a data: URL
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static("default-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; form-action 'self'"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

pub fn router(state: AppState) -> Router {
    let upload_limit = state.settings.batch.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/batch", post(batch_page))
        .route("/batch/download", post(batch_download))
        .route("/api/predict", post(api_predict))
        .route("/healthz", get(health))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, model: SharedModel) -> miette::Result<()> {
    let addr: SocketAddr = settings
        .listen_addr()
        .parse()
        .map_err(|e| miette::miette!("bad listen addr: {e}"))?;
    let app = router(AppState::new(settings, model));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .into_diagnostic()?;
    tracing::info!(%addr, "Salary predictor listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn index() -> impl IntoResponse {
    let form = EmployeeForm::default();
    let mut parts = PageParts::default();
    if let Ok(record) = EmployeeRecord::try_from(&form) {
        parts.input_preview = render::input_preview(&record.to_table());
    }
    Html(render::page(&form, &parts))
}

async fn predict_form(
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> impl IntoResponse {
    let mut parts = PageParts::default();

    let result = EmployeeRecord::try_from(&form).and_then(|record| {
        parts.input_preview = render::input_preview(&record.to_table());
        predict::predict_single(state.model.as_ref(), &record)
    });

    let status = match result {
        Ok(prediction) => {
            parts.single = render::prediction_result(&prediction);
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Single prediction failed");
            parts.single = render::error_block("Prediction failed", &e);
            e.status()
        }
    };

    (status, Html(render::page(&form, &parts)))
}

async fn batch_page(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let preview_rows = state.settings.batch.preview_rows;
    let mut parts = PageParts::default();

    let status = match run_batch(&state, multipart).await {
        Ok((outcome, csv)) => {
            parts.batch = render::batch_result(&outcome, preview_rows, &csv);
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Batch prediction failed");
            parts.batch = render::error_block("Batch prediction failed", &e);
            e.status()
        }
    };

    (status, Html(render::page(&EmployeeForm::default(), &parts)))
}

async fn batch_download(State(state): State<AppState>, multipart: Multipart) -> Response {
    match run_batch(&state, multipart).await {
        Ok((_, csv)) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Batch download failed");
            let parts = PageParts {
                batch: render::error_block("Batch prediction failed", &e),
                ..PageParts::default()
            };
            (
                e.status(),
                Html(render::page(&EmployeeForm::default(), &parts)),
            )
                .into_response()
        }
    }
}

/// Read the upload, predict every row, and serialize the augmented table.
async fn run_batch(
    state: &AppState,
    multipart: Multipart,
) -> Result<(BatchOutcome, Vec<u8>), PayscopeError> {
    let upload = read_upload(multipart).await?;
    let outcome = predict::predict_batch(
        state.model.as_ref(),
        &upload,
        state.settings.batch.preview_rows,
    )?;
    let csv = outcome.table.to_csv()?;
    Ok((outcome, csv))
}

async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, PayscopeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PayscopeError::Upload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PayscopeError::Upload(e.body_text()))?;
        tracing::debug!(file = %file_name, size = bytes.len(), "Received batch upload");
        return Ok(bytes.to_vec());
    }
    Err(PayscopeError::Upload(format!(
        "no file was uploaded (expected form field `{UPLOAD_FIELD}`)"
    )))
}

#[derive(Debug, Serialize)]
struct ApiPrediction {
    employee_id: String,
    name: String,
    predicted_salary: f64,
    display: String,
}

async fn api_predict(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRecord>, JsonRejection>,
) -> Result<Json<ApiPrediction>, PayscopeError> {
    let Json(record) = payload.map_err(|e| PayscopeError::Input(e.body_text()))?;
    let prediction = predict::predict_single(state.model.as_ref(), &record)?;
    Ok(Json(ApiPrediction {
        display: prediction.display_salary(),
        predicted_salary: prediction.salary,
        employee_id: prediction.record.employee_id,
        name: prediction.record.name,
    }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
