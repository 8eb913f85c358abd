use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub model: Model,
    pub batch: Batch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Path to the serialized model artifact. Default: model/salary_model.json
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Rows shown in the upload and result previews
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// Largest accepted upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_preview_rows() -> usize {
    5
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model/salary_model.json"),
        }
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", Server::default().host)
            .into_diagnostic()?
            .set_default("server.port", Server::default().port)
            .into_diagnostic()?
            .set_default(
                "model.path",
                Model::default().path.to_string_lossy().to_string(),
            )
            .into_diagnostic()?
            .set_default("batch.preview_rows", default_preview_rows() as u64)
            .into_diagnostic()?
            .set_default("batch.max_upload_bytes", default_max_upload_bytes() as u64)
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: PAYSCOPE__SERVER__PORT=9090, etc.
        builder = builder.add_source(config::Environment::with_prefix("PAYSCOPE").separator("__"));

        let cfg = builder.build().into_diagnostic()?;
        let mut s: Settings = cfg.try_deserialize().into_diagnostic()?;

        if s.model.path.is_relative() {
            s.model.path = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.model.path);
        }

        if s.batch.preview_rows == 0 {
            return Err(miette::miette!("batch.preview_rows must be at least 1"));
        }

        Ok(s)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
