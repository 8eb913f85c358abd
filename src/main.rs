use clap::Parser;
use miette::Result;
use payscope::{model, settings, web};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "payscope",
    version,
    about = "Employee salary predictor over a pre-trained model"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // the model is loaded once and shared read-only by every request
    let model = model::load(&settings.model.path)?;

    web::serve(settings, model).await?;
    Ok(())
}
