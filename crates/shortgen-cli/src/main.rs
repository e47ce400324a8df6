//! Generator binary.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shortgen_cli::{pipeline, AppConfig, Cli, Command};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("shortgen=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(false))
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let result = match &cli.command {
        Command::Generate(args) => pipeline::generate(args, &config).await.map(|output| {
            info!(output = %output.display(), "Done");
        }),
        Command::Blur {
            input,
            output,
            strength,
        } => pipeline::blur(input, output, *strength).await,
        Command::CropBox { input, output } => pipeline::crop_box(input, output).await,
        Command::BlurBox {
            input,
            output,
            blur,
            width,
            height,
            fps,
        } => pipeline::blur_box(input, output, *blur, *width, *height, *fps, &config).await,
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
