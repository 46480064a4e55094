use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvas::Point;
use canvas::engine::EngineCore;
use canvas::flat::{self, FlatError};
use canvas::render::ExportError;
use canvas::stroke::PathCommand;
use clap::{Parser, Subcommand};
use curvetopia::backend::{BackendError, HttpBeautifier};
use curvetopia::config::BackendConfig;
use curvetopia::session::{DoodleSession, SessionError, StrokeSession};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid doodle: {0}")]
    Doodle(#[from] FlatError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("backend: {0}")]
    Backend(#[from] BackendError),
    #[error("session: {0}")]
    Session(#[from] SessionError),
    #[error("export: {0}")]
    Export(#[from] ExportError),
}

#[derive(Parser, Debug)]
#[command(name = "curvetopia", about = "Curvetopia canvas driver; backend settings come from CURVETOPIA_* env vars")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a flat text doodle and print the beautified shapes.
    Doodle { file: PathBuf },
    /// Submit one stroke of `[x, y]` pen samples and print the resulting paths.
    Polyline { file: PathBuf },
    /// Render a flat text doodle to PNG.
    Export {
        file: PathBuf,
        #[arg(long, default_value = canvas::render::EXPORT_FILE_NAME)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Doodle { file } => run_doodle(&file).await,
        Command::Polyline { file } => run_polyline(&file).await,
        Command::Export { file, out } => run_export(&file, &out),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn load_engine(path: &Path) -> Result<EngineCore, CliError> {
    let mut engine = EngineCore::new();
    engine.apply_doodle_response(&read(path)?)?;
    Ok(engine)
}

fn backend() -> Result<Arc<HttpBeautifier>, CliError> {
    let config = BackendConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "using beautification backend");
    Ok(Arc::new(HttpBeautifier::new(&config)?))
}

async fn run_doodle(file: &Path) -> Result<(), CliError> {
    let engine = load_engine(file)?;
    let (session, handle) = DoodleSession::with_engine(engine, backend()?);
    tokio::spawn(session.run());

    handle.submit()?;
    handle.settled().await?;
    let snapshot = handle.snapshot().await?;
    println!("{}", flat::encode(&snapshot.shapes));
    Ok(())
}

async fn run_polyline(file: &Path) -> Result<(), CliError> {
    let samples: Vec<[f64; 2]> = serde_json::from_str(&read(file)?)?;
    let (session, handle) = StrokeSession::new(backend()?);
    tokio::spawn(session.run());

    let mut points = samples.iter().map(|[x, y]| Point::new(*x, *y));
    if let Some(first) = points.next() {
        handle.pointer_down(first)?;
        for pt in points {
            handle.pointer_move(pt)?;
        }
        handle.pointer_up()?;
    }
    handle.settled().await?;

    let snapshot = handle.snapshot().await?;
    let paths: Vec<&[PathCommand]> = snapshot.paths.iter().map(|p| p.commands.as_slice()).collect();
    println!("{}", serde_json::to_string(&paths)?);
    Ok(())
}

fn run_export(file: &Path, out: &Path) -> Result<(), CliError> {
    let engine = load_engine(file)?;
    let image = engine.export()?;
    std::fs::write(out, &image.png).map_err(|source| CliError::Write { path: out.to_owned(), source })?;
    tracing::info!(path = %out.display(), bytes = image.png.len(), "wrote export");
    Ok(())
}
