//! metacollect CLI — converts a TEMCA session metafile into a point-match
//! collection the montage solver can consume.

mod discover;

use std::path::PathBuf;

use clap::Parser;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "metacollect")]
#[command(about = "Convert a raw TEMCA metafile into a point-match collection (JSON)")]
#[command(version)]
struct Cli {
    /// Session directory containing the _meta* file.
    directory: PathBuf,

    /// Path of the collection JSON to write.
    #[arg(short, long, default_value = "collection.json")]
    output_file: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> CliResult<()> {
    let (meta_path, montage_path) = discover::find_meta_and_montage(&cli.directory)?;
    tracing::info!("Metafile: {}", meta_path.display());
    if let Some(montage) = &montage_path {
        tracing::debug!("Montage file: {}", montage.display());
    }

    let section = metacollect_core::load_metafile(&meta_path)?;
    tracing::info!(
        "Session {}: {} tiles",
        section.metadata.session_id,
        section.tiles.len()
    );

    let collection = metacollect_core::build_collection(&section)?;
    tracing::info!(
        "Extracted {} correspondences",
        collection.correspondences.len()
    );

    // The richer payload (calibration, tilespecs) is computed but the solver
    // consumes only the plain correspondence list; that is what gets written.
    let json = serde_json::to_string_pretty(&collection.correspondences)?;
    std::fs::write(&cli.output_file, &json)?;
    tracing::info!("Collection written to {}", cli.output_file.display());

    Ok(())
}
