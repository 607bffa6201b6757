//! Tessera editor
//!
//! Opens the asset explorer; drop files on the window to import them.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tessera::{config::EditorSettings, EditorApp};

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Scene editor with a geometry loader and asset explorer", long_about = None)]
struct Cli {
    /// Project directory; overrides the one stored in the settings file
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Settings file, created on exit if missing
    #[arg(short, long, default_value = "tessera.json")]
    settings: PathBuf,

    /// Shape outline files (JSON arrays) for shape geometries, loaded first
    #[arg(long)]
    shapes: Vec<PathBuf>,

    /// Geometry descriptor files to load at startup
    #[arg(short, long)]
    geometry: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = EditorSettings::load(&cli.settings)
        .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;
    if let Some(project) = cli.project {
        settings.project_path = project;
    }
    log::info!("Project directory: {}", settings.project_path.display());

    let mut app = EditorApp::new(settings)?.with_settings_path(&cli.settings);
    for path in &cli.shapes {
        if let Err(e) = app.load_shapes(path) {
            log::error!("{:#}", e);
        }
    }
    for path in &cli.geometry {
        // A bad descriptor should not keep the editor from opening
        if let Err(e) = app.load_geometry(path) {
            log::error!("{:#}", e);
        }
    }

    app.run()
}
