use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use diagramkit::{init_logging, DesignFile, EditorConfig, EventRouter, GestureScript};

#[derive(Parser)]
#[command(
    name = "diagramkit",
    version,
    about = "Headless driver for the DiagramKit interaction engine"
)]
struct Cli {
    /// Editor configuration (TOML or JSON). Defaults apply when absent.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a gesture script and write the resulting design.
    Replay {
        /// JSON gesture script.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Design file to write (default: <SCRIPT> with a .design.json suffix).
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<EditorConfig> {
    let path = match path {
        Some(path) => path,
        None => match EditorConfig::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("No config directory ({}), using defaults", e);
                return Ok(EditorConfig::default());
            }
        },
    };
    let config = EditorConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::info!(
        "diagramkit {} (built {})",
        diagramkit::VERSION,
        diagramkit::BUILD_DATE
    );

    let config = load_config(cli.config)?;
    match cli.command {
        Command::Replay { script, output } => {
            let gestures = GestureScript::load(&script)?;
            let mut router = EventRouter::new(config);
            let report = gestures.run(&mut router);
            tracing::info!(
                "Replayed {} steps: {} commits, {} rejected",
                report.steps,
                report.commits,
                report.rejected
            );

            let output = output.unwrap_or_else(|| script.with_extension("design.json"));
            let name = gestures
                .name
                .clone()
                .unwrap_or_else(|| "Replayed design".to_string());
            DesignFile::from_document(name, router.store(), router.viewport())
                .save_to_file(&output)?;
        }
    }
    Ok(())
}
