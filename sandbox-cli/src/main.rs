use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sandbox_core::diagnostics::{format_diagnostic, format_parse_error};
use sandbox_core::{analyze_scene, parse_scene, run_scene, SceneError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

mod logging;
mod view;

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Rigid-body sandbox - run, check and view physics scenes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene to completion and print its detectors
    Run {
        /// Path to the scene file
        file: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse and analyze a scene without running it
    Check {
        /// Path to the scene file
        file: PathBuf,
    },
    /// Open an interactive viewer that reloads the scene on save
    View {
        /// Path to the scene file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Run { file, json } => run_file(&file, json),
        Commands::Check { file } => check_file(&file),
        Commands::View { file } => view::run(file),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn run_file(file: &Path, json: bool) -> Result<()> {
    let source = read_source(file)?;
    info!(file = %file.display(), "running scene");

    let result = match run_scene(&source) {
        Ok(result) => result,
        Err(SceneError::Parse(e)) => bail!(format_parse_error(&e, &source)),
        Err(SceneError::Analysis(diagnostics)) => {
            for d in diagnostics.iter() {
                eprintln!("{}", format_diagnostic(d, &source));
            }
            bail!("scene has errors");
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for detector in result.detectors {
            println!("{} = {}", detector.name, detector.value);
        }
    }

    Ok(())
}

fn check_file(file: &Path) -> Result<()> {
    let source = read_source(file)?;
    let scene = parse_scene(&source).map_err(|e| anyhow::anyhow!(format_parse_error(&e, &source)))?;

    let diagnostics = analyze_scene(&scene);
    for d in diagnostics.iter() {
        println!("{}", format_diagnostic(d, &source));
    }

    if diagnostics.has_errors() {
        bail!("{} error(s)", diagnostics.errors().count());
    }
    println!(
        "ok: {} bodies, {} detectors, {} warning(s)",
        scene.bodies.len(),
        scene.detectors.len(),
        diagnostics.warnings().count()
    );
    Ok(())
}
