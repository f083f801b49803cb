use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use slide_layout::constants::DEFAULT_CONFIG_PATH;
use slide_layout::export::{write_json, write_mapping_report};
use slide_layout::orientation::classify_files;
use slide_layout::{Config, GroupKind, LayoutError, LayoutPlan, ProjectDetails, build_requests};

#[derive(Parser)]
#[command(author, version, about = "Assign brochure photos to slide layouts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the layout plan and document requests for a project
    Plan {
        /// Project JSON (business fields, stored images, selected pages)
        #[arg(short = 'p', long = "project")]
        project: PathBuf,

        /// Output directory (overrides config and environment)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Print the orientation map of local image files, in the given order
    Classify { files: Vec<PathBuf> },
}

fn main() {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let result = match args.command {
        Command::Plan { project, output } => run_plan(&args.config, &project, output),
        Command::Classify { files } => run_classify(&files),
    };

    if let Err(e) = result {
        error!("Error: {e:#}");
        print_hint(&e);
        let _ = std::io::stderr().flush();
        std::process::exit(1);
    }
}

fn run_plan(config_path: &Path, project_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.apply_env()?;
    if let Some(dir) = output {
        config.output.dir = dir;
    }

    let project = ProjectDetails::load(project_path)
        .with_context(|| format!("Failed to load project {}", project_path.display()))?;
    let plan = LayoutPlan::build(&project, config.images.truncate_oversized)?;
    let sections = config.sections_for(&project)?;
    let requests = build_requests(&project, &plan, &sections);
    let stored = project.images.with_layouts(&plan);

    let dir = &config.output.dir;
    let pretty = config.output.pretty_json;
    write_json(&plan, &dir.join("plan.json"), pretty)?;
    write_json(&requests, &dir.join("requests.json"), pretty)?;
    write_json(&stored, &dir.join("images.json"), pretty)?;
    if config.output.write_report {
        let path = write_mapping_report(&plan.mapping, Some(dir))?;
        info!("Report saved to: {}", path.display());
    }

    for kind in [GroupKind::Exterior, GroupKind::Interior] {
        info!("{kind} layout pages: {:?}", plan.layout_pages(kind));
    }
    info!("Images placed: {}", plan.mapping.len());
    info!("Requests written: {}", requests.len());
    info!("Output directory: {}", dir.display());
    Ok(())
}

fn run_classify(files: &[PathBuf]) -> Result<()> {
    let map = classify_files(files);
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

/// Provide helpful hints for common errors
fn print_hint(e: &anyhow::Error) {
    use std::io::ErrorKind;
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<LayoutError>() {
            match err {
                LayoutError::UnsupportedDistribution { .. } => {
                    error!(
                        "Hint: each photo group needs 2 to 6 images, and stored layout pages must match its orientations."
                    );
                    return;
                }
                LayoutError::UnknownSection(_) => {
                    error!("Hint: check sections.default_selected in the config file.");
                    return;
                }
                _ => {}
            }
        }
        if let Some(ioe) = cause.downcast_ref::<std::io::Error>() {
            match ioe.kind() {
                ErrorKind::PermissionDenied => {
                    error!("Hint: choose a writable output directory or set SLIDE_LAYOUT_OUTPUT_DIR.");
                    return;
                }
                ErrorKind::NotFound => {
                    error!("Hint: check that the project file exists.");
                    return;
                }
                _ => {}
            }
        }
    }
}
