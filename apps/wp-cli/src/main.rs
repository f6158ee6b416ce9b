use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::error;
use wp_pvt::{
    AxisMode, ConversionConfig, ConversionReport, PropertyId, PvtError, PvtResult,
    PvtTableConverter, load_config, read_property_grid,
};

#[derive(Parser)]
#[command(name = "wp-cli")]
#[command(about = "Wellprop → PVT table converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert wellprop export folders into .tab files
    Convert {
        /// Wellprop export folders (one table per folder)
        #[arg(required = true)]
        input_dirs: Vec<PathBuf>,
        /// Secondary axis of the export: PT or PH
        #[arg(short, long)]
        mode: Option<AxisMode>,
        /// Output directory (defaults to the current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Table label (only valid with a single input folder)
        #[arg(long)]
        label: Option<String>,
        /// YAML conversion config; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Zero tolerance for coordinate steps and chain-rule divisors
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// List the wellprop files a folder provides
    Inspect {
        /// Wellprop export folder
        input_dir: PathBuf,
        /// Secondary axis of the export: PT or PH
        #[arg(short, long, default_value = "PH")]
        mode: AxisMode,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> PvtResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input_dirs,
            mode,
            output,
            label,
            config,
            tolerance,
        } => {
            let config = resolve_config(config.as_deref(), mode, label, tolerance)?;
            if config.label.is_some() && input_dirs.len() > 1 {
                return Err(PvtError::Config(
                    "--label cannot be used with several input folders".to_string(),
                ));
            }
            cmd_convert(&input_dirs, &output, &config)
        }
        Commands::Inspect {
            input_dir,
            mode,
            json,
        } => cmd_inspect(&input_dir, mode, json),
    }
}

fn resolve_config(
    path: Option<&Path>,
    mode: Option<AxisMode>,
    label: Option<String>,
    tolerance: Option<f64>,
) -> PvtResult<ConversionConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ConversionConfig::default(),
    };
    if let Some(mode) = mode {
        config.mode = mode;
    }
    if label.is_some() {
        config.label = label;
    }
    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_convert(input_dirs: &[PathBuf], output: &Path, config: &ConversionConfig) -> PvtResult<()> {
    std::fs::create_dir_all(output).map_err(|source| PvtError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    // conversions share nothing, so folders run in parallel
    let results: Vec<(&PathBuf, PvtResult<ConversionReport>)> = input_dirs
        .par_iter()
        .map(|dir| {
            let report = PvtTableConverter::new(dir, config.clone())
                .and_then(|converter| converter.generate_pvt_table_file(output));
            (dir, report)
        })
        .collect();

    let mut first_error = None;
    for (dir, result) in results {
        match result {
            Ok(report) => {
                println!(
                    "✓ {} -> {} ({} mode, {} rows)",
                    dir.display(),
                    report.path.display(),
                    report.mode,
                    report.rows
                );
                if report.singular_points > 0 {
                    println!(
                        "  {} singular points left as NaN",
                        report.singular_points
                    );
                }
                println!("  sha256: {}", report.digest);
            }
            Err(err) => {
                error!(folder = %dir.display(), "conversion failed: {err}");
                println!("✗ {}: {}", dir.display(), err);
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[derive(Serialize)]
struct FileStatus {
    property: String,
    file: String,
    present: bool,
    shape: Option<(usize, usize)>,
}

fn cmd_inspect(input_dir: &Path, mode: AxisMode, json: bool) -> PvtResult<()> {
    let mut statuses = Vec::new();
    for id in PropertyId::wellprop_files() {
        let file = id.file_name(mode);
        let path = input_dir.join(&file);
        let shape = if path.is_file() {
            Some(read_property_grid(&path)?.shape())
        } else {
            None
        };
        statuses.push(FileStatus {
            property: id.file_stem(),
            file,
            present: shape.is_some(),
            shape,
        });
    }

    if json {
        let text = serde_json::to_string_pretty(&statuses)
            .map_err(|e| PvtError::Config(format!("cannot serialize inspection: {e}")))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Wellprop files in {} ({} mode):", input_dir.display(), mode);
    for status in &statuses {
        match status.shape {
            Some((np, nx)) => println!("  ✓ {:<36} {} × {}", status.file, np, nx),
            None => println!("  - {:<36} absent", status.file),
        }
    }
    let present = statuses.iter().filter(|s| s.present).count();
    println!("{} of {} files present", present, statuses.len());
    Ok(())
}
