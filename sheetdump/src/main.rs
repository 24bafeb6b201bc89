use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sheetdump_core::{DumpConfig, read_workbook};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "dump_workbook")]
#[command(about = "Print the contents of a spreadsheet workbook", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the workbook file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // clap would exit with status 2 on a missing argument; the tool
    // contract is usage message + status 1.
    let Some(file) = cli.file else {
        eprintln!("Usage: dump_workbook <FILE>");
        std::process::exit(1);
    };

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        DumpConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetdump.toml");
        if default_config_path.exists() {
            DumpConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            DumpConfig::default()
        }
    };

    let workbook = read_workbook(&file)
        .with_context(|| format!("Failed to read workbook: {}", file.display()))?;

    match cli.format {
        OutputFormat::Human => {
            print!("{}", formatter::render_human(&workbook, &config));
        }
        OutputFormat::Json => {
            println!("{}", formatter::render_json(&workbook, &config)?);
        }
    }

    Ok(())
}
