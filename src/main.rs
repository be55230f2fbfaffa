use std::path::PathBuf;

use clap::Parser;
use sheet_combine::config::DEFAULT_OUTPUT_NAME;
use sheet_combine::{MergeConfig, MergeError, MergeReport, Result, combine_workbooks};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging() {
        eprintln!("warning: {error}");
    }

    match combine_workbooks(&cli.config()).and_then(|report| print_report(&cli, &report)) {
        Ok(()) => {}
        Err(error) if error.is_missing_file() => {
            println!("\nError: {error}");
            println!("Please ensure all required files are in the directory before running.");
            std::process::exit(1);
        }
        Err(error) => println!("An unexpected error occurred: {error}"),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| MergeError::Logging(error.to_string()))
}

fn print_report(cli: &Cli, report: &MergeReport) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Workbook combination completed successfully!");
    if !report.tgl_included {
        println!("Note: TGLs Set file was not found - skipped this sheet");
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Combine the weekly spreadsheet exports of a directory into one workbook."
)]
struct Cli {
    /// Directory holding the source workbooks.
    #[arg(long, default_value = ".")]
    directory: PathBuf,

    /// File name of the combined workbook, created inside the directory.
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// Print the merge report as JSON instead of the summary lines.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> MergeConfig {
        MergeConfig::new(&self.directory).with_output_name(&self.output_name)
    }
}
