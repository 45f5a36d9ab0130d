//! Convert command - extract data from a single purchase-order PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use facto_core::{export_xlsx, NominatimClient, OrderParser, PdfDocument};

use super::load_config;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input purchase-order PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: the input path with the matching extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Spreadsheet output
    Xlsx,
    /// JSON output
    Json,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }
    info!("processing file: {}", args.input.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Parsing {}", args.input.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let geocoder = NominatimClient::new(&config.geocoding)?;
    let parser = OrderParser::new(&config, &geocoder);
    let document = PdfDocument::load(&args.input)?;
    let result = parser.parse(&document)?;

    spinner.finish_and_clear();
    println!(
        "{} items, order {}",
        result.items.len(),
        result.order_number.as_deref().unwrap_or("unknown")
    );

    match args.format {
        OutputFormat::Xlsx => {
            let target = args
                .output
                .unwrap_or_else(|| args.input.with_extension("xlsx"));
            let written = export_xlsx(&result, &target)?;
            println!("{} {}", style("Created").green(), written.display());
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&result)?;
            match args.output {
                Some(target) => {
                    fs::write(&target, rendered)?;
                    println!("{} {}", style("Created").green(), target.display());
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}
