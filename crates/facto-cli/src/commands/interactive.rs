//! Interactive command - prompt loop converting one PDF after another.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use facto_core::{export_xlsx, FactoConfig, NominatimClient, OrderParser, PdfDocument};

use super::load_config;

/// Arguments for the interactive command.
#[derive(Args)]
pub struct InteractiveArgs {}

pub fn run(_args: InteractiveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let geocoder = NominatimClient::new(&config.geocoding)?;

    println!("=== {} ===", style("PDF to spreadsheet converter").bold());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\nPath to a purchase-order PDF ('q' to quit): ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let path = Path::new(input);
        if !path.exists() {
            eprintln!(
                "{} file '{}' does not exist",
                style("Error:").red(),
                input
            );
            continue;
        }

        println!("Processing {input}...");
        match convert_one(&config, &geocoder, path) {
            Ok(written) => println!("{} {}", style("Created").green(), written.display()),
            Err(err) => eprintln!("{} {err:#}", style("Error:").red()),
        }
    }

    Ok(())
}

fn convert_one(
    config: &FactoConfig,
    geocoder: &NominatimClient,
    path: &Path,
) -> anyhow::Result<PathBuf> {
    let parser = OrderParser::new(config, geocoder);
    let document = PdfDocument::load(path)?;
    let result = parser.parse(&document)?;
    Ok(export_xlsx(&result, &path.with_extension("xlsx"))?)
}
