//! svg2layout CLI
//!
//! Commands: convert, fonts
//! Outputs JSON to stdout
//! Returns non-zero on conversion failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use svg2layout::{ConversionPipeline, ConverterConfig, FontCatalog, ENGINE_VERSION};

#[derive(Parser)]
#[command(name = "svg2layout")]
#[command(about = "Convert SVGs to a render layout", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON converter configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more SVG files into a single layout file
    Convert {
        /// SVG file to convert; repeat for more pages
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Layout file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the font catalog
    Fonts,
}

fn failure(error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ConverterConfig::load_from_path(path) {
            Ok(c) => c,
            Err(e) => return failure(e),
        },
        None => ConverterConfig::default(),
    };

    match cli.command {
        Commands::Fonts => {
            let fonts: Vec<_> = FontCatalog::new()
                .list()
                .map(|(family, variant)| serde_json::json!({
                    "family": family,
                    "variants": variant,
                }))
                .collect();

            match serde_json::to_string_pretty(&fonts) {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => failure(e),
            }
        }

        Commands::Convert { input, output } => {
            let pipeline = ConversionPipeline::new(config);

            match pipeline.convert_files(&input, &output) {
                Ok(summary) => {
                    let output = serde_json::json!({
                        "success": true,
                        "version": ENGINE_VERSION,
                        "summary": summary,
                    });
                    match serde_json::to_string_pretty(&output) {
                        Ok(text) => {
                            println!("{}", text);
                            ExitCode::SUCCESS
                        }
                        Err(e) => failure(e),
                    }
                }
                Err(e) => {
                    log::error!("Conversion failed: {}", e);
                    failure(e)
                }
            }
        }
    }
}
