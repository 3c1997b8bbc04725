//! Print or write the JSON Schema of the suggestion configuration

use clap::Parser;
use slash_menu::SuggestionConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate_schema")]
#[command(about = "Generate the JSON Schema for the slash menu configuration", long_about = None)]
struct Args {
    /// Write the schema to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also print the default configuration
    #[arg(long)]
    defaults: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let schema = SuggestionConfig::json_schema()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &schema)?;
            tracing::info!("Wrote config schema to {}", path.display());
        }
        None => println!("{schema}"),
    }

    if args.defaults {
        println!("{}", SuggestionConfig::default().to_json_pretty()?);
    }
    Ok(())
}
