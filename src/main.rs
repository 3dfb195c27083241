use std::fs::File;
use std::io::Write;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use serde_json::to_string_pretty;

use repodata_cataloger::cli::Cli;
use repodata_cataloger::config::CatalogerConfig;
use repodata_cataloger::{catalog, CatalogResult};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CatalogerConfig::load(cli.config.as_deref()).context("loading cataloger config")?;
    if cli.include_cpe {
        config.format.include_cpe = true;
    }
    if cli.count_external {
        config.format.count_external = true;
    }

    let result: CatalogResult = catalog(&cli.source, &config).context("cataloging repodata")?;
    log::info!("cataloged {} packages, {} relationships", result.packages.len(), result.relationships.len());

    write_output(&cli.output_file, &result)?;
    println!("JSON output written to {:?}", cli.output_file);
    Ok(())
}

fn write_output(output_file: &std::path::Path, result: &CatalogResult) -> anyhow::Result<()> {
    let document = serde_json::json!({
        "packages": result.packages,
        "relationships": result.relationships,
    });
    let json_output = to_string_pretty(&document)?;
    let mut file = File::create(output_file).with_context(|| format!("creating {output_file:?}"))?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}
