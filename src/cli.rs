use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// ISO image file or mounted directory to catalog
    pub source: PathBuf,

    /// Output JSON path
    #[arg(default_value = "catalog.json", short, long)]
    pub output_file: PathBuf,

    /// Optional TOML config file (format.include-cpe, format.count-external)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Include CPE security references (overrides the config file)
    #[arg(long)]
    pub include_cpe: bool,

    /// Print external-reference diagnostics to stderr (overrides the config file)
    #[arg(long)]
    pub count_external: bool,
}
