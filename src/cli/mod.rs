// CLI module for petcare-assist
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// petcare-assist - AI pet-care assistant backend (symptoms, first aid, behavior, media, places)
#[derive(Parser, Debug)]
#[command(name = "petcare-assist", version, about, long_about = None)]
pub struct Args {
    /// Config file (defaults to ~/.petcare-assist/config.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}
