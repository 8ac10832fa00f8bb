//! Command-line arguments.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "http-server")]
#[command(about = "Minimal HTTP/1.1 server over raw TCP sockets", long_about = None)]
pub struct Cli {
    /// Base directory for /files/ reads and writes
    #[arg(long, value_name = "PATH")]
    pub directory: Option<String>,
}
