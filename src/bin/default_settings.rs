// src/bin/default_settings.rs
//
// Writes the default settings as JSON, as a starting point for a run file.
//
// Run:
//   cargo run --bin default_settings -- settings.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mamca::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "default_settings", about = "Write the default settings JSON")]
struct Args {
    /// Destination file.
    #[arg(default_value = "settings.json")]
    path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match Settings::default().write_json_file(&args.path) {
        Ok(()) => {
            println!("wrote {}", args.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
