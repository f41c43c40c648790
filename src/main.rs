use std::fs;

use clap::Parser;
use sapp::run_source;

/// sapp runs Sapp scripts: small interpreted programs reduced token by
/// token, with audit tracing and a colored console.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the script to run; `.spp` is appended when missing.
    path: String,
}

fn main() {
    let args = Args::parse();

    let mut path = args.path;
    if !path.ends_with(".spp") {
        path.push_str(".spp");
    }

    let script = fs::read_to_string(&path).unwrap_or_else(|_| {
        eprintln!("Failed to read the script '{path}'. Perhaps this file does not exist?");
        std::process::exit(1);
    });

    if let Err(e) = run_source(&script) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
