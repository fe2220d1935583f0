#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `fuzzfind` - Fuzzy path matching for go-to-file pickers.

use std::cmp::Ordering;
use std::path::PathBuf;

use clap::Parser;
use clap_cargo::style::CLAP_STYLING;
use fuzzfind::error::Result;
use fuzzfind::search::{Finder, FinderOptions};
use fuzzfind::types::DEFAULT_CEILING;

/// CLI arguments for `fuzzfind`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Query, e.g. "mod/stry" to find app/models/story.rb
    query: String,

    /// Root directories to scan
    #[arg(default_value = ".")]
    dirs: Vec<PathBuf>,

    /// Maximum number of matches to collect
    #[arg(short, long, default_value_t = 10)]
    max: usize,

    /// Glob patterns for entries to skip while scanning
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Abort the scan above this many files
    #[arg(long, default_value_t = DEFAULT_CEILING)]
    ceiling: usize,
}

/// Scan the roots, run the query and print ranked matches
fn run(cli: &Cli) -> Result<()> {
    let finder = Finder::new(FinderOptions {
        directories: cli.dirs.clone(),
        full_file_names: Vec::new(),
        ceiling: cli.ceiling,
        ignores: cli.ignore.clone(),
    })?;

    let mut results = finder.find(&cli.query, cli.max)?;
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if results.is_empty() {
        println!(
            "No matches for query {:?} across {} files",
            cli.query,
            finder.tree().files().len()
        );
        return Ok(());
    }

    println!("Score | Match | Path");
    println!("------|-------|-----");
    for result in results {
        println!(
            "{:>5.1}% | {} | {}",
            f64::from(result.score) * 100.0,
            result.abbreviated_path,
            result.path
        );
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
