use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;

use krakefaction_rs::logging::init_logger;
use krakefaction_rs::{rarefy_to_file, RarefactionConfig, DEFAULT_RATE};

/// Generates rarefaction data from Kraken data.
#[derive(Parser)]
#[command(name = "krakefaction-rs", version)]
#[command(override_usage = "krakefaction-rs -u UNTRANSLATED -t TRANSLATED -o OUTPUT")]
struct Cli {
    /// The untranslated Kraken reads (the default output of 'kraken'),
    /// filtered or unfiltered. May be gzipped.
    #[arg(short, long, value_name = "UNTRANSLATED")]
    untranslated: PathBuf,

    /// The translated Kraken reads, as written by 'kraken-translate'.
    /// May be gzipped.
    #[arg(short, long, value_name = "TRANSLATED")]
    translated: PathBuf,

    /// Where to write the rarefaction data (CSV).
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// The sampling rate in the range (0, 1]. For example, a rate of 0.1
    /// will generate 10 data points (0.1, 0.2, etc.).
    #[arg(short, long, default_value_t = DEFAULT_RATE)]
    rate: f64,

    /// Seed for the sub-sampling draws, for reproducible output.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&format!("{{spinner:.{color}}} {{msg}}"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(msg.to_string());
    spinner
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RarefactionConfig::new(cli.rate);
    config.seed = cli.seed;

    // Output is created up front, so a bad -o fails before the pass
    let progress = spinner("green", "Generating rarefaction data...");
    let results = match rarefy_to_file(&cli.untranslated, &cli.translated, &cli.output, &config) {
        Ok(results) => results,
        Err(e) => {
            progress.abandon_with_message("Rarefaction failed.");
            return Err(e.into());
        }
    };
    progress.finish_with_message(format!(
        "Rarefied {} reads ({} classified) at {} rates.",
        results.summary.reads,
        results.summary.classified,
        results.table.len()
    ));

    let done = spinner("yellow", "");
    done.finish_with_message(format!("Output written to {}.", cli.output.display()));

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}
