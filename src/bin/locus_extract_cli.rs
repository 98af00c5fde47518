use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use locus_extract::genbank::load_genome;
use locus_extract::requests::read_requests;
use locus_extract::{resolve, write_fasta, ResolveOptions, TieBreak};

/// Extract the nucleotide sequences of locus tags / protein ids from a GenBank file.
///
/// Output is FASTA with headers of the form
/// `>locus_tag | protein_id | gi_number | product`.
/// Minus-strand features are written in forward orientation (not reverse-complemented).
#[derive(Parser)]
#[command(name = "locus-extract", author, version, about)]
struct Cli {
    /// List of identifiers to extract, one per line (.gz accepted)
    #[arg(short, long)]
    list: PathBuf,

    /// GenBank file containing the identifiers (.gz accepted)
    #[arg(short, long)]
    genbank: PathBuf,

    /// Write FASTA here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Match requests in parallel
    #[arg(long)]
    parallel: bool,

    /// How to break ties between equally annotated features
    #[arg(long, value_enum, default_value_t = TieBreakArg::FirstSeen)]
    tie_break: TieBreakArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    FirstSeen,
    TypePriority,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::FirstSeen => TieBreak::FirstSeen,
            TieBreakArg::TypePriority => TieBreak::TypePriority,
        }
    }
}

fn spinner(color: &str, msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    spinner.set_message(msg);
    spinner
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = ResolveOptions {
        tie_break: cli.tie_break.into(),
        parallel: cli.parallel,
    };

    // 1. Load the genome and the request list
    let progress = spinner("blue", "Loading GenBank file...");
    let genome = load_genome(&cli.genbank)?;
    let requests = read_requests(&cli.list)?;
    progress.finish_with_message(format!(
        "Loaded {} features and {} requests.",
        genome.features.len(),
        requests.len()
    ));

    // 2. Resolve requests to loci
    let progress = spinner("green", "Matching requests...");
    let resolution = resolve(&genome, &requests, &options);
    let stats = resolution.stats();
    progress.finish_with_message(format!(
        "Matched {} requests to {} loci ({} unmatched).",
        stats.matched, stats.loci, stats.unmatched
    ));

    // 3. Write FASTA
    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let written = write_fasta(resolution.into_records(), &mut writer)?;
    log::info!("Wrote {} records", written);

    Ok(())
}
