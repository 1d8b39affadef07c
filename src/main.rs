use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use flate2::read::MultiGzDecoder;
use log::{info, LevelFilter};

use castmotif::{extract_motifs, read_sequence, DistanceMeasure, MotifConfig, ReportMode};

/// Approximate repeated motif extraction from a long sequence.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file holding the sequence as whitespace-separated tokens
    /// (transparently decompressed when it ends in .gz/.bgz)
    #[arg(short = 'i', long, conflicts_with = "stream", required_unless_present = "stream")]
    input: Option<PathBuf>,

    /// Read the sequence from standard input instead of a file
    #[arg(short = 's', long)]
    stream: bool,

    /// Minimum frequency (number of occurrences) of a reported motif
    #[arg(short = 'f', long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    frequency: u64,

    /// Maximum allowed distance between a motif and an approximate occurrence
    #[arg(short = 'd', long, default_value_t = 0.0, allow_negative_numbers = true)]
    distance: f64,

    /// Minimum length of a reported motif
    #[arg(long = "minl", value_name = "INT", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    min_length: u64,

    /// Maximum length of a reported motif
    #[arg(long = "maxl", value_name = "INT", default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    max_length: u64,

    /// Output mode
    #[arg(short = 'm', long, value_enum, default_value_t = Mode::Motif)]
    mode: Mode,

    /// Ordered SAX alphabet (unique symbols); selects SAX MINDIST instead of
    /// the Hamming distance
    #[arg(long = "sm", value_name = "ALPHABET")]
    sax_alphabet: Option<String>,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Silent,
    Statistics,
    Motif,
}

impl From<Mode> for ReportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Silent => ReportMode::Silent,
            Mode::Statistics => ReportMode::Statistics,
            Mode::Motif => ReportMode::Motif,
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // --help and --version exit 0, anything else is a usage error
            let code = if error.use_stderr() { 1 } else { 0 };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    let level = if args.debug {
        LevelFilter::Debug
    } else if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Err(error) = run(&args) {
        eprintln!("castmotif: {error:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if !(args.distance >= 0.0) {
        bail!("the distance threshold must be a non-negative number");
    }

    let measure = match &args.sax_alphabet {
        Some(alphabet) => {
            DistanceMeasure::sax_mindist(alphabet).context("invalid SAX alphabet")?
        }
        None => DistanceMeasure::Hamming,
    };

    let sequence = match &args.input {
        Some(path) => {
            info!("reading sequence from {}", path.display());
            let reader = open_reader(path)?;
            read_sequence(reader).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            info!("reading sequence from standard input");
            read_sequence(io::stdin().lock()).context("failed to read standard input")?
        }
    };
    info!("sequence length: {}", sequence.len());

    let config = MotifConfig {
        min_length: args.min_length as usize,
        max_length: args.max_length as usize,
        min_frequency: args.frequency as usize,
        max_distance: args.distance,
        mode: args.mode.into(),
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let histogram = extract_motifs(&sequence, &config, &measure, &mut out)?;
    out.flush()?;
    info!("emitted {} motifs", histogram.total());
    Ok(())
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz"))
        .unwrap_or(false)
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
