//! CLI entry point for peakassoc.
//!
//! Builds presence and distance tables associating annotated genes with
//! one or more peak files.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

use peakassoc::config::{Config, PeakFormat};
use peakassoc::error::AssocError;
use peakassoc::output::{write_table_files, OutputPaths};
use peakassoc::parser::AnnotationFormat;
use peakassoc::pipeline::associate;

const USAGE: &str = "Usage: peakassoc --gene genes.gtf --peak peakFile [peakFile2 ...] \
[--out out] [--up 2000] [--down 300] [--score 0.0] [--label TF1,TF2,...] [--macs2]";

const AFTER_HELP: &str = "Genes are looked up in the bins around each peak widened by \
max(up, down) + 1 bp, so a gene whose TSS window reaches a peak is reported even when \
gene and peak fall in neighbouring bins. Tools that only search the peak's own bins \
can miss such genes.\n\n\
Every exon line (GTF) or gene/exon line (GFF3) of a gene id is matched and reports \
to the same row. Genes whose strand is neither '+' nor '-' keep a row but never match.";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Gtf,
    Gff3,
}

impl From<FormatArg> for AnnotationFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Gtf => AnnotationFormat::Gtf,
            FormatArg::Gff3 => AnnotationFormat::Gff3,
        }
    }
}

/// Gene-to-peak promoter association tool.
///
/// Writes <out>_peak.txt (presence) and <out>_dist.txt (distance) tables.
#[derive(Parser, Debug)]
#[command(name = "peakassoc")]
#[command(author, version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Args {
    /// Gene annotation in GTF or GFF3 format (required)
    #[arg(short = 'g', long = "gene")]
    gene: PathBuf,

    /// Peak files, one output column each (required)
    #[arg(short = 'p', long = "peak", num_args = 1.., required = true)]
    peaks: Vec<PathBuf>,

    /// Output prefix
    #[arg(short = 'o', long = "out", default_value = "out")]
    out: PathBuf,

    /// Distance upstream from the TSS in bp
    #[arg(short = 'u', long = "up", default_value = "2000", allow_negative_numbers = true)]
    up: i64,

    /// Distance downstream from the TSS in bp
    #[arg(short = 'i', long = "down", alias = "in", default_value = "300", allow_negative_numbers = true)]
    down: i64,

    /// Minimum peak score
    #[arg(short = 's', long = "score", default_value = "0.0", allow_negative_numbers = true)]
    score: f64,

    /// Column labels for the peak files, comma-separated
    #[arg(short = 'l', long = "label", default_value = "")]
    label: String,

    /// Peak files are in the MACS2 layout (score in column 4)
    #[arg(long = "macs2")]
    macs2: bool,

    /// Annotation format, detected from the file extension if omitted
    #[arg(long = "format", value_enum)]
    format: Option<FormatArg>,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "1")]
    threads: usize,

    /// Batch size for streaming peak records
    #[arg(long = "batch-size", default_value = "5000")]
    batch_size: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let start = Instant::now();

    // Validate inputs
    if !args.gene.exists() {
        bail!("Gene file not found: {}", args.gene.display());
    }
    for peak in &args.peaks {
        if !peak.exists() {
            bail!("Peak file not found: {}", peak.display());
        }
    }

    // Build configuration
    let mut config = Config::new();
    config.up_distance = args.up;
    config.down_distance = args.down;
    config.score_threshold = args.score;
    config.peak_format = if args.macs2 {
        PeakFormat::Macs2
    } else {
        PeakFormat::Bed5
    };
    config.parse_labels(&args.label);
    config.annotation_format = args.format.map(AnnotationFormat::from);
    config.threads = args.threads;
    config.batch_size = args.batch_size;

    if let Err(e) = config.validate() {
        bail!("{}\n{}", e, USAGE);
    }

    info!("Upstream from TSS (bp): {}", config.up_distance);
    info!("Downstream from TSS (bp): {}", config.down_distance);
    info!("Peak score threshold: {}", config.score_threshold);

    let run = match associate(&args.gene, &args.peaks, &config) {
        Ok(run) => run,
        Err(e @ AssocError::Configuration(_)) => bail!("{}\n{}", e, USAGE),
        Err(e) => return Err(e).context("Association failed; no output written"),
    };

    let paths = OutputPaths::from_prefix(&args.out);
    info!(
        "Writing output to: {} and {}",
        paths.presence.display(),
        paths.distance.display()
    );
    write_table_files(&paths, &run.table, &run.labels)?;

    info!(
        "Done: {} genes x {} peak files in {:.2}s",
        run.table.num_genes(),
        run.labels.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
