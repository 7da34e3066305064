//! One pass of a peak source against the gene index.
//!
//! A pass streams the source's peaks once and updates only that source's
//! [`SourceColumn`]. Passes over different sources share the index
//! read-only and can run in parallel.

use log::{debug, info};
use rayon::prelude::*;

use crate::config::{Config, Window};
use crate::error::{AssocError, Result};
use crate::index::bins::bin_of_range;
use crate::index::GeneIndex;
use crate::matcher::window::{search_range, tss_distance};
use crate::parser::PeakReader;
use crate::results::{PeakMatch, ResultTable, SourceColumn};
use crate::types::Peak;

/// Counters for one peak pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Peaks read from the source.
    pub peaks: usize,
    /// Peaks skipped for scoring below the threshold.
    pub below_threshold: usize,
    /// Peaks that fell within at least one gene's window.
    pub matched: usize,
}

/// Match one peak against the index, updating `matches` (indexed by slot).
///
/// Returns `true` if the peak touched at least one gene's window.
pub fn match_peak(peak: &Peak, index: &GeneIndex, matches: &mut [PeakMatch], window: &Window) -> bool {
    let (start, end) = search_range(&peak.interval, window);
    let bins = bin_of_range(start, end);

    let mut hit = false;
    for (slot, gene) in index.candidates(&peak.interval.chrom, &bins) {
        if let Some(distance) = tss_distance(gene, &peak.interval, window) {
            matches[slot].record(distance);
            hit = true;
        }
    }
    hit
}

/// Match a batch of peaks, skipping those below `score_threshold`.
pub fn match_peaks<'a, I>(
    peaks: I,
    index: &GeneIndex,
    matches: &mut [PeakMatch],
    window: &Window,
    score_threshold: f64,
) -> MatchStats
where
    I: IntoIterator<Item = &'a Peak>,
{
    let mut stats = MatchStats::default();
    for peak in peaks {
        stats.peaks += 1;
        if peak.score < score_threshold {
            stats.below_threshold += 1;
            continue;
        }
        if match_peak(peak, index, matches, window) {
            stats.matched += 1;
        }
    }
    stats
}

/// Stream every peak of `reader` into `column`.
pub fn match_reader(
    reader: &mut PeakReader,
    index: &GeneIndex,
    column: &mut SourceColumn,
    config: &Config,
) -> Result<MatchStats> {
    let window = config.window();
    let mut stats = MatchStats::default();

    while let Some(chunk) = reader.read_chunk(config.batch_size)? {
        let chunk_stats = match_peaks(
            &chunk,
            index,
            &mut column.matches,
            &window,
            config.score_threshold,
        );
        stats.peaks += chunk_stats.peaks;
        stats.below_threshold += chunk_stats.below_threshold;
        stats.matched += chunk_stats.matched;
    }
    Ok(stats)
}

/// Open the column's source file and run its pass.
pub fn match_source(index: &GeneIndex, column: &mut SourceColumn, config: &Config) -> Result<MatchStats> {
    debug!("Processing peak file: {}", column.source.path.display());
    let mut reader = PeakReader::new(&column.source.path, config.peak_format)?;
    let stats = match_reader(&mut reader, index, column, config)?;

    info!(
        "{}: {} peaks, {} below score threshold, {} within a TSS window, {} genes bound",
        column.source.id,
        stats.peaks,
        stats.below_threshold,
        stats.matched,
        column.bound_genes()
    );
    Ok(stats)
}

/// Run the pass of every source in `table`.
///
/// With `config.threads > 1` sources run in parallel, each on its own
/// column. Any failure aborts the whole run.
pub fn match_all_sources(
    index: &GeneIndex,
    table: &mut ResultTable,
    config: &Config,
) -> Result<Vec<MatchStats>> {
    let num_threads = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let columns = table.columns_mut();

    if num_threads == 1 || columns.len() < 2 {
        return columns
            .iter_mut()
            .map(|column| match_source(index, column, config))
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.min(columns.len()))
        .build()
        .map_err(|e| AssocError::Configuration(format!("failed to create thread pool: {}", e)))?;

    pool.install(|| {
        columns
            .par_iter_mut()
            .map(|column| match_source(index, column, config))
            .collect()
    })
}
