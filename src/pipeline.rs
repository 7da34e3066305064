//! End-to-end association run.
//!
//! Phases run strictly in order: build the gene index, run every peak pass,
//! then hand the finished [`ResultTable`] to the caller. Nothing is written
//! here, so a failed run leaves no output behind.

use log::info;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{AssocError, Result};
use crate::index::GeneIndex;
use crate::matcher::{match_all_sources, MatchStats};
use crate::output::resolve_labels;
use crate::parser::parse_annotation;
use crate::results::{ResultTable, Source};

/// Everything produced by a run.
#[derive(Debug)]
pub struct Association {
    pub index: GeneIndex,
    pub table: ResultTable,
    /// Pass statistics, in source order.
    pub stats: Vec<MatchStats>,
    /// Column labels, in source order.
    pub labels: Vec<String>,
}

/// Associate every gene of `annotation` with every peak file in `peaks`.
pub fn associate(annotation: &Path, peaks: &[PathBuf], config: &Config) -> Result<Association> {
    config.validate()?;
    if peaks.is_empty() {
        return Err(AssocError::Configuration(
            "at least one peak file is required".to_string(),
        ));
    }

    let data = parse_annotation(annotation, config.annotation_format)?;
    info!(
        "Read {} {} lines from {} ({} gene records)",
        data.usable_lines,
        data.format,
        annotation.display(),
        data.genes.len()
    );

    let index = GeneIndex::build(data.genes);
    info!(
        "Indexed {} genes from {} annotation records",
        index.len(),
        index.num_records()
    );

    let sources: Vec<Source> = peaks.iter().map(|p| Source::from_path(p)).collect();
    let labels = resolve_labels(config.labels.as_deref(), &sources);
    let mut table = ResultTable::new(&index, sources);

    let stats = match_all_sources(&index, &mut table, config)?;

    Ok(Association {
        index,
        table,
        stats,
        labels,
    })
}
