//! Configuration and defaults for peakassoc.
//!
//! This module contains the configuration structure and default values
//! that control the gene-to-peak association pass.

use std::fmt;

use crate::error::{AssocError, Result};
use crate::parser::annotation::AnnotationFormat;

/// Default distance upstream of the TSS, in bp.
pub const UP_DISTANCE_DEFAULT: i64 = 2000;
/// Default distance downstream of the TSS, in bp.
pub const DOWN_DISTANCE_DEFAULT: i64 = 300;
/// Default minimum peak score.
pub const SCORE_THRESHOLD_DEFAULT: f64 = 0.0;
/// Largest accepted window distance: one coarsest-level bin (512 Mb).
pub const MAX_DISTANCE: i64 = 1 << 29;

/// Column layout of peak files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakFormat {
    /// At least 5 columns, score in column 5.
    #[default]
    Bed5,
    /// MACS2 reduced layout: at least 4 columns, score in column 4.
    Macs2,
}

impl PeakFormat {
    pub fn min_columns(&self) -> usize {
        match self {
            PeakFormat::Bed5 => 5,
            PeakFormat::Macs2 => 4,
        }
    }

    /// 0-based index of the score column.
    pub fn score_column(&self) -> usize {
        match self {
            PeakFormat::Bed5 => 4,
            PeakFormat::Macs2 => 3,
        }
    }
}

/// Promoter-proximal window around a TSS, in bp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub up: i64,
    pub down: i64,
}

impl Window {
    pub fn new(up: i64, down: i64) -> Self {
        Window { up, down }
    }

    /// Furthest distance from a gene at which a peak can still hit its window.
    pub fn reach(&self) -> i64 {
        self.up.max(self.down).saturating_add(1)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}/+{} bp", self.up, self.down)
    }
}

/// Configuration for one association run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Distance upstream from the TSS in bp.
    pub up_distance: i64,
    /// Distance downstream from the TSS in bp.
    pub down_distance: i64,
    /// Peaks scoring below this are ignored.
    pub score_threshold: f64,
    /// Column layout of the peak files.
    pub peak_format: PeakFormat,
    /// Column labels, matched by position to the peak sources.
    pub labels: Option<Vec<String>>,
    /// Annotation format override; detected from the extension when unset.
    pub annotation_format: Option<AnnotationFormat>,
    /// Worker threads for peak passes (1 = sequential).
    pub threads: usize,
    /// Number of peak records read per chunk.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            up_distance: UP_DISTANCE_DEFAULT,
            down_distance: DOWN_DISTANCE_DEFAULT,
            score_threshold: SCORE_THRESHOLD_DEFAULT,
            peak_format: PeakFormat::Bed5,
            labels: None,
            annotation_format: None,
            threads: 1,
            batch_size: 5000,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Window {
        Window::new(self.up_distance, self.down_distance)
    }

    /// Parse labels from a comma-separated string. An empty string clears them.
    pub fn parse_labels(&mut self, labels_str: &str) {
        if labels_str.is_empty() {
            self.labels = None;
        } else {
            self.labels = Some(labels_str.split(',').map(str::to_string).collect());
        }
    }

    /// Check that every parameter is in its valid range.
    pub fn validate(&self) -> Result<()> {
        check_distance("upstream", self.up_distance)?;
        check_distance("downstream", self.down_distance)?;
        if !self.score_threshold.is_finite() || self.score_threshold < 0.0 {
            return Err(AssocError::Configuration(format!(
                "score threshold must be a non-negative value, got {}",
                self.score_threshold
            )));
        }
        if self.batch_size == 0 {
            return Err(AssocError::Configuration(
                "batch size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_distance(name: &str, value: i64) -> Result<()> {
    if value <= 0 || value > MAX_DISTANCE {
        return Err(AssocError::Configuration(format!(
            "{} distance must be an integer between 1 and {}, got {}",
            name, MAX_DISTANCE, value
        )));
    }
    Ok(())
}
