//! peakassoc - Gene-to-peak promoter association library.
//!
//! This library decides, for every gene of a GTF/GFF3 annotation and every
//! peak file, whether a peak falls within a promoter-proximal window around
//! the gene's TSS, and records the signed distance to the nearest such peak.
//!
//! # Features
//!
//! - Parse GTF/GFF3 annotations and BED-like peak files (with gzip support)
//! - Hierarchical coordinate binning for candidate lookup
//! - Strand-aware, asymmetric TSS windows with nearest-peak tie-breaking
//! - Presence and distance tables, one column per peak file
//!
//! # Example
//!
//! ```ignore
//! use peakassoc::config::Config;
//! use peakassoc::output::{write_table_files, OutputPaths};
//! use peakassoc::pipeline::associate;
//! use std::path::{Path, PathBuf};
//!
//! let config = Config::default();
//! let peaks = vec![PathBuf::from("tf1_peaks.bed"), PathBuf::from("tf2_peaks.bed")];
//! let run = associate(Path::new("genes.gtf"), &peaks, &config)?;
//! write_table_files(&OutputPaths::from_prefix(Path::new("out")), &run.table, &run.labels)?;
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod results;
pub mod types;

pub use config::Config;
pub use error::{AssocError, Result};
pub use index::GeneIndex;
pub use results::{PeakMatch, ResultTable};
