//! GTF/GFF3 annotation parser with gzip support.
//!
//! Each qualifying annotation line yields one [`Gene`]. Which lines qualify
//! and where the gene identifier lives depends on the format:
//!
//! | format | features        | identifier            |
//! |--------|-----------------|-----------------------|
//! | GTF    | `exon`          | `gene_id "X";`        |
//! | GFF3   | `gene`, `exon`  | `Name=X;`             |
//!
//! Malformed lines abort parsing with a line-numbered error.

use log::{debug, warn};
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::error::{AssocError, Result};
use crate::parser::util::{is_gzipped, open_reader, parse_coordinate, trim_line};
use crate::types::{Gene, GenomicInterval, Strand};

/// Annotation file flavour, selected once per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationFormat {
    Gtf,
    Gff3,
}

impl AnnotationFormat {
    /// Detect the format from the file extension (`.gtf`, `.gff`, `.gff3`,
    /// optionally followed by `.gz`), case-insensitive.
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy().to_ascii_lowercase();
        let name = if is_gzipped(path) {
            name.trim_end_matches(".gz")
        } else {
            name.as_str()
        };

        if name.ends_with(".gtf") {
            Ok(AnnotationFormat::Gtf)
        } else if name.ends_with(".gff") || name.ends_with(".gff3") {
            Ok(AnnotationFormat::Gff3)
        } else {
            Err(AssocError::UnknownFormat {
                path: path.to_path_buf(),
            })
        }
    }

    /// Whether lines of this feature type define genes.
    pub fn indexes_feature(&self, feature: &str) -> bool {
        match self {
            AnnotationFormat::Gtf => feature == "exon",
            AnnotationFormat::Gff3 => feature == "gene" || feature == "exon",
        }
    }

    /// Extract the gene identifier of a qualifying line.
    ///
    /// Returns `None` for non-qualifying features and for missing or empty ids.
    pub fn gene_id(&self, feature: &str, attributes: &str) -> Option<String> {
        if !self.indexes_feature(feature) {
            return None;
        }
        let id = match self {
            AnnotationFormat::Gtf => gtf_attribute(attributes, "gene_id"),
            AnnotationFormat::Gff3 => gff3_attribute(attributes, "Name"),
        }?;
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationFormat::Gtf => "GTF",
            AnnotationFormat::Gff3 => "GFF3",
        }
    }
}

impl fmt::Display for AnnotationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of parsing an annotation file.
#[derive(Debug, Clone)]
pub struct AnnotationData {
    /// Genes in file order. The same id may appear more than once.
    pub genes: Vec<Gene>,
    pub format: AnnotationFormat,
    /// Non-blank, non-comment lines seen.
    pub usable_lines: usize,
    /// Qualifying lines whose strand was neither `+` nor `-`. Their genes
    /// are kept with [`Strand::Unknown`].
    pub unknown_strand: usize,
}

/// Parse an annotation file, detecting its format unless `format` is given.
///
/// Supports both plain text and gzip-compressed files.
pub fn parse_annotation(path: &Path, format: Option<AnnotationFormat>) -> Result<AnnotationData> {
    let format = match format {
        Some(f) => f,
        None => AnnotationFormat::detect(path)?,
    };
    debug!("Reading {} annotation from {}", format, path.display());
    let reader = open_reader(path)?;
    parse_annotation_reader(reader, path, format)
}

/// Parse annotation data from a reader. `path` is only used in diagnostics.
pub fn parse_annotation_reader<R: BufRead>(
    reader: R,
    path: &Path,
    format: AnnotationFormat,
) -> Result<AnnotationData> {
    let mut genes = Vec::new();
    let mut usable_lines = 0usize;
    let mut unknown_strand = 0usize;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = line_result.map_err(|e| AssocError::io(path, e))?;
        let line = trim_line(&raw);

        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('#') {
            // Sequence data follows; no more features.
            if format == AnnotationFormat::Gff3 && line.starts_with("##FASTA") {
                break;
            }
            continue;
        }
        usable_lines += 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            return Err(AssocError::input_format(path, line_no, "Less columns"));
        }

        let start = parse_coordinate(fields[3], path, line_no, 4)?;
        let end = parse_coordinate(fields[4], path, line_no, 5)?;

        let Some(gene_id) = format.gene_id(fields[2], fields[8]) else {
            continue;
        };

        // 1-based inclusive -> 0-based half-open
        let interval = GenomicInterval::new(fields[0], start - 1, end).ok_or_else(|| {
            AssocError::input_format(
                path,
                line_no,
                format!("Invalid coordinates {}-{} in columns 4-5", start, end),
            )
        })?;

        let strand = fields[6].parse::<Strand>().unwrap_or_else(|_| {
            warn!(
                "{} at line {} in {} has strand '{}'; it is kept but never matches a peak",
                gene_id,
                line_no,
                path.display(),
                fields[6]
            );
            unknown_strand += 1;
            Strand::Unknown
        });

        genes.push(Gene::new(gene_id, interval, strand));
    }

    if usable_lines == 0 {
        return Err(AssocError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(AnnotationData {
        genes,
        format,
        usable_lines,
        unknown_strand,
    })
}

/// Extract a GTF attribute value: `key "value"; key "value"; ...`
fn gtf_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes
        .split(';')
        .filter_map(|pair| pair.trim().split_once(char::is_whitespace))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim().trim_matches('"'))
}

/// Extract a GFF3 attribute value: `key=value;key=value;...`
fn gff3_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim())
}
