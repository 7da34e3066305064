//! Peak file reader with gzip support.
//!
//! Peak files are tab-separated with chromosome, start and end in the first
//! three columns and a score whose position depends on [`PeakFormat`].
//! Coordinates are already 0-based half-open.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::config::PeakFormat;
use crate::error::{AssocError, Result};
use crate::parser::util::{open_reader, parse_coordinate, parse_score, trim_line};
use crate::types::{GenomicInterval, Peak};

/// Streaming peak reader for chunked processing.
///
/// Every usable line must be well formed; the first malformed line is
/// returned as an error naming the file and line number.
pub struct PeakReader {
    reader: Box<dyn BufRead + Send>,
    path: PathBuf,
    format: PeakFormat,
    line_no: usize,
    usable_lines: usize,
}

impl PeakReader {
    /// Create a new PeakReader from a file path (supports .gz).
    pub fn new(path: &Path, format: PeakFormat) -> Result<Self> {
        let reader = open_reader(path)?;
        Ok(Self::from_reader(reader, path, format))
    }

    /// Wrap an already open reader. `path` is only used in diagnostics.
    pub fn from_reader(reader: Box<dyn BufRead + Send>, path: &Path, format: PeakFormat) -> Self {
        PeakReader {
            reader,
            path: path.to_path_buf(),
            format,
            line_no: 0,
            usable_lines: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of usable lines read so far.
    pub fn usable_lines(&self) -> usize {
        self.usable_lines
    }

    /// Read the next chunk of peaks, in file order.
    ///
    /// Returns `None` at EOF, or `EmptyInput` if the file had no usable line.
    pub fn read_chunk(&mut self, size: usize) -> Result<Option<Vec<Peak>>> {
        let mut peaks = Vec::with_capacity(size);
        let mut line = String::new();

        while peaks.len() < size {
            line.clear();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| AssocError::io(&self.path, e))?;

            if bytes_read == 0 {
                break;
            }
            self.line_no += 1;

            let trimmed = trim_line(&line);
            if is_skippable(trimmed) {
                continue;
            }
            self.usable_lines += 1;

            peaks.push(self.parse_line(trimmed)?);
        }

        if !peaks.is_empty() {
            Ok(Some(peaks))
        } else if self.usable_lines == 0 {
            Err(AssocError::EmptyInput {
                path: self.path.clone(),
            })
        } else {
            Ok(None)
        }
    }

    /// Parse a single peak line.
    fn parse_line(&self, line: &str) -> Result<Peak> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < self.format.min_columns() {
            return Err(AssocError::input_format(&self.path, self.line_no, "Less columns"));
        }

        let start = parse_coordinate(fields[1], &self.path, self.line_no, 2)?;
        let end = parse_coordinate(fields[2], &self.path, self.line_no, 3)?;
        let score_col = self.format.score_column();
        let score = parse_score(fields[score_col], &self.path, self.line_no, score_col + 1)?;

        let interval = GenomicInterval::new(fields[0], start, end).ok_or_else(|| {
            AssocError::input_format(
                &self.path,
                self.line_no,
                format!("Invalid coordinates {}-{} in columns 2-3", start, end),
            )
        })?;

        Ok(Peak::new(interval, score))
    }
}

/// Blank lines, comments and UCSC `track`/`browser` headers.
fn is_skippable(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}
