//! Utility functions for file parsing.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{AssocError, Result};

/// Largest accepted coordinate, the SAM/BAM position limit.
pub const MAX_COORDINATE: i64 = (1 << 31) - 1;

/// Creates a buffered reader that automatically handles gzip-compressed files.
///
/// This function checks if the file path ends with ".gz" and wraps the file
/// in a GzDecoder if so. Otherwise, it returns a plain buffered reader.
pub fn create_buffered_reader(file: File, path: &Path) -> Box<dyn BufRead + Send> {
    if is_gzipped(path) {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

/// Open `path` for buffered line reading.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|e| AssocError::io(path, e))?;
    Ok(create_buffered_reader(file, path))
}

pub fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Strip the line terminator, including a Windows `\r`.
pub fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Parse a non-negative integer coordinate from a 1-based `column`.
pub fn parse_coordinate(field: &str, path: &Path, line: usize, column: usize) -> Result<i64> {
    match field.trim().parse::<i64>() {
        Ok(v) if (0..=MAX_COORDINATE).contains(&v) => Ok(v),
        Ok(v) if v < 0 => Err(AssocError::input_format(
            path,
            line,
            format!("Negative value in column {}", column),
        )),
        Ok(_) => Err(AssocError::input_format(
            path,
            line,
            format!("Value out of range in column {}", column),
        )),
        Err(_) => Err(AssocError::input_format(
            path,
            line,
            format!("Non-numeric value in column {}", column),
        )),
    }
}

/// Parse a finite floating-point value from a 1-based `column`.
pub fn parse_score(field: &str, path: &Path, line: usize, column: usize) -> Result<f64> {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AssocError::input_format(
            path,
            line,
            format!("Non-numeric value in column {}", column),
        )),
    }
}
