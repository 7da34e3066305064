//! Output tables for peakassoc results.
//!
//! Two comma-separated tables with identical rows (genes, ascending by id)
//! and columns (sources):
//!
//! - presence: `1` if any peak fell within the gene's window, else `0`
//! - distance: signed distance to the nearest such peak, or `-`

use log::warn;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AssocError, Result};
use crate::results::{PeakMatch, ResultTable, Source};

/// Distance cell for genes without a peak in the window.
pub const ABSENT_DISTANCE: &str = "-";

/// Column labels: the caller's labels if there is one per source,
/// otherwise the source identifiers.
pub fn resolve_labels<'a, I>(labels: Option<&[String]>, sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Source>,
{
    let ids: Vec<String> = sources.into_iter().map(|s| s.id.clone()).collect();
    match labels {
        Some(labels) if labels.len() == ids.len() => labels.to_vec(),
        Some(labels) => {
            warn!(
                "{} labels given for {} peak files; using file names as labels",
                labels.len(),
                ids.len()
            );
            ids
        }
        None => ids,
    }
}

/// Write the `#gene,<label>,...` header.
pub fn write_header<W: Write>(writer: &mut W, labels: &[String]) -> io::Result<()> {
    write!(writer, "#gene")?;
    for label in labels {
        write!(writer, ",{}", label)?;
    }
    writeln!(writer)
}

/// Format one presence-table row.
pub fn format_presence_line(gene_id: &str, row: &[PeakMatch]) -> String {
    let mut line = String::from(gene_id);
    for m in row {
        line.push(',');
        line.push(if m.bound { '1' } else { '0' });
    }
    line
}

/// Format one distance-table row.
pub fn format_distance_line(gene_id: &str, row: &[PeakMatch]) -> String {
    let mut line = String::from(gene_id);
    for m in row {
        line.push(',');
        match m.distance {
            Some(d) => line.push_str(&d.to_string()),
            None => line.push_str(ABSENT_DISTANCE),
        }
    }
    line
}

/// Rows of one table, as returned by [`ResultTable::sorted_rows`].
pub type Rows<'a> = [(&'a str, Vec<PeakMatch>)];

/// Which of the two tables to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Presence,
    Distance,
}

impl TableKind {
    pub fn format_line(&self, gene_id: &str, row: &[PeakMatch]) -> String {
        match self {
            TableKind::Presence => format_presence_line(gene_id, row),
            TableKind::Distance => format_distance_line(gene_id, row),
        }
    }
}

/// Write one table, header first, and flush.
pub fn write_table<W: Write>(
    writer: &mut W,
    kind: TableKind,
    rows: &Rows<'_>,
    labels: &[String],
) -> io::Result<()> {
    write_header(writer, labels)?;
    for (gene_id, row) in rows {
        writeln!(writer, "{}", kind.format_line(gene_id, row))?;
    }
    writer.flush()
}

/// Write both tables to the given writers.
pub fn write_tables<P: Write, D: Write>(
    presence: &mut P,
    distance: &mut D,
    table: &ResultTable,
    labels: &[String],
) -> io::Result<()> {
    let rows = table.sorted_rows();
    write_table(presence, TableKind::Presence, &rows, labels)?;
    write_table(distance, TableKind::Distance, &rows, labels)
}

/// Output file locations derived from a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub presence: PathBuf,
    pub distance: PathBuf,
}

impl OutputPaths {
    /// `<prefix>_peak.txt` and `<prefix>_dist.txt`.
    pub fn from_prefix(prefix: &Path) -> Self {
        let prefix = prefix.to_string_lossy();
        OutputPaths {
            presence: PathBuf::from(format!("{}_peak.txt", prefix)),
            distance: PathBuf::from(format!("{}_dist.txt", prefix)),
        }
    }
}

/// Create both output files and write the tables.
pub fn write_table_files(paths: &OutputPaths, table: &ResultTable, labels: &[String]) -> Result<()> {
    let create = |path: &Path| {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| AssocError::io(path, e))
    };
    let mut presence = create(&paths.presence)?;
    let mut distance = create(&paths.distance)?;

    let rows = table.sorted_rows();
    write_table_to(&mut presence, &paths.presence, TableKind::Presence, &rows, labels)?;
    write_table_to(&mut distance, &paths.distance, TableKind::Distance, &rows, labels)?;
    Ok(())
}

/// Write one table, reporting failures against `path`.
fn write_table_to<W: Write>(
    writer: &mut W,
    path: &Path,
    kind: TableKind,
    rows: &Rows<'_>,
    labels: &[String],
) -> Result<()> {
    write_table(writer, kind, rows, labels).map_err(|e| AssocError::io(path, e))
}
