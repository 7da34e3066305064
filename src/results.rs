//! Per-gene, per-source association records.
//!
//! Results are stored column-wise: one [`SourceColumn`] per peak source,
//! each holding one [`PeakMatch`] per gene slot of the [`GeneIndex`]. A peak
//! pass borrows exactly one column mutably, so sources never touch each
//! other's state.

use std::path::{Path, PathBuf};

use crate::index::GeneIndex;

/// Association state of one gene against one peak source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeakMatch {
    /// A peak fell within the gene's proximal window.
    pub bound: bool,
    /// Signed distance to the nearest such peak.
    pub distance: Option<i64>,
}

impl PeakMatch {
    /// Record a peak at signed `distance` from the TSS.
    ///
    /// The stored distance only changes to a strictly nearer value; on equal
    /// magnitude the first recorded peak is kept. Returns `true` if the
    /// distance changed.
    pub fn record(&mut self, distance: i64) -> bool {
        self.bound = true;
        match self.distance {
            Some(current) if current.unsigned_abs() <= distance.unsigned_abs() => false,
            _ => {
                self.distance = Some(distance);
                true
            }
        }
    }
}

/// One peak input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Identifier used as the fallback column label.
    pub id: String,
    pub path: PathBuf,
}

impl Source {
    pub fn from_path(path: &Path) -> Self {
        Source {
            id: path.display().to_string(),
            path: path.to_path_buf(),
        }
    }
}

/// Results of one source for every gene slot.
#[derive(Debug, Clone)]
pub struct SourceColumn {
    pub source: Source,
    pub matches: Vec<PeakMatch>,
}

impl SourceColumn {
    /// Number of genes bound by at least one peak.
    pub fn bound_genes(&self) -> usize {
        self.matches.iter().filter(|m| m.bound).count()
    }
}

/// All association records of a run.
#[derive(Debug, Clone)]
pub struct ResultTable {
    /// Gene ids by slot.
    gene_ids: Vec<String>,
    columns: Vec<SourceColumn>,
}

impl ResultTable {
    /// Create unset records for every gene of `index` and every source.
    pub fn new(index: &GeneIndex, sources: Vec<Source>) -> Self {
        let gene_ids: Vec<String> = index.ids().map(|(_, id)| id.to_string()).collect();
        let columns = sources
            .into_iter()
            .map(|source| SourceColumn {
                source,
                matches: vec![PeakMatch::default(); gene_ids.len()],
            })
            .collect();
        ResultTable { gene_ids, columns }
    }

    pub fn num_genes(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [SourceColumn] {
        &mut self.columns
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.columns.iter().map(|c| &c.source)
    }

    /// Record for `gene_id` in column `source`.
    pub fn get(&self, gene_id: &str, source: usize) -> Option<&PeakMatch> {
        let slot = self.gene_ids.iter().position(|id| id == gene_id)?;
        self.columns.get(source)?.matches.get(slot)
    }

    /// Rows sorted ascending by gene id, each with one record per source.
    pub fn sorted_rows(&self) -> Vec<(&str, Vec<PeakMatch>)> {
        let mut slots: Vec<usize> = (0..self.gene_ids.len()).collect();
        slots.sort_by(|&a, &b| self.gene_ids[a].cmp(&self.gene_ids[b]));

        slots
            .into_iter()
            .map(|slot| {
                let row = self.columns.iter().map(|c| c.matches[slot]).collect();
                (self.gene_ids[slot].as_str(), row)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gene, GenomicInterval, Strand};

    fn index(ids: &[&str]) -> GeneIndex {
        GeneIndex::build(ids.iter().enumerate().map(|(i, id)| {
            let start = 1000 * (i as i64 + 1);
            Gene::new(
                *id,
                GenomicInterval::new("chr1", start, start + 100).unwrap(),
                Strand::Positive,
            )
        }))
    }

    #[test]
    fn test_record_nearest_wins() {
        let mut m = PeakMatch::default();
        assert!(!m.bound);
        assert_eq!(m.distance, None);

        assert!(m.record(400));
        assert_eq!(m.distance, Some(400));
        assert!(m.record(-100));
        assert_eq!(m.distance, Some(-100));
        assert!(!m.record(250));
        assert_eq!(m.distance, Some(-100));
        assert!(m.bound);
    }

    #[test]
    fn test_record_first_writer_wins_ties() {
        let mut m = PeakMatch::default();
        m.record(-50);
        assert!(!m.record(50));
        assert_eq!(m.distance, Some(-50));
    }

    #[test]
    fn test_new_table_is_unset() {
        let idx = index(&["g2", "g1"]);
        let table = ResultTable::new(
            &idx,
            vec![Source::from_path(Path::new("a.bed")), Source::from_path(Path::new("b.bed"))],
        );
        assert_eq!(table.num_genes(), 2);
        assert_eq!(table.columns().len(), 2);
        for col in table.columns() {
            assert!(col.matches.iter().all(|m| *m == PeakMatch::default()));
            assert_eq!(col.bound_genes(), 0);
        }
    }

    #[test]
    fn test_sorted_rows() {
        let idx = index(&["gB", "gA", "gC"]);
        let mut table = ResultTable::new(&idx, vec![Source::from_path(Path::new("a.bed"))]);
        let slot = idx.slot_of("gC").unwrap();
        table.columns_mut()[0].matches[slot].record(12);

        let rows = table.sorted_rows();
        let ids: Vec<&str> = rows.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["gA", "gB", "gC"]);
        assert_eq!(rows[2].1[0].distance, Some(12));
        assert_eq!(table.get("gC", 0).unwrap().distance, Some(12));
        assert!(table.get("missing", 0).is_none());
    }
}
