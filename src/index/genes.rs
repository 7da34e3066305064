//! Gene index keyed by chromosome and bin.
//!
//! Each gene id owns a stable slot (its first-seen position), which the
//! result columns use as row index. Every qualifying annotation record of an
//! id (typically one per exon) stays filed under its own bins and reports
//! to that slot, so a peak near any of the records updates the gene's row.
//! The index is built once and never changes afterwards.

use ahash::AHashMap;
use indexmap::IndexMap;
use log::debug;

use crate::index::bins::{index_keys, BinKey, BinSet};
use crate::types::Gene;

/// Annotation records filed under the bin keys of their intervals.
#[derive(Debug, Default)]
pub struct GeneIndex {
    /// Gene id -> positions in `records`, in first-seen order. The map
    /// position is the slot.
    slots: IndexMap<String, Vec<usize>>,
    /// Every record with the slot of its gene id.
    records: Vec<(usize, Gene)>,
    /// Chromosome -> bin key -> positions in `records`.
    bins: AHashMap<String, AHashMap<BinKey, Vec<usize>>>,
}

impl GeneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records in annotation order.
    pub fn build<I: IntoIterator<Item = Gene>>(genes: I) -> Self {
        let mut index = GeneIndex::new();
        for gene in genes {
            index.insert(gene);
        }
        debug!(
            "{} annotation records for {} gene ids",
            index.num_records(),
            index.len()
        );
        index
    }

    /// File one record and return the slot of its gene id.
    ///
    /// A recurring id keeps its first slot; earlier records of the id stay
    /// filed.
    pub fn insert(&mut self, gene: Gene) -> usize {
        let position = self.records.len();
        let entry = self.slots.entry(gene.id.clone());
        let slot = entry.index();
        entry.or_default().push(position);

        let by_bin = self.bins.entry(gene.interval.chrom.clone()).or_default();
        for key in index_keys(&gene.interval) {
            by_bin.entry(key).or_default().push(position);
        }
        self.records.push((slot, gene));
        slot
    }

    /// Number of distinct gene ids (result rows).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of filed annotation records.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn slot_of(&self, gene_id: &str) -> Option<usize> {
        self.slots.get_index_of(gene_id)
    }

    pub fn gene_id(&self, slot: usize) -> Option<&str> {
        self.slots.get_index(slot).map(|(id, _)| id.as_str())
    }

    /// Records of the gene in `slot`, in annotation order.
    pub fn records_of(&self, slot: usize) -> impl Iterator<Item = &Gene> {
        self.slots
            .get_index(slot)
            .into_iter()
            .flat_map(move |(_, positions)| positions.iter().map(move |&p| &self.records[p].1))
    }

    /// Gene ids with their slots, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots.keys().enumerate().map(|(slot, id)| (slot, id.as_str()))
    }

    /// Records on `chrom` filed under any of `bins`, with their gene slot.
    ///
    /// A slot is yielded once per matching record. A record is yielded more
    /// than once only if it crosses a coarsest-level boundary.
    pub fn candidates<'a>(
        &'a self,
        chrom: &str,
        bins: &'a BinSet,
    ) -> impl Iterator<Item = (usize, &'a Gene)> + 'a {
        let by_bin = self.bins.get(chrom);
        bins.keys()
            .filter_map(move |key| by_bin.and_then(|m| m.get(&key)))
            .flatten()
            .map(move |&position| {
                let (slot, gene) = &self.records[position];
                (*slot, gene)
            })
    }
}
