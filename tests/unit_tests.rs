//! Scenario tests for the association engine.
//!
//! These exercise the public library API end to end on in-memory genes and
//! peaks: window geometry, nearest-peak selection and per-source isolation.

use peakassoc::config::{Config, Window};
use peakassoc::index::bins::{bin_of, bin_of_range, finest_bin};
use peakassoc::index::GeneIndex;
use peakassoc::matcher::{match_peaks, tss_distance};
use peakassoc::output::write_tables;
use peakassoc::results::{PeakMatch, ResultTable, Source};
use peakassoc::types::{Gene, GenomicInterval, Peak, Strand};
use std::path::Path;

// -------------------------------------------------------------------------
// Helper functions
// -------------------------------------------------------------------------

fn gene(id: &str, chrom: &str, start: i64, end: i64, strand: Strand) -> Gene {
    Gene::new(id, GenomicInterval::new(chrom, start, end).unwrap(), strand)
}

fn peak(chrom: &str, start: i64, end: i64, score: f64) -> Peak {
    Peak::new(GenomicInterval::new(chrom, start, end).unwrap(), score)
}

fn default_window() -> Window {
    Config::default().window()
}

fn table_for(index: &GeneIndex, sources: &[&str]) -> ResultTable {
    ResultTable::new(
        index,
        sources
            .iter()
            .map(|s| Source::from_path(Path::new(s)))
            .collect(),
    )
}

// -------------------------------------------------------------------------
// 1. TSS window scenarios
// -------------------------------------------------------------------------

mod test_tss_window {
    use super::*;

    #[test]
    fn test_pos_strand_upstream_then_nearer_downstream() {
        let index = GeneIndex::build(vec![gene("g1", "chr1", 1000, 1500, Strand::Positive)]);
        let mut table = table_for(&index, &["tf.bed"]);
        let w = default_window();

        let col = &mut table.columns_mut()[0].matches;
        match_peaks(&[peak("chr1", 500, 600, 1.0)], &index, col, &w, 0.0);
        assert_eq!(col[0].distance, Some(400));

        match_peaks(&[peak("chr1", 1100, 1150, 1.0)], &index, col, &w, 0.0);
        assert_eq!(col[0].distance, Some(-100));
        assert!(col[0].bound);
    }

    #[test]
    fn test_neg_strand_tss_at_gene_end() {
        let g = gene("g2", "chr1", 2000, 3000, Strand::Negative);
        assert_eq!(tss_distance(&g, &peak("chr1", 3050, 3100, 1.0).interval, &default_window()), Some(50));
    }

    #[test]
    fn test_farther_peak_does_not_replace() {
        let index = GeneIndex::build(vec![gene("g1", "chr1", 1000, 1500, Strand::Positive)]);
        let mut matches = vec![PeakMatch::default()];
        let w = default_window();

        let peaks = vec![peak("chr1", 1100, 1150, 1.0), peak("chr1", 500, 600, 1.0)];
        match_peaks(&peaks, &index, &mut matches, &w, 0.0);
        assert_eq!(matches[0].distance, Some(-100));
    }

    #[test]
    fn test_equal_magnitude_keeps_first() {
        let index = GeneIndex::build(vec![gene("g1", "chr1", 1000, 1500, Strand::Positive)]);
        let mut matches = vec![PeakMatch::default()];
        let w = default_window();

        // 1000 - 900 = 100 upstream, then 1000 - 1100 = -100 downstream
        let peaks = vec![peak("chr1", 800, 900, 1.0), peak("chr1", 1100, 1200, 1.0)];
        match_peaks(&peaks, &index, &mut matches, &w, 0.0);
        assert_eq!(matches[0].distance, Some(100));
    }

    #[test]
    fn test_below_threshold_is_ignored_even_when_overlapping() {
        let index = GeneIndex::build(vec![gene("g1", "chr1", 1000, 1500, Strand::Positive)]);
        let mut matches = vec![PeakMatch::default()];

        let stats = match_peaks(&[peak("chr1", 990, 1010, 0.5)], &index, &mut matches, &default_window(), 1.0);
        assert_eq!(stats.below_threshold, 1);
        assert!(!matches[0].bound);
        assert_eq!(matches[0].distance, None);
    }

    #[test]
    fn test_custom_window() {
        let g = gene("g1", "chr1", 10_000, 12_000, Strand::Positive);
        let narrow = Window::new(100, 50);
        assert_eq!(tss_distance(&g, &peak("chr1", 9_800, 9_850, 1.0).interval, &narrow), None);
        assert_eq!(tss_distance(&g, &peak("chr1", 9_850, 9_900, 1.0).interval, &narrow), Some(100));
        assert_eq!(tss_distance(&g, &peak("chr1", 10_050, 10_060, 1.0).interval, &narrow), Some(-50));
    }
}

// -------------------------------------------------------------------------
// 2. Result table behaviour
// -------------------------------------------------------------------------

mod test_result_table {
    use super::*;

    #[test]
    fn test_no_match_default() {
        let index = GeneIndex::build(vec![
            gene("g1", "chr1", 1000, 1500, Strand::Positive),
            gene("g2", "chr5", 1000, 1500, Strand::Negative),
        ]);
        let table = table_for(&index, &["a.bed", "b.bed"]);

        let mut presence = Vec::new();
        let mut distance = Vec::new();
        let labels = vec!["A".to_string(), "B".to_string()];
        write_tables(&mut presence, &mut distance, &table, &labels).unwrap();

        assert_eq!(String::from_utf8(presence).unwrap(), "#gene,A,B\ng1,0,0\ng2,0,0\n");
        assert_eq!(String::from_utf8(distance).unwrap(), "#gene,A,B\ng1,-,-\ng2,-,-\n");
    }

    #[test]
    fn test_sources_do_not_interfere() {
        let index = GeneIndex::build(vec![gene("g1", "chr1", 1000, 1500, Strand::Positive)]);
        let mut table = table_for(&index, &["a.bed", "b.bed"]);
        let w = default_window();

        {
            let (first, second) = table.columns_mut().split_at_mut(1);
            match_peaks(&[peak("chr1", 500, 600, 1.0)], &index, &mut first[0].matches, &w, 0.0);
            match_peaks(&[peak("chr1", 9000, 9100, 1.0)], &index, &mut second[0].matches, &w, 0.0);
        }

        assert_eq!(table.get("g1", 0).unwrap().distance, Some(400));
        assert_eq!(*table.get("g1", 1).unwrap(), PeakMatch::default());
    }

    #[test]
    fn test_processing_twice_is_idempotent() {
        let index = GeneIndex::build(vec![
            gene("g1", "chr1", 1000, 1500, Strand::Positive),
            gene("g2", "chr1", 2000, 3000, Strand::Negative),
        ]);
        let peaks = vec![
            peak("chr1", 500, 600, 1.0),
            peak("chr1", 1100, 1150, 1.0),
            peak("chr1", 3050, 3100, 1.0),
        ];
        let w = default_window();

        let mut once = vec![PeakMatch::default(); 2];
        match_peaks(&peaks, &index, &mut once, &w, 0.0);

        let mut twice = vec![PeakMatch::default(); 2];
        match_peaks(&peaks, &index, &mut twice, &w, 0.0);
        match_peaks(&peaks, &index, &mut twice, &w, 0.0);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_every_exon_of_a_gene_is_matched() {
        // Two exons of one gene; the peak only reaches the first exon's window
        let index = GeneIndex::build(vec![
            gene("G", "chr1", 10_000, 10_500, Strand::Positive),
            gene("G", "chr1", 50_000, 50_500, Strand::Positive),
        ]);
        let mut table = table_for(&index, &["a.bed"]);
        assert_eq!(table.num_genes(), 1);

        match_peaks(
            &[peak("chr1", 9_900, 9_950, 1.0)],
            &index,
            &mut table.columns_mut()[0].matches,
            &default_window(),
            0.0,
        );
        let m = table.get("G", 0).unwrap();
        assert!(m.bound);
        assert_eq!(m.distance, Some(50));
    }

    #[test]
    fn test_nearest_across_exons() {
        let index = GeneIndex::build(vec![
            gene("G", "chr1", 10_000, 10_500, Strand::Positive),
            gene("G", "chr1", 50_000, 50_500, Strand::Positive),
        ]);
        let mut matches = vec![PeakMatch::default()];
        let peaks = vec![peak("chr1", 49_000, 49_100, 1.0), peak("chr1", 9_900, 9_950, 1.0)];
        match_peaks(&peaks, &index, &mut matches, &default_window(), 0.0);
        assert_eq!(matches[0].distance, Some(50));
    }

    #[test]
    fn test_unknown_strand_gene_keeps_unbound_row() {
        let index = GeneIndex::build(vec![
            gene("D", "chr1", 1000, 1500, Strand::Unknown),
            gene("P", "chr1", 1000, 1500, Strand::Positive),
        ]);
        let mut table = table_for(&index, &["a.bed"]);
        match_peaks(
            &[peak("chr1", 900, 1100, 1.0)],
            &index,
            &mut table.columns_mut()[0].matches,
            &default_window(),
            0.0,
        );

        let mut presence = Vec::new();
        let mut distance = Vec::new();
        write_tables(&mut presence, &mut distance, &table, &["A".to_string()]).unwrap();
        assert_eq!(String::from_utf8(presence).unwrap(), "#gene,A\nD,0\nP,1\n");
        assert_eq!(String::from_utf8(distance).unwrap(), "#gene,A\nD,-\nP,-100\n");
    }
}

// -------------------------------------------------------------------------
// 3. Binning
// -------------------------------------------------------------------------

mod test_bins {
    use super::*;

    #[test]
    fn test_gene_found_through_spanning_peak() {
        // Gene in the second finest bin, peak spanning the first two bins
        let g = gene("g1", "chr1", 131_100, 131_200, Strand::Positive);
        let own = bin_of(&g.interval).own_bin().unwrap();
        assert_eq!(own, finest_bin(131_100));

        let p = bin_of_range(130_000, 132_000);
        assert!(p.keys().any(|k| k == own));
    }

    #[test]
    fn test_upper_and_lower_disjoint() {
        let b = bin_of_range(100_000, 3_000_000);
        for k in &b.upper {
            assert!(!b.lower.contains(k));
        }
    }
}
