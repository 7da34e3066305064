//! Proximal-window test around a gene's TSS.
//!
//! The window is asymmetric: `up` bp upstream and `down` bp downstream of
//! the TSS, where upstream/downstream follow the gene's strand.
//!
//! ```text
//!   + strand                 TSS = gene.start
//!   ....[ up ............... |.. down ]===gene===>
//!
//!   - strand                                   TSS = gene.end
//!                <===gene===[ down ..|............... up ]....
//! ```
//!
//! Signed distances are negative for peaks downstream of the TSS (inside
//! the gene body direction) and positive for peaks upstream.

use crate::config::Window;
use crate::types::{Gene, GenomicInterval, Strand};

/// Signed distance from the gene's TSS to `peak`, or `None` if the peak
/// does not touch the proximal window. Genes of unknown strand never match.
///
/// Window bounds saturate instead of overflowing.
pub fn tss_distance(gene: &Gene, peak: &GenomicInterval, window: &Window) -> Option<i64> {
    match gene.strand {
        Strand::Positive => {
            let tss = gene.interval.start;
            if peak.start <= tss.saturating_add(window.down)
                && tss.saturating_sub(window.up) <= peak.end
            {
                if peak.start < tss {
                    Some(tss - peak.end)
                } else {
                    Some(tss - peak.start)
                }
            } else {
                None
            }
        }
        Strand::Negative => {
            let tss = gene.interval.end;
            if peak.start <= tss.saturating_add(window.up)
                && tss.saturating_sub(window.down) <= peak.end
            {
                if tss < peak.end {
                    Some(peak.start - tss)
                } else {
                    Some(peak.end - tss)
                }
            } else {
                None
            }
        }
        Strand::Unknown => None,
    }
}

/// Range to query the bin index with so that every gene whose window the
/// peak could touch is found: the peak widened by the window reach.
///
/// Candidates in neighbouring bins are included, so a gene whose window
/// reaches a peak is found even when gene and peak share no bin.
pub fn search_range(peak: &GenomicInterval, window: &Window) -> (i64, i64) {
    let reach = window.reach();
    (
        peak.start.saturating_sub(reach).max(0),
        peak.end.saturating_add(reach),
    )
}
