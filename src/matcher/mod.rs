//! Matching of peaks to gene TSS windows.

pub mod peaks;
pub mod window;

pub use peaks::{match_all_sources, match_peak, match_peaks, match_source, MatchStats};
pub use window::{search_range, tss_distance};
