//! Core data structures for peakassoc.
//!
//! Coordinates are 0-based and half-open (`[start, end)`) everywhere in
//! this crate; parsers convert from the 1-based annotation convention.

use std::fmt;
use std::str::FromStr;

/// Strand orientation of a gene.
///
/// `Unknown` covers annotation strands other than `+`/`-` (usually `.`).
/// Such genes have no TSS and never match a peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
    Unknown,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+' or '-'")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
            Strand::Unknown => ".",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A half-open interval on one chromosome.
///
/// Invariant: `0 <= start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
}

impl GenomicInterval {
    /// Create an interval, returning `None` if the invariant does not hold.
    pub fn new(chrom: impl Into<String>, start: i64, end: i64) -> Option<Self> {
        if start < 0 || start >= end {
            return None;
        }
        Some(GenomicInterval {
            chrom: chrom.into(),
            start,
            end,
        })
    }

    pub fn length(&self) -> i64 {
        self.end - self.start
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// A gene as extracted from one qualifying annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub id: String,
    pub interval: GenomicInterval,
    pub strand: Strand,
}

impl Gene {
    pub fn new(id: impl Into<String>, interval: GenomicInterval, strand: Strand) -> Self {
        Gene {
            id: id.into(),
            interval,
            strand,
        }
    }

    /// Transcription start site: gene start on `+`, gene end on `-`.
    pub fn tss(&self) -> Option<i64> {
        match self.strand {
            Strand::Positive => Some(self.interval.start),
            Strand::Negative => Some(self.interval.end),
            Strand::Unknown => None,
        }
    }
}

/// A called peak with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    pub interval: GenomicInterval,
    pub score: f64,
}

impl Peak {
    pub fn new(interval: GenomicInterval, score: f64) -> Self {
        Peak { interval, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parse() {
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Positive));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Negative));
        assert!(".".parse::<Strand>().is_err());
        assert_eq!(Strand::Negative.to_string(), "-");
        assert_eq!(Strand::Unknown.to_string(), ".");
    }

    #[test]
    fn test_interval_invariant() {
        assert!(GenomicInterval::new("chr1", 10, 20).is_some());
        assert!(GenomicInterval::new("chr1", 10, 10).is_none());
        assert!(GenomicInterval::new("chr1", 20, 10).is_none());
        assert!(GenomicInterval::new("chr1", -1, 10).is_none());
        assert_eq!(GenomicInterval::new("chr1", 10, 20).unwrap().length(), 10);
    }

    #[test]
    fn test_gene_tss() {
        let iv = GenomicInterval::new("chr1", 2000, 3000).unwrap();
        assert_eq!(Gene::new("g", iv.clone(), Strand::Positive).tss(), Some(2000));
        assert_eq!(Gene::new("g", iv.clone(), Strand::Negative).tss(), Some(3000));
        assert_eq!(Gene::new("g", iv, Strand::Unknown).tss(), None);
    }
}
