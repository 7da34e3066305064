//! Parsers for annotation and peak files.

pub mod annotation;
pub mod peak;
pub mod util;

pub use annotation::{parse_annotation, AnnotationData, AnnotationFormat};
pub use peak::PeakReader;
