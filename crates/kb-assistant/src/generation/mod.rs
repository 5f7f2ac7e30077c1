//! Answer extraction: response normalization and citation handling

pub mod citation;
pub mod normalize;

pub use citation::{extract_citations, CitationDefect};
pub use normalize::{normalize, NormalizedAnswer};
