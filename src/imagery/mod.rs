//! Satellite imagery helpers: cloud coverage of acquisitions and NDVI rendering.

pub mod coverage;
pub mod ndvi;

pub use coverage::{classify_coverage, CoverageRecord, CoverageReport, CoverageStatus};
