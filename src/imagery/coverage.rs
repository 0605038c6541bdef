use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Highest cloud coverage percentage still classified as low.
pub const LOW_COVERAGE_MAX: f64 = 20.0;
/// Highest cloud coverage percentage still classified as medium.
pub const MEDIUM_COVERAGE_MAX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Low,
    Medium,
    High,
}

impl CoverageStatus {
    pub fn name(&self) -> &'static str {
        match self {
            CoverageStatus::Low => "low",
            CoverageStatus::Medium => "medium",
            CoverageStatus::High => "high",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a cloud coverage percentage. Values outside [0, 100] are not rejected, they fall into
/// the same thresholds. NaN compares false against both thresholds and is classified as high.
pub fn classify_coverage(percentage: f64) -> CoverageStatus {
    if percentage <= LOW_COVERAGE_MAX {
        CoverageStatus::Low
    } else if percentage <= MEDIUM_COVERAGE_MAX {
        CoverageStatus::Medium
    } else {
        CoverageStatus::High
    }
}

/// Cloud coverage of a single satellite acquisition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRecord {
    /// Acquisition date as `YYYY-MM-DD`.
    pub date: String,
    pub coverage: f64,
    pub status: CoverageStatus,
    pub has_image: bool,
}

impl CoverageRecord {
    pub fn new(date: impl Into<String>, coverage: f64) -> Self {
        Self {
            date: date.into(),
            coverage,
            status: classify_coverage(coverage),
            has_image: true,
        }
    }

    /// Build a record from a STAC item, reading `properties.datetime` and
    /// `properties["eo:cloud_cover"]`.
    pub fn from_catalog_item(item: &geojson::Feature) -> anyhow::Result<Self> {
        let properties = item
            .properties
            .as_ref()
            .ok_or_else(|| anyhow!("Catalog item has no properties"))?;
        let datetime = properties
            .get("datetime")
            .and_then(|value| value.as_str())
            .ok_or_else(|| anyhow!("Catalog item has no datetime"))?;
        let date = datetime.split('T').next().unwrap_or(datetime);
        let coverage = properties
            .get("eo:cloud_cover")
            .and_then(|value| value.as_f64())
            .ok_or_else(|| anyhow!("Catalog item from {} has no eo:cloud_cover", datetime))?;
        Ok(Self::new(date, coverage))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub total: usize,
}

/// Cloud coverage records, newest first, with per-status counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub records: Vec<CoverageRecord>,
    pub summary: CoverageSummary,
}

impl CoverageReport {
    pub fn from_records(mut records: Vec<CoverageRecord>) -> Self {
        // ISO dates sort chronologically as strings.
        records.sort_by(|a, b| b.date.cmp(&a.date));
        let mut summary = CoverageSummary {
            total: records.len(),
            ..Default::default()
        };
        for record in &records {
            match record.status {
                CoverageStatus::Low => summary.low += 1,
                CoverageStatus::Medium => summary.medium += 1,
                CoverageStatus::High => summary.high += 1,
            }
        }
        Self { records, summary }
    }

    /// Build a report from STAC items. Items without a date or cloud coverage are skipped.
    pub fn from_catalog_items(items: &[geojson::Feature]) -> Self {
        let records: Vec<CoverageRecord> = items
            .iter()
            .filter_map(|item| match CoverageRecord::from_catalog_item(item) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::debug!("Skipping catalog item: {}", err);
                    None
                }
            })
            .collect();
        if records.len() != items.len() {
            log::warn!(
                "Out of {} catalog items read, only {} had a date and cloud coverage.",
                items.len(),
                records.len()
            )
        }
        Self::from_records(records)
    }
}
