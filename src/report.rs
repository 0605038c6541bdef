use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    boundary::{Boundary, BoundaryIssue},
    config::{Config, MapCenter},
    imagery::{
        ndvi::{output_dimensions, ImageDimensions},
        CoverageReport,
    },
};

/// Everything the dashboard derives from a single farm boundary.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FarmReport {
    pub name: String,
    /// `minLng,minLat,maxLng,maxLat`, absent while the boundary is unusable.
    pub bbox: Option<String>,
    pub area_m2: f64,
    /// Boundary centre, or the configured map centre if the boundary is unusable.
    pub center: MapCenter,
    pub ndvi_dimensions: Option<ImageDimensions>,
    pub issues: Vec<BoundaryIssue>,
}

#[derive(Serialize, Debug)]
pub struct Report {
    pub farms: Vec<FarmReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_coverage: Option<CoverageReport>,
}

/// Read all features of a GeoJSON file holding either a FeatureCollection or a single Feature.
pub fn read_features_from_geojson(filepath: &Path) -> anyhow::Result<Vec<geojson::Feature>> {
    let contents =
        fs::read_to_string(filepath).with_context(|| format!("Reading {:?}", filepath))?;
    let geojson: geojson::GeoJson = contents
        .parse()
        .map_err(|err| anyhow!("Could not parse GeoJSON in {:?}, {}", filepath, err))?;
    match geojson {
        geojson::GeoJson::FeatureCollection(collection) => Ok(collection.features),
        geojson::GeoJson::Feature(feature) => Ok(vec![feature]),
        geojson::GeoJson::Geometry(_) => Err(anyhow!(
            "Expected a Feature or FeatureCollection in {:?}, found a bare Geometry",
            filepath
        )),
    }
}

fn feature_name(index: usize, feature: &geojson::Feature) -> String {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("farm-{}", index))
}

pub fn build_farm_report(index: usize, feature: &geojson::Feature, config: &Config) -> FarmReport {
    let name = feature_name(index, feature);
    let boundary = match Boundary::from_feature(feature) {
        Some(boundary) => boundary,
        None => {
            return FarmReport {
                name,
                bbox: None,
                area_m2: 0.0,
                center: config.map_center,
                ndvi_dimensions: None,
                issues: Vec::new(),
            }
        }
    };

    let bbox = boundary.bounding_box();
    let ndvi_dimensions = bbox.and_then(|bbox| {
        match output_dimensions(&bbox, config.ndvi_base_resolution) {
            Ok(dimensions) => Some(dimensions),
            Err(err) => {
                log::debug!("{}: {}", name, err);
                None
            }
        }
    });
    FarmReport {
        bbox: bbox.map(|bbox| bbox.to_string()),
        area_m2: boundary.area_with(config.area_method),
        center: boundary
            .center()
            .map(MapCenter::from)
            .unwrap_or(config.map_center),
        ndvi_dimensions,
        issues: boundary.validate(),
        name,
    }
}

pub fn build_report(config: &Config) -> anyhow::Result<Report> {
    let features = read_features_from_geojson(&config.boundaries_geojson_path)?;
    log::info!(
        "Read {} boundary features from {:?}",
        features.len(),
        &config.boundaries_geojson_path
    );

    let farms: Vec<FarmReport> = features
        .par_iter()
        .enumerate()
        .map(|(index, feature)| build_farm_report(index, feature, config))
        .collect();

    for farm in &farms {
        match &farm.bbox {
            Some(bbox) => log::info!(
                "{}: {:.2} {}, bbox {}",
                farm.name,
                config.area_unit.from_square_meters(farm.area_m2),
                config.area_unit.symbol(),
                bbox
            ),
            None => log::warn!("{}: boundary is not usable yet", farm.name),
        }
        for issue in &farm.issues {
            log::warn!("{}: {}", farm.name, issue);
        }
    }
    let usable = farms.iter().filter(|farm| farm.bbox.is_some()).count();
    if usable != farms.len() {
        log::warn!(
            "Out of {} features read, only {} had a usable boundary.",
            farms.len(),
            usable
        )
    }

    let cloud_coverage = match &config.cloud_catalog_path {
        Some(catalog_path) => {
            log::info!("Reading cloud coverage catalog {:?}", catalog_path);
            let items = read_features_from_geojson(catalog_path)?;
            let coverage = CoverageReport::from_catalog_items(&items);
            log::info!("{:?}", coverage.summary);
            Some(coverage)
        }
        None => None,
    };

    Ok(Report {
        farms,
        cloud_coverage,
    })
}

pub fn write_report(report: &Report, output_filepath: &Path) -> anyhow::Result<()> {
    let contents = serde_yaml::to_string(report)?;
    fs::write(output_filepath, contents)
        .with_context(|| format!("Writing report to {:?}", output_filepath))
}
