use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::{
    boundary::{AreaMethod, AreaUnit},
    imagery::ndvi::DEFAULT_BASE_RESOLUTION,
};

/// Location used when a farm boundary cannot provide one, e.g. to centre a map or look up weather.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MapCenter {
    pub lon: f64,
    pub lat: f64,
}

impl From<geo::Point> for MapCenter {
    fn from(point: geo::Point) -> Self {
        Self {
            lon: point.x(),
            lat: point.y(),
        }
    }
}

fn default_ndvi_base_resolution() -> u32 {
    DEFAULT_BASE_RESOLUTION
}

#[derive(Deserialize, Debug)]
pub struct Config {
    /// GeoJSON file with farm boundaries, either a FeatureCollection or a single Feature.
    pub boundaries_geojson_path: PathBuf,
    /// Where to write the YAML report. Nothing is written if absent.
    pub report_path: Option<PathBuf>,
    #[serde(default)]
    pub area_unit: AreaUnit,
    #[serde(default)]
    pub area_method: AreaMethod,
    #[serde(default)]
    pub map_center: MapCenter,
    #[serde(default = "default_ndvi_base_resolution")]
    pub ndvi_base_resolution: u32,
    /// STAC item collection with cloud coverage of recent acquisitions.
    pub cloud_catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn load(filepath: &Path) -> anyhow::Result<Self> {
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let config_contents = read_to_string(filepath)
            .with_context(|| format!("Reading config file {:?}", filepath))?;
        serde_yaml::from_str(&config_contents)
            .with_context(|| format!("Parsing config file {:?}", filepath))
    }
}
