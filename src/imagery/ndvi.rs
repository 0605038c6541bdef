use anyhow::anyhow;
use serde::Serialize;

use crate::boundary::BoundingBox;

/// Resolution of the longer side of a requested NDVI image.
pub const DEFAULT_BASE_RESOLUTION: u32 = 1024;

/// Sentinel-2 scene classes for medium and high probability clouds and thin cirrus.
const CLOUD_SCENE_CLASSES: [u8; 3] = [8, 9, 10];

/// Colour channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    fn opaque([r, g, b]: [f64; 3]) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

pub const CLOUD_COLOR: Rgba = Rgba {
    r: 0.7,
    g: 0.7,
    b: 0.7,
    a: 0.6,
};

/// NDVI colour ramp as (exclusive upper bound, colour), from bare soil and water to dense vegetation.
const NDVI_RAMP: [(f64, [f64; 3]); 12] = [
    (-0.5, [0.8, 0.1, 0.1]),
    (-0.3, [0.9, 0.2, 0.2]),
    (-0.1, [1.0, 0.3, 0.3]),
    (0.0, [1.0, 0.5, 0.3]),
    (0.1, [1.0, 0.7, 0.3]),
    (0.2, [1.0, 0.8, 0.3]),
    (0.3, [0.8, 0.9, 0.3]),
    (0.4, [0.6, 0.9, 0.3]),
    (0.5, [0.4, 0.9, 0.3]),
    (0.6, [0.2, 0.8, 0.3]),
    (0.7, [0.1, 0.7, 0.3]),
    (0.8, [0.1, 0.5, 0.3]),
];
const NDVI_RAMP_TOP: [f64; 3] = [0.1, 0.3, 0.3];

/// Normalized difference vegetation index from near-infrared and red reflectance.
/// NaN when both bands are zero.
pub fn ndvi(nir: f64, red: f64) -> f64 {
    (nir - red) / (nir + red)
}

pub fn is_cloud(scene_class: u8) -> bool {
    CLOUD_SCENE_CLASSES.contains(&scene_class)
}

/// Colour for an NDVI value. Values at or above 0.8, and NaN, get the darkest green.
pub fn ndvi_color(value: f64) -> Rgba {
    let rgb = NDVI_RAMP
        .iter()
        .find(|(upper_bound, _)| value < *upper_bound)
        .map_or(NDVI_RAMP_TOP, |(_, rgb)| *rgb);
    Rgba::opaque(rgb)
}

/// Colour of a single pixel given its bands and scene classification.
pub fn pixel_color(nir: f64, red: f64, scene_class: u8) -> Rgba {
    if is_cloud(scene_class) {
        CLOUD_COLOR
    } else {
        ndvi_color(ndvi(nir, red))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Size of the NDVI image for a bounding box, keeping its aspect ratio in degrees.
///
/// The longer side gets `base_resolution` pixels. Boxes so elongated that the shorter side would
/// round to zero pixels are rejected.
pub fn output_dimensions(
    bbox: &BoundingBox,
    base_resolution: u32,
) -> anyhow::Result<ImageDimensions> {
    let (width, height) = (bbox.width().abs(), bbox.height().abs());
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(anyhow!(
            "Bounding box {} has no extent, cannot size an image for it",
            bbox
        ));
    }
    let ratio = width / height;
    let base = base_resolution as f64;
    let dimensions = if ratio >= 1.0 {
        ImageDimensions {
            width: base_resolution,
            height: (base / ratio).round() as u32,
        }
    } else {
        ImageDimensions {
            width: (base * ratio).round() as u32,
            height: base_resolution,
        }
    };
    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(anyhow!(
            "Bounding box {} is too narrow for a {} pixel image",
            bbox,
            base_resolution
        ));
    }
    Ok(dimensions)
}
