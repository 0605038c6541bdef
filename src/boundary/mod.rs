//! Bounding boxes and areas of farm boundaries drawn as GeoJSON features.
//!
//! The free functions in this module accept any JSON value and never fail: a missing or malformed
//! boundary yields `None` or `0.0`, which callers treat as "boundary not usable yet".

pub mod area;
pub mod bbox;
pub mod geometry;
pub mod validation;

pub use area::{AreaMethod, AreaUnit};
pub use bbox::BoundingBox;
pub use geometry::Boundary;
pub use validation::BoundaryIssue;

/// Bounding box of a `Polygon` or `MultiPolygon` feature as `minLng,minLat,maxLng,maxLat`.
pub fn bounding_box(feature: &serde_json::Value) -> Option<String> {
    Boundary::from_json_value(feature)?
        .bounding_box()
        .map(|bbox| bbox.to_string())
}

/// Area of a `Polygon` or `MultiPolygon` feature in square meters, `0.0` if unusable.
pub fn area(feature: &serde_json::Value) -> f64 {
    Boundary::from_json_value(feature).map_or(0.0, |boundary| boundary.area())
}
