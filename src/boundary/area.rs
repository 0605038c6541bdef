use std::collections::HashSet;

use geo::{
    algorithm::orient::{Direction, Orient},
    ChamberlainDuquetteArea, GeodesicArea,
};
use serde::{Deserialize, Serialize};

use super::geometry::{Boundary, PolygonRings, Ring};

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
pub const SQUARE_METERS_PER_ACRE: f64 = 4046.86;

/// Unit for presenting an area. Areas are always computed in square meters.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    SquareMeters,
    #[default]
    Hectares,
    Acres,
}

impl AreaUnit {
    pub fn from_square_meters(&self, square_meters: f64) -> f64 {
        match self {
            AreaUnit::SquareMeters => square_meters,
            AreaUnit::Hectares => square_meters / SQUARE_METERS_PER_HECTARE,
            AreaUnit::Acres => square_meters / SQUARE_METERS_PER_ACRE,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AreaUnit::SquareMeters => "m²",
            AreaUnit::Hectares => "ha",
            AreaUnit::Acres => "ac",
        }
    }
}

/// Formula used to compute the area of a boundary.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaMethod {
    /// Geodesic area on the WGS84 ellipsoid (Karney).
    #[default]
    Geodesic,
    /// Spherical polygon area (Chamberlain & Duquette). Cheaper, overestimates by up to ~0.7%.
    Spherical,
}

impl Boundary {
    /// Area in square meters on the WGS84 ellipsoid.
    pub fn area(&self) -> f64 {
        self.area_with(AreaMethod::default())
    }

    /// Area in square meters: outer rings minus their holes, summed over all polygons.
    ///
    /// The result does not depend on ring winding and is never negative. Polygons whose outer ring
    /// has fewer than three distinct points cannot enclose anything and contribute zero.
    pub fn area_with(&self, method: AreaMethod) -> f64 {
        self.polygons()
            .iter()
            .map(|rings| polygon_area(rings, method))
            .sum()
    }
}

fn polygon_area(rings: &PolygonRings, method: AreaMethod) -> f64 {
    let (exterior, holes) = match rings.split_first() {
        Some((exterior, holes)) if distinct_coord_count(exterior) >= 3 => (exterior, holes),
        _ => return 0.0,
    };
    let holes_area: f64 = holes.iter().map(|hole| ring_area(hole, method)).sum();
    // Holes larger than their outer ring only happen with malformed input.
    (ring_area(exterior, method) - holes_area).max(0.0)
}

/// Unsigned area enclosed by a single ring.
fn ring_area(ring: &Ring, method: AreaMethod) -> f64 {
    let polygon = geo::Polygon::new(geo::LineString::from(ring.clone()), vec![]);
    match method {
        AreaMethod::Spherical => polygon.chamberlain_duquette_unsigned_area(),
        AreaMethod::Geodesic => polygon
            .orient(Direction::Default)
            .geodesic_area_unsigned(),
    }
}

fn distinct_coord_count(ring: &Ring) -> usize {
    ring.iter()
        .map(|coord| (coord.x.to_bits(), coord.y.to_bits()))
        .collect::<HashSet<(u64, u64)>>()
        .len()
}
