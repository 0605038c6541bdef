use geo::Centroid;
use serde_json::Value;

/// A linear ring as `[lng, lat]` coordinates, in input order. Rings are not implicitly closed.
pub type Ring = Vec<geo::Coord>;

/// The rings of a single polygon. The first ring is the outer boundary, subsequent rings are holes.
pub type PolygonRings = Vec<Ring>;

/// A farm boundary parsed from a GeoJSON feature.
///
/// Only areal geometries are supported. The coordinates are kept exactly as they were read, so that
/// malformed rings (unclosed, too short, out of range) can still be inspected by `Boundary::validate`.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
}

impl Boundary {
    /// Parse a boundary from an arbitrary JSON value.
    ///
    /// Returns `None` unless the value is a GeoJSON `Feature` whose geometry is a `Polygon` or a
    /// `MultiPolygon`. A boundary the user has not finished drawing is a normal case, so the reason
    /// for rejecting the value is only logged at debug level.
    pub fn from_json_value(value: &Value) -> Option<Self> {
        if value.get("type").and_then(Value::as_str) != Some("Feature") {
            log::debug!("Value is not a GeoJSON feature");
            return None;
        }
        // Only the geometry matters, other feature members (id, properties, bbox) are ignored.
        let geometry = match value.get("geometry") {
            Some(geometry @ Value::Object(_)) => geometry,
            _ => {
                log::debug!("Feature has no geometry object");
                return None;
            }
        };
        match geojson::Geometry::from_json_value(geometry.clone()) {
            Ok(geometry) => Self::from_geometry(&geometry),
            Err(err) => {
                log::debug!("Feature geometry is not valid GeoJSON: {}", err);
                None
            }
        }
    }

    pub fn from_feature(feature: &geojson::Feature) -> Option<Self> {
        match &feature.geometry {
            Some(geometry) => Self::from_geometry(geometry),
            None => {
                log::debug!("Feature has no geometry");
                None
            }
        }
    }

    pub fn from_geometry(geometry: &geojson::Geometry) -> Option<Self> {
        match &geometry.value {
            geojson::Value::Polygon(rings) => rings_from_positions(rings).map(Boundary::Polygon),
            geojson::Value::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| rings_from_positions(rings))
                .collect::<Option<Vec<PolygonRings>>>()
                .map(Boundary::MultiPolygon),
            _ => {
                log::debug!("Unsupported geometry kind, expected Polygon or MultiPolygon");
                None
            }
        }
    }

    /// The polygons of this boundary. A `Polygon` boundary is a single polygon.
    pub fn polygons(&self) -> &[PolygonRings] {
        match self {
            Boundary::Polygon(rings) => std::slice::from_ref(rings),
            Boundary::MultiPolygon(polygons) => polygons,
        }
    }

    /// All coordinates of all rings of all polygons, flattened.
    pub fn coords(&self) -> impl Iterator<Item = &geo::Coord> {
        self.polygons().iter().flatten().flatten()
    }

    pub fn to_multi_polygon(&self) -> geo::MultiPolygon {
        self.polygons()
            .iter()
            .filter_map(|rings| polygon_from_rings(rings))
            .collect()
    }

    /// Centre point of the boundary, e.g. for weather lookups.
    ///
    /// Boundaries without area fall back to the centroid of their rings or points.
    pub fn center(&self) -> Option<geo::Point> {
        self.to_multi_polygon().centroid()
    }
}

/// Build a `geo::Polygon` from rings. `geo` closes the rings if needed.
fn polygon_from_rings(rings: &PolygonRings) -> Option<geo::Polygon> {
    let (exterior, interiors) = rings.split_first()?;
    Some(geo::Polygon::new(
        geo::LineString::from(exterior.clone()),
        interiors
            .iter()
            .map(|interior| geo::LineString::from(interior.clone()))
            .collect(),
    ))
}

fn rings_from_positions(rings: &[Vec<geojson::Position>]) -> Option<PolygonRings> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|position| coord_from_position(position))
                .collect::<Option<Ring>>()
        })
        .collect()
}

fn coord_from_position(position: &[f64]) -> Option<geo::Coord> {
    match position {
        [x, y, ..] => Some(geo::Coord { x: *x, y: *y }),
        _ => {
            log::debug!("Position {:?} has fewer than two values", position);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::Boundary;

    fn square_feature() -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]
            }
        })
    }

    #[rstest]
    fn test_polygon_is_parsed_as_is() {
        let boundary = Boundary::from_json_value(&json!({
            "type": "Feature",
            "properties": null,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]]
            }
        }))
        .unwrap();
        match &boundary {
            // The unclosed ring must not be closed during parsing.
            Boundary::Polygon(rings) => assert_eq!(rings[0].len(), 4),
            other => panic!("Expected a polygon, got {:?}", other),
        }
        assert_eq!(boundary.polygons().len(), 1);
        assert_eq!(boundary.coords().count(), 4);
    }

    #[rstest]
    fn test_multi_polygon_keeps_every_polygon() {
        let boundary = Boundary::from_json_value(&json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]],
                    [[[5.0, 5.0], [5.0, 6.0], [6.0, 6.0], [5.0, 5.0]]]
                ]
            }
        }))
        .unwrap();
        assert_eq!(boundary.polygons().len(), 2);
        assert_eq!(boundary.to_multi_polygon().0.len(), 2);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!({}))]
    #[case(json!([1, 2, 3]))]
    #[case(json!({"type": "Feature", "properties": {}, "geometry": null}))]
    #[case(json!({"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}))]
    #[case(json!({"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": 5}}))]
    #[case(json!({"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[[1.0], [2.0, 3.0]]]}}))]
    fn test_rejects_unusable_values(#[case] value: serde_json::Value) {
        assert_eq!(Boundary::from_json_value(&value), None);
    }

    #[rstest]
    fn test_center_of_square() {
        let center = Boundary::from_json_value(&square_feature())
            .unwrap()
            .center()
            .unwrap();
        assert_relative_eq!(center.x(), 0.5);
        assert_relative_eq!(center.y(), 0.5);
    }
}
