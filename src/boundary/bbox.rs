use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use super::geometry::Boundary;

/// Axis-aligned bounding box in geographic coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Smallest box containing all given coordinates, or `None` if there are none.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a geo::Coord>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let first = coords.next()?;
        let initial = Self {
            min_lng: first.x,
            min_lat: first.y,
            max_lng: first.x,
            max_lat: first.y,
        };
        Some(coords.fold(initial, |bbox, coord| bbox.expanded_to(coord)))
    }

    fn expanded_to(self, coord: &geo::Coord) -> Self {
        Self {
            min_lng: self.min_lng.min(coord.x),
            min_lat: self.min_lat.min(coord.y),
            max_lng: self.max_lng.max(coord.x),
            max_lat: self.max_lat.max(coord.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn contains(&self, coord: &geo::Coord) -> bool {
        (self.min_lng..=self.max_lng).contains(&coord.x)
            && (self.min_lat..=self.max_lat).contains(&coord.y)
    }
}

/// Formats as `minLng,minLat,maxLng,maxLat`, the format imagery and weather providers take as a
/// query parameter. Values are written at full precision and never in scientific notation.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Adding 0.0 turns -0.0 into 0.0, which would otherwise print as "-0".
        write!(
            f,
            "{},{},{},{}",
            self.min_lng + 0.0,
            self.min_lat + 0.0,
            self.max_lng + 0.0,
            self.max_lat + 0.0
        )
    }
}

/// Parses a `minX,minY,maxX,maxY` query parameter. The corners may be given in any order.
impl FromStr for BoundingBox {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let values = s
            .split(',')
            .map(|value| value.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|err| anyhow!("Invalid bbox format '{}': {}", s, err))?;
        let [x1, y1, x2, y2] = <[f64; 4]>::try_from(values).map_err(|values| {
            anyhow!(
                "Invalid bbox format '{}': expected 4 values, found {}",
                s,
                values.len()
            )
        })?;
        if [x1, y1, x2, y2].iter().any(|value| !value.is_finite()) {
            return Err(anyhow!("Invalid bbox format '{}': values must be finite", s));
        }
        Ok(Self {
            min_lng: x1.min(x2),
            min_lat: y1.min(y2),
            max_lng: x1.max(x2),
            max_lat: y1.max(y2),
        })
    }
}

impl Boundary {
    /// Bounding box over every ring of every polygon. `None` if the boundary has no coordinates.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_coords(self.coords())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::BoundingBox;
    use crate::boundary::geometry::Boundary;

    #[rstest]
    #[case("0,0,1,1", BoundingBox { min_lng: 0.0, min_lat: 0.0, max_lng: 1.0, max_lat: 1.0 })]
    #[case(" 13.4, 52.5 ,13.5,52.6", BoundingBox { min_lng: 13.4, min_lat: 52.5, max_lng: 13.5, max_lat: 52.6 })]
    #[case("3,4,1,2", BoundingBox { min_lng: 1.0, min_lat: 2.0, max_lng: 3.0, max_lat: 4.0 })]
    #[case("-10.5,-20,10.5,20", BoundingBox { min_lng: -10.5, min_lat: -20.0, max_lng: 10.5, max_lat: 20.0 })]
    fn test_parse_bbox(#[case] input: &str, #[case] expected: BoundingBox) {
        assert_eq!(input.parse::<BoundingBox>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1,2,3")]
    #[case("1,2,3,4,5")]
    #[case("a,b,c,d")]
    #[case("1,2,,4")]
    #[case("NaN,0,1,1")]
    #[case("0,0,inf,1")]
    fn test_parse_invalid_bbox(#[case] input: &str) {
        assert!(input.parse::<BoundingBox>().is_err());
    }

    #[rstest]
    fn test_display_round_trips_through_parse() {
        let bbox = BoundingBox {
            min_lng: -73.9857,
            min_lat: 40.7484,
            max_lng: -73.9,
            max_lat: 40.8,
        };
        assert_eq!(bbox.to_string(), "-73.9857,40.7484,-73.9,40.8");
        assert_eq!(bbox.to_string().parse::<BoundingBox>().unwrap(), bbox);
    }

    #[rstest]
    fn test_display_has_no_scientific_notation() {
        let bbox = BoundingBox {
            min_lng: 1e-7,
            min_lat: 2e-7,
            max_lng: 1e21,
            max_lat: 0.1 + 0.2,
        };
        assert_eq!(
            bbox.to_string(),
            "0.0000001,0.0000002,1000000000000000000000,0.30000000000000004"
        );
    }

    #[rstest]
    fn test_display_writes_negative_zero_as_zero() {
        let bbox = BoundingBox {
            min_lng: -0.0,
            min_lat: -0.0,
            max_lng: 1.0,
            max_lat: -0.0,
        };
        assert_eq!(bbox.to_string(), "0,0,1,0");
    }

    #[rstest]
    fn test_every_point_lies_inside_the_box() {
        let boundary = Boundary::Polygon(vec![vec![
            geo::Coord { x: 10.2, y: -3.5 },
            geo::Coord { x: 11.7, y: -2.25 },
            geo::Coord { x: 10.9, y: -1.0 },
            geo::Coord { x: 9.4, y: -2.0 },
            geo::Coord { x: 10.2, y: -3.5 },
        ]]);
        let bbox = boundary.bounding_box().unwrap();
        assert!(bbox.min_lng <= bbox.max_lng);
        assert!(bbox.min_lat <= bbox.max_lat);
        assert!(boundary.coords().all(|coord| bbox.contains(coord)));
        assert_eq!(bbox.to_string(), "9.4,-3.5,11.7,-1");
    }

    #[rstest]
    fn test_empty_boundary_has_no_box() {
        assert_eq!(Boundary::Polygon(vec![]).bounding_box(), None);
        assert_eq!(Boundary::MultiPolygon(vec![vec![vec![]]]).bounding_box(), None);
    }
}
