use std::fmt;

use serde::Serialize;

use super::geometry::Boundary;

const MIN_RING_POINTS: usize = 4;

/// A problem with a boundary that bounding box and area computations silently tolerate.
///
/// `polygon` and `ring` are zero-based indices; ring 0 is the outer boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryIssue {
    RingNotClosed { polygon: usize, ring: usize },
    RingTooShort { polygon: usize, ring: usize, points: usize },
    LongitudeOutOfRange { polygon: usize, ring: usize, value: f64 },
    LatitudeOutOfRange { polygon: usize, ring: usize, value: f64 },
}

impl fmt::Display for BoundaryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryIssue::RingNotClosed { polygon, ring } => {
                write!(f, "polygon {} ring {} is not closed", polygon, ring)
            }
            BoundaryIssue::RingTooShort {
                polygon,
                ring,
                points,
            } => write!(
                f,
                "polygon {} ring {} has {} points, at least {} are required",
                polygon, ring, points, MIN_RING_POINTS
            ),
            BoundaryIssue::LongitudeOutOfRange {
                polygon,
                ring,
                value,
            } => write!(
                f,
                "polygon {} ring {} has longitude {} outside [-180, 180]",
                polygon, ring, value
            ),
            BoundaryIssue::LatitudeOutOfRange {
                polygon,
                ring,
                value,
            } => write!(
                f,
                "polygon {} ring {} has latitude {} outside [-90, 90]",
                polygon, ring, value
            ),
        }
    }
}

impl Boundary {
    /// Check the ring and coordinate range requirements of GeoJSON polygons.
    ///
    /// At most one longitude and one latitude issue is reported per ring, for the first offending
    /// coordinate.
    pub fn validate(&self) -> Vec<BoundaryIssue> {
        let mut issues = Vec::new();
        for (polygon_idx, rings) in self.polygons().iter().enumerate() {
            for (ring_idx, ring) in rings.iter().enumerate() {
                if ring.len() < MIN_RING_POINTS {
                    issues.push(BoundaryIssue::RingTooShort {
                        polygon: polygon_idx,
                        ring: ring_idx,
                        points: ring.len(),
                    });
                }
                if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
                    if first != last {
                        issues.push(BoundaryIssue::RingNotClosed {
                            polygon: polygon_idx,
                            ring: ring_idx,
                        });
                    }
                }
                if let Some(coord) = ring.iter().find(|coord| !(-180.0..=180.0).contains(&coord.x)) {
                    issues.push(BoundaryIssue::LongitudeOutOfRange {
                        polygon: polygon_idx,
                        ring: ring_idx,
                        value: coord.x,
                    });
                }
                if let Some(coord) = ring.iter().find(|coord| !(-90.0..=90.0).contains(&coord.y)) {
                    issues.push(BoundaryIssue::LatitudeOutOfRange {
                        polygon: polygon_idx,
                        ring: ring_idx,
                        value: coord.y,
                    });
                }
            }
        }
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::BoundaryIssue;
    use crate::boundary::geometry::{Boundary, Ring};

    fn ring(points: &[(f64, f64)]) -> Ring {
        points.iter().map(|&(x, y)| geo::Coord { x, y }).collect()
    }

    #[rstest]
    fn test_valid_boundary() {
        let boundary = Boundary::MultiPolygon(vec![
            vec![ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)])],
            vec![ring(&[(-180.0, -90.0), (180.0, -90.0), (180.0, 90.0), (-180.0, -90.0)])],
        ]);
        assert!(boundary.validate().is_empty());
        assert!(boundary.is_valid());
    }

    #[rstest]
    #[case(
        ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]),
        vec![BoundaryIssue::RingNotClosed { polygon: 0, ring: 0 }]
    )]
    #[case(
        ring(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
        vec![BoundaryIssue::RingTooShort { polygon: 0, ring: 0, points: 3 }]
    )]
    #[case(
        ring(&[]),
        vec![BoundaryIssue::RingTooShort { polygon: 0, ring: 0, points: 0 }]
    )]
    #[case(
        ring(&[(0.0, 0.0), (181.0, 1.0), (190.0, 1.0), (0.0, 0.0)]),
        vec![BoundaryIssue::LongitudeOutOfRange { polygon: 0, ring: 0, value: 181.0 }]
    )]
    #[case(
        ring(&[(0.0, -91.0), (0.0, 1.0), (1.0, 1.0), (0.0, -91.0)]),
        vec![BoundaryIssue::LatitudeOutOfRange { polygon: 0, ring: 0, value: -91.0 }]
    )]
    fn test_issues(#[case] exterior: Ring, #[case] expected: Vec<BoundaryIssue>) {
        assert_eq!(Boundary::Polygon(vec![exterior]).validate(), expected);
    }

    #[rstest]
    fn test_issue_indices_point_at_the_ring() {
        let valid = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]);
        let unclosed_hole = ring(&[(0.2, 0.5), (0.3, 0.8), (0.4, 0.8), (0.2, 0.6)]);
        let boundary = Boundary::MultiPolygon(vec![
            vec![valid.clone()],
            vec![valid, unclosed_hole],
        ]);
        let issues = boundary.validate();
        assert_eq!(
            issues,
            vec![BoundaryIssue::RingNotClosed { polygon: 1, ring: 1 }]
        );
        assert_eq!(issues[0].to_string(), "polygon 1 ring 1 is not closed");
    }
}
