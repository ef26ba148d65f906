//! Edit polygons and the point-in-polygon test.
//!
//! Polygons are given as an open ring of `(lat, lon)` vertices: the last
//! vertex connects back to the first, and repeating the first vertex at the
//! end is allowed but not required.

use crate::{CoreError, CoreResult, GeoPoint};

/// A validated polygon with at least three vertices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>"))]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    /// Wrap `vertices`, rejecting rings with fewer than three points or any
    /// non-finite vertex.
    pub fn new(vertices: Vec<GeoPoint>) -> CoreResult<Self> {
        if vertices.len() < 3 {
            return Err(CoreError::InvalidPolygon { vertices: vertices.len() });
        }
        for v in &vertices {
            v.validated()?;
        }
        Ok(Self { vertices })
    }

    /// Build from raw `(lat, lon)` pairs, the shape a map client sends.
    pub fn from_lat_lon(points: &[(f64, f64)]) -> CoreResult<Self> {
        Self::new(points.iter().copied().map(GeoPoint::from).collect())
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// `true` if `point` lies inside the polygon.  See [`point_in_polygon`].
    #[inline]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// Axis-aligned bounding box as `(south_west, north_east)` corners.
    pub fn bounding_box(&self) -> (GeoPoint, GeoPoint) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min.lat = min.lat.min(v.lat);
            min.lon = min.lon.min(v.lon);
            max.lat = max.lat.max(v.lat);
            max.lon = max.lon.max(v.lon);
        }
        (min, max)
    }
}

impl TryFrom<Vec<GeoPoint>> for Polygon {
    type Error = CoreError;

    fn try_from(vertices: Vec<GeoPoint>) -> CoreResult<Self> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<GeoPoint> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Even-odd ray casting.
///
/// For every polygon edge whose latitude span contains the point's latitude
/// (half-open: `min < lat <= max`), the longitude where the edge crosses that
/// latitude is computed, and the inside flag toggles when the point's
/// longitude is `<=` the crossing.  Horizontal edges never straddle and
/// contribute nothing.
///
/// Points exactly on the boundary get a deterministic answer that depends on
/// which side of the half-open interval they fall: for an axis-aligned square,
/// the south-west corner is outside and the north-east corner is inside.
/// Fewer than three vertices never contain anything.
pub fn point_in_polygon(point: GeoPoint, vertices: &[GeoPoint]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut p1 = vertices[n - 1];
    for &p2 in vertices {
        let (lo, hi) = if p1.lat < p2.lat { (p1.lat, p2.lat) } else { (p2.lat, p1.lat) };
        let d_lat = p2.lat - p1.lat;
        if lo < point.lat && point.lat <= hi && d_lat != 0.0 {
            let cross_lon = p1.lon + (point.lat - p1.lat) * (p2.lon - p1.lon) / d_lat;
            if point.lon <= cross_lon {
                inside = !inside;
            }
        }
        p1 = p2;
    }
    inside
}
