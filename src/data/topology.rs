//! TopoJSON decoding: shared arcs, optional quantization transform, and
//! conversion of named objects into polygon features or border meshes.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::Point;
use crate::error::{ChartError, ChartResult};

/// Quantization transform; arcs are delta-encoded when present.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> Point {
        Point::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// Geometry identifier; county topologies use numeric FIPS codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum GeometryId {
    Number(i64),
    Text(String),
}

impl GeometryId {
    /// Numeric value of the identifier, parsing text ids like `"01001"`.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopoGeometry {
    #[serde(default)]
    pub id: Option<GeometryId>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(flatten)]
    pub shape: GeometryShape,
}

/// Arc references are indices into `Topology::arcs`; a negative index `i`
/// refers to arc `!i` traversed backwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryShape {
    GeometryCollection { geometries: Vec<TopoGeometry> },
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: IndexMap<String, TopoGeometry>,
}

pub type Ring = Vec<Point>;

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Point),
    MultiPoint(Vec<Point>),
    LineString(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl FeatureGeometry {
    /// SVG path data in the untransformed coordinate space.
    ///
    /// Polygon rings are closed with `Z`; points produce no output.
    #[must_use]
    pub fn path_data(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Point(_) | Self::MultiPoint(_) => {}
            Self::LineString(line) => push_line(&mut out, line, false),
            Self::MultiLineString(lines) => {
                for line in lines {
                    push_line(&mut out, line, false);
                }
            }
            Self::Polygon(rings) => {
                for ring in rings {
                    push_line(&mut out, ring, true);
                }
            }
            Self::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    push_line(&mut out, ring, true);
                }
            }
        }
        out
    }
}

fn push_line(out: &mut String, points: &[Point], closed: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let _ = write!(out, "M{},{}", first.x, first.y);
    let rest = if closed {
        // The closing point duplicates the first one; `Z` draws that edge.
        rest.strip_suffix(std::slice::from_ref(first)).unwrap_or(rest)
    } else {
        rest
    };
    for point in rest {
        let _ = write!(out, "L{},{}", point.x, point.y);
    }
    if closed {
        out.push('Z');
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<GeometryId>,
    pub geometry: FeatureGeometry,
}

impl Feature {
    #[must_use]
    pub fn path_data(&self) -> String {
        self.geometry.path_data()
    }
}

impl Topology {
    fn object(&self, name: &str) -> ChartResult<&TopoGeometry> {
        self.objects
            .get(name)
            .ok_or_else(|| ChartError::InvalidData(format!("topology has no object `{name}`")))
    }

    fn decode_arcs(&self) -> ChartResult<Vec<Vec<Point>>> {
        self.arcs
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|position| -> ChartResult<Point> {
                        let [dx, dy] = position_xy(position)?;
                        Ok(match &self.transform {
                            Some(transform) => {
                                x += dx;
                                y += dy;
                                transform.apply(x, y)
                            }
                            None => Point::new(dx, dy),
                        })
                    })
                    .collect::<ChartResult<Vec<_>>>()
            })
            .collect()
    }

    fn decode_position(&self, position: &[f64]) -> ChartResult<Point> {
        let [x, y] = position_xy(position)?;
        Ok(match &self.transform {
            Some(transform) => transform.apply(x, y),
            None => Point::new(x, y),
        })
    }

    /// Converts the named object into features, one per member when the
    /// object is a geometry collection.
    pub fn features(&self, object_name: &str) -> ChartResult<Vec<Feature>> {
        let object = self.object(object_name)?;
        let arcs = self.decode_arcs()?;
        let mut features = Vec::new();
        self.collect_features(object, &arcs, &mut features)?;
        Ok(features)
    }

    fn collect_features(
        &self,
        geometry: &TopoGeometry,
        arcs: &[Vec<Point>],
        out: &mut Vec<Feature>,
    ) -> ChartResult<()> {
        let converted = match &geometry.shape {
            GeometryShape::GeometryCollection { geometries } => {
                for member in geometries {
                    self.collect_features(member, arcs, out)?;
                }
                return Ok(());
            }
            GeometryShape::Point { coordinates } => {
                FeatureGeometry::Point(self.decode_position(coordinates)?)
            }
            GeometryShape::MultiPoint { coordinates } => FeatureGeometry::MultiPoint(
                coordinates
                    .iter()
                    .map(|position| self.decode_position(position))
                    .collect::<ChartResult<_>>()?,
            ),
            GeometryShape::LineString { arcs: refs } => {
                FeatureGeometry::LineString(stitch_line(arcs, refs)?)
            }
            GeometryShape::MultiLineString { arcs: lines } => FeatureGeometry::MultiLineString(
                lines
                    .iter()
                    .map(|refs| stitch_line(arcs, refs))
                    .collect::<ChartResult<_>>()?,
            ),
            GeometryShape::Polygon { arcs: rings } => FeatureGeometry::Polygon(
                rings
                    .iter()
                    .map(|refs| stitch_ring(arcs, refs))
                    .collect::<ChartResult<_>>()?,
            ),
            GeometryShape::MultiPolygon { arcs: polygons } => FeatureGeometry::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| {
                        rings
                            .iter()
                            .map(|refs| stitch_ring(arcs, refs))
                            .collect::<ChartResult<Vec<_>>>()
                    })
                    .collect::<ChartResult<_>>()?,
            ),
        };
        out.push(Feature {
            id: geometry.id.clone(),
            geometry: converted,
        });
        Ok(())
    }

    /// Every arc used by the named object, each emitted once.
    pub fn mesh(&self, object_name: &str) -> ChartResult<Vec<Vec<Point>>> {
        self.mesh_filtered(object_name, |_, _| true)
    }

    /// Arcs shared by two distinct geometries: interior borders only.
    pub fn interior_mesh(&self, object_name: &str) -> ChartResult<Vec<Vec<Point>>> {
        self.mesh_filtered(object_name, |a, b| !std::ptr::eq(a, b))
    }

    /// Arcs whose first and last referencing geometries pass `filter`.
    ///
    /// Arcs are returned as separate line strings, without stitching.
    pub fn mesh_filtered<P>(&self, object_name: &str, filter: P) -> ChartResult<Vec<Vec<Point>>>
    where
        P: Fn(&TopoGeometry, &TopoGeometry) -> bool,
    {
        let object = self.object(object_name)?;
        let mut owners: Vec<Vec<&TopoGeometry>> = vec![Vec::new(); self.arcs.len()];
        collect_arc_owners(object, &mut owners)?;
        let arcs = self.decode_arcs()?;

        Ok(owners
            .iter()
            .zip(arcs)
            .filter_map(|(geometries, points)| match geometries.as_slice() {
                [] => None,
                [first, .., last] if filter(*first, *last) => Some(points),
                [only] if filter(*only, *only) => Some(points),
                _ => None,
            })
            .collect())
    }
}

fn position_xy(position: &[f64]) -> ChartResult<[f64; 2]> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok([*x, *y]),
        _ => Err(ChartError::InvalidData(
            "topology position must hold two finite numbers".to_owned(),
        )),
    }
}

fn resolve_arc(arcs: &[Vec<Point>], index: i64) -> ChartResult<(usize, bool)> {
    let (resolved, reversed) = if index < 0 { (!index, true) } else { (index, false) };
    let resolved = usize::try_from(resolved)
        .ok()
        .filter(|&value| value < arcs.len())
        .ok_or_else(|| ChartError::InvalidData(format!("arc index {index} out of range")))?;
    Ok((resolved, reversed))
}

fn stitch(arcs: &[Vec<Point>], refs: &[i64]) -> ChartResult<Vec<Point>> {
    let mut points: Vec<Point> = Vec::new();
    for &index in refs {
        let (resolved, reversed) = resolve_arc(arcs, index)?;
        // Consecutive arcs share an endpoint.
        points.pop();
        let arc = &arcs[resolved];
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    Ok(points)
}

fn stitch_line(arcs: &[Vec<Point>], refs: &[i64]) -> ChartResult<Vec<Point>> {
    let mut points = stitch(arcs, refs)?;
    if let Some(&first) = points.first() {
        if points.len() < 2 {
            points.push(first);
        }
    }
    Ok(points)
}

fn stitch_ring(arcs: &[Vec<Point>], refs: &[i64]) -> ChartResult<Ring> {
    let mut points = stitch(arcs, refs)?;
    if let Some(&first) = points.first() {
        while points.len() < 4 {
            points.push(first);
        }
    }
    Ok(points)
}

fn collect_arc_owners<'a>(
    geometry: &'a TopoGeometry,
    owners: &mut [Vec<&'a TopoGeometry>],
) -> ChartResult<()> {
    let refs: Vec<i64> = match &geometry.shape {
        GeometryShape::GeometryCollection { geometries } => {
            for member in geometries {
                collect_arc_owners(member, owners)?;
            }
            return Ok(());
        }
        GeometryShape::Point { .. } | GeometryShape::MultiPoint { .. } => return Ok(()),
        GeometryShape::LineString { arcs } => arcs.clone(),
        GeometryShape::MultiLineString { arcs } | GeometryShape::Polygon { arcs } => {
            arcs.iter().flatten().copied().collect()
        }
        GeometryShape::MultiPolygon { arcs } => arcs.iter().flatten().flatten().copied().collect(),
    };

    for index in refs {
        let resolved = if index < 0 { !index } else { index };
        let owner = usize::try_from(resolved)
            .ok()
            .and_then(|slot| owners.get_mut(slot))
            .ok_or_else(|| ChartError::InvalidData(format!("arc index {index} out of range")))?;
        // A ring that revisits an arc still counts as a single owner.
        if !owner.last().is_some_and(|last| std::ptr::eq(*last, geometry)) {
            owner.push(geometry);
        }
    }
    Ok(())
}
