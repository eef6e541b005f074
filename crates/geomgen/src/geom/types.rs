//! Geometry model: coordinates, envelopes, polygons and the `Geometry` container.
//!
//! - `Coord`: plain `Vector2<f64>`; no identity beyond value equality.
//! - `Envelope`: axis-aligned rectangle with half-open `contains`.
//! - `Polygon`: closed exterior ring plus closed holes.
//! - `Geometry`: immutable container over points, lines, polygons and collections.
//!
//! Code cross-refs: `precision::PrecisionModel::reduce`, `affine::AffineTransform::transform`,
//! `noding::union_lines`, `polygonize::polygonize`.

use std::collections::HashMap;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg::DEFAULT_EXTENT;
use crate::error::GenError;

/// A 2D coordinate.
pub type Coord = Vector2<f64>;

/// Axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Build from bounds; swapped bounds are reordered.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Smallest envelope covering all coordinates, `None` for an empty input.
    pub fn of_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Option<Self> {
        let mut it = coords.into_iter();
        let first = it.next()?;
        let mut env = Self::new(first.x, first.y, first.x, first.y);
        for c in it {
            env.expand_to_include(c);
        }
        Some(env)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn centre(&self) -> Coord {
        Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Zero width or zero height. Rejection samplers never terminate on such extents.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Half-open membership: `min <= p < max` on both axes.
    #[inline]
    pub fn contains(&self, p: Coord) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }

    /// Closed membership: `min <= p <= max` on both axes.
    #[inline]
    pub fn covers(&self, p: Coord) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    pub fn covers_envelope(&self, other: &Envelope) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn expand_to_include(&mut self, c: Coord) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    /// The rectangle as a counter-clockwise polygon.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(
            vec![
                Coord::new(self.min_x, self.min_y),
                Coord::new(self.max_x, self.min_y),
                Coord::new(self.max_x, self.max_y),
                Coord::new(self.min_x, self.max_y),
                Coord::new(self.min_x, self.min_y),
            ],
            Vec::new(),
        )
    }
}

/// Parses `min_x,min_y,max_x,max_y`.
impl FromStr for Envelope {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<f64> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| GenError::invalid(format!("bad extent ordinate `{part}`")))
            })
            .collect::<Result<_, _>>()?;
        match vals.as_slice() {
            [x1, y1, x2, y2] => Ok(Envelope::new(*x1, *y1, *x2, *y2)),
            _ => Err(GenError::invalid(
                "extent needs four values: min_x,min_y,max_x,max_y",
            )),
        }
    }
}

/// Polygon with a closed exterior ring and closed interior rings (holes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Coord>,
    pub interiors: Vec<Vec<Coord>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Coord>, interiors: Vec<Vec<Coord>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Exterior area minus hole areas (orientation-agnostic).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| ring_signed_area(r).abs()).sum();
        ring_signed_area(&self.exterior).abs() - holes
    }

    /// Inside the exterior and outside every hole (boundary behaviour unspecified).
    pub fn contains_point(&self, p: Coord) -> bool {
        point_in_ring(p, &self.exterior) && !self.interiors.iter().any(|h| point_in_ring(p, h))
    }

    pub fn rings(&self) -> impl Iterator<Item = &Vec<Coord>> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn ring_signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        acc += p.x * q.y - q.x * p.y;
    }
    acc * 0.5
}

/// Even-odd crossing test.
pub fn point_in_ring(p: Coord, ring: &[Coord]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Immutable geometry container.
///
/// Line strings and rings are stored as coordinate sequences; rings repeat the
/// first coordinate at the end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// The empty geometry (an empty collection).
    pub fn empty() -> Self {
        Geometry::Collection(Vec::new())
    }

    pub fn for_each_coord<F: FnMut(Coord)>(&self, f: &mut F) {
        match self {
            Geometry::Point(c) => f(*c),
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => cs.iter().for_each(|c| f(*c)),
            Geometry::MultiLineString(ls) => ls.iter().flatten().for_each(|c| f(*c)),
            Geometry::Polygon(p) => p.rings().flatten().for_each(|c| f(*c)),
            Geometry::MultiPolygon(ps) => ps
                .iter()
                .flat_map(|p| p.rings())
                .flatten()
                .for_each(|c| f(*c)),
            Geometry::Collection(gs) => {
                for g in gs {
                    g.for_each_coord(&mut *f);
                }
            }
        }
    }

    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.num_coords());
        self.for_each_coord(&mut |c| out.push(c));
        out
    }

    pub fn num_coords(&self) -> usize {
        let mut n = 0usize;
        self.for_each_coord(&mut |_| n += 1);
        n
    }

    pub fn is_empty(&self) -> bool {
        self.num_coords() == 0
    }

    /// Bounding envelope, `None` when empty.
    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::of_coords(self.coords())
    }

    /// New geometry with `f` applied to every coordinate; structure is preserved.
    pub fn map_coords<F: Fn(Coord) -> Coord>(&self, f: &F) -> Geometry {
        let map_seq = |cs: &Vec<Coord>| cs.iter().map(|c| f(*c)).collect::<Vec<_>>();
        let map_poly = |p: &Polygon| Polygon {
            exterior: map_seq(&p.exterior),
            interiors: p.interiors.iter().map(map_seq).collect(),
        };
        match self {
            Geometry::Point(c) => Geometry::Point(f(*c)),
            Geometry::MultiPoint(cs) => Geometry::MultiPoint(map_seq(cs)),
            Geometry::LineString(cs) => Geometry::LineString(map_seq(cs)),
            Geometry::MultiLineString(ls) => {
                Geometry::MultiLineString(ls.iter().map(map_seq).collect())
            }
            Geometry::Polygon(p) => Geometry::Polygon(map_poly(p)),
            Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(ps.iter().map(map_poly).collect()),
            Geometry::Collection(gs) => {
                Geometry::Collection(gs.iter().map(|g| g.map_coords(f)).collect())
            }
        }
    }

    /// Polygonal: a non-empty polygon, multipolygon, or collection of polygonal parts.
    pub fn is_polygonal(&self) -> bool {
        match self {
            Geometry::Polygon(p) => !p.is_empty(),
            Geometry::MultiPolygon(ps) => !ps.is_empty(),
            Geometry::Collection(gs) => !gs.is_empty() && gs.iter().all(|g| g.is_polygonal()),
            _ => false,
        }
    }

    /// All polygons, flattened.
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            Geometry::Polygon(p) => vec![p],
            Geometry::MultiPolygon(ps) => ps.iter().collect(),
            Geometry::Collection(gs) => gs.iter().flat_map(|g| g.polygons()).collect(),
            _ => Vec::new(),
        }
    }

    /// Sum of polygon areas; zero for points and lines.
    pub fn area(&self) -> f64 {
        self.polygons().iter().map(|p| p.area()).sum()
    }

    /// Line strings and polygon rings as coordinate sequences.
    pub fn linework(&self) -> Vec<&Vec<Coord>> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::LineString(cs) => vec![cs],
            Geometry::MultiLineString(ls) => ls.iter().collect(),
            Geometry::Polygon(p) => p.rings().collect(),
            Geometry::MultiPolygon(ps) => ps.iter().flat_map(|p| p.rings()).collect(),
            Geometry::Collection(gs) => gs.iter().flat_map(|g| g.linework()).collect(),
        }
    }

    /// Every two-point segment of the linework.
    pub fn segments(&self) -> Vec<(Coord, Coord)> {
        self.linework()
            .into_iter()
            .flat_map(|cs| cs.windows(2).map(|w| (w[0], w[1])))
            .collect()
    }

    /// Topological boundary.
    ///
    /// - Polygonal: the rings as lines (a single ring comes back as a `LineString`).
    /// - Lineal: endpoints of open lines under the mod-2 rule.
    /// - Puntal: empty.
    pub fn boundary(&self) -> Geometry {
        match self {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
                let mut rings: Vec<Vec<Coord>> =
                    self.linework().into_iter().cloned().collect();
                if rings.len() == 1 {
                    Geometry::LineString(rings.remove(0))
                } else {
                    Geometry::MultiLineString(rings)
                }
            }
            Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                let mut counts: HashMap<(u64, u64), (Coord, usize)> = HashMap::new();
                let mut order = Vec::new();
                for line in self.linework() {
                    let (Some(first), Some(last)) = (line.first(), line.last()) else {
                        continue;
                    };
                    if first == last {
                        continue;
                    }
                    for c in [*first, *last] {
                        let key = coord_key(c);
                        let entry = counts.entry(key).or_insert_with(|| {
                            order.push(key);
                            (c, 0)
                        });
                        entry.1 += 1;
                    }
                }
                let pts = order
                    .into_iter()
                    .filter_map(|k| counts.get(&k).filter(|(_, n)| n % 2 == 1).map(|(c, _)| *c))
                    .collect();
                Geometry::MultiPoint(pts)
            }
            Geometry::Point(_) | Geometry::MultiPoint(_) => Geometry::empty(),
            Geometry::Collection(gs) => {
                build_geometry(gs.iter().map(|g| g.boundary()).filter(|g| !g.is_empty()).collect())
            }
        }
    }
}

/// Hashable key for an exact coordinate (negative zero folded into zero).
#[inline]
pub(crate) fn coord_key(c: Coord) -> (u64, u64) {
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}

/// Combine parts into the most specific geometry type.
///
/// - no parts → empty collection
/// - one part → that part
/// - all points / all line strings / all polygons → the matching multi type
/// - anything else → collection
pub fn build_geometry(mut parts: Vec<Geometry>) -> Geometry {
    if parts.len() <= 1 {
        return parts.pop().unwrap_or_else(Geometry::empty);
    }
    if parts.iter().all(|g| matches!(g, Geometry::Point(_))) {
        return Geometry::MultiPoint(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(c) => Some(c),
                    _ => None,
                })
                .collect(),
        );
    }
    if parts.iter().all(|g| matches!(g, Geometry::LineString(_))) {
        return Geometry::MultiLineString(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(cs) => Some(cs),
                    _ => None,
                })
                .collect(),
        );
    }
    if parts.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
        return Geometry::MultiPolygon(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .collect(),
        );
    }
    Geometry::Collection(parts)
}

/// Envelope of `g`, or `DEFAULT_EXTENT` when there is no geometry or it is empty.
pub fn envelope_or_default(g: Option<&Geometry>) -> Envelope {
    g.and_then(|g| g.envelope()).unwrap_or(DEFAULT_EXTENT)
}
