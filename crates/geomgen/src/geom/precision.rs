//! Fixed-precision grid and geometry precision reduction.
//!
//! `snap(c) = round(c * scale) / scale` per axis. Coordinates that land on the
//! same grid point compare equal afterwards, which is what lets tiles placed
//! by independent transforms share edges exactly.

use super::types::{Coord, Geometry, Polygon};

/// Integer grid coordinate (`round(c * scale)`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPt {
    pub x: i64,
    pub y: i64,
}

/// Precision grid with `scale` cells per unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecisionModel {
    scale: f64,
}

impl PrecisionModel {
    pub fn new(scale: f64) -> Self {
        debug_assert!(
            scale.is_finite() && scale > 0.0,
            "precision scale must be finite and positive"
        );
        Self { scale }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Grid spacing `1 / scale`.
    #[inline]
    pub fn resolution(&self) -> f64 {
        1.0 / self.scale
    }

    #[inline]
    pub fn snap_ordinate(&self, v: f64) -> f64 {
        // `+ 0.0` folds -0.0 into 0.0 so equal grid points share a bit pattern.
        (v * self.scale).round() / self.scale + 0.0
    }

    #[inline]
    pub fn snap(&self, c: Coord) -> Coord {
        Coord::new(self.snap_ordinate(c.x), self.snap_ordinate(c.y))
    }

    #[inline]
    pub fn to_grid(&self, c: Coord) -> GridPt {
        GridPt {
            x: (c.x * self.scale).round() as i64,
            y: (c.y * self.scale).round() as i64,
        }
    }

    #[inline]
    pub fn from_grid(&self, g: GridPt) -> Coord {
        Coord::new(g.x as f64 / self.scale + 0.0, g.y as f64 / self.scale + 0.0)
    }

    /// Snap every coordinate of `g` onto the grid.
    ///
    /// Consecutive repeats are removed; lines collapsing below two coordinates
    /// and rings collapsing below four are dropped (a collapsed polygon
    /// exterior drops the whole polygon). Applying it twice equals applying it once.
    pub fn reduce(&self, g: &Geometry) -> Geometry {
        match g {
            Geometry::Point(c) => Geometry::Point(self.snap(*c)),
            Geometry::MultiPoint(cs) => {
                Geometry::MultiPoint(cs.iter().map(|c| self.snap(*c)).collect())
            }
            Geometry::LineString(cs) => {
                Geometry::LineString(self.reduce_seq(cs, 2).unwrap_or_default())
            }
            Geometry::MultiLineString(ls) => Geometry::MultiLineString(
                ls.iter().filter_map(|cs| self.reduce_seq(cs, 2)).collect(),
            ),
            Geometry::Polygon(p) => {
                Geometry::Polygon(self.reduce_polygon(p).unwrap_or_default())
            }
            Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(
                ps.iter().filter_map(|p| self.reduce_polygon(p)).collect(),
            ),
            Geometry::Collection(gs) => {
                Geometry::Collection(gs.iter().map(|g| self.reduce(g)).collect())
            }
        }
    }

    fn reduce_seq(&self, cs: &[Coord], min_len: usize) -> Option<Vec<Coord>> {
        let mut out: Vec<Coord> = cs.iter().map(|c| self.snap(*c)).collect();
        out.dedup();
        (out.len() >= min_len).then_some(out)
    }

    fn reduce_polygon(&self, p: &Polygon) -> Option<Polygon> {
        let exterior = self.reduce_seq(&p.exterior, 4)?;
        let interiors = p
            .interiors
            .iter()
            .filter_map(|r| self.reduce_seq(r, 4))
            .collect();
        Some(Polygon::new(exterior, interiors))
    }
}
