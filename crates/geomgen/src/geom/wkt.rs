//! Well-known-text rendering (`Display`) for `Geometry`.

use std::fmt;

use super::types::{Coord, Geometry, Polygon};

fn write_seq(f: &mut fmt::Formatter<'_>, cs: &[Coord]) -> fmt::Result {
    write!(f, "(")?;
    for (k, c) in cs.iter().enumerate() {
        if k > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} {}", c.x, c.y)?;
    }
    write!(f, ")")
}

fn write_polygon_body(f: &mut fmt::Formatter<'_>, p: &Polygon) -> fmt::Result {
    write!(f, "(")?;
    for (k, ring) in p.rings().enumerate() {
        if k > 0 {
            write!(f, ", ")?;
        }
        write_seq(f, ring)?;
    }
    write!(f, ")")
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    tag: &str,
    items: &[T],
    mut body: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if items.is_empty() {
        return write!(f, "{tag} EMPTY");
    }
    write!(f, "{tag} (")?;
    for (k, item) in items.iter().enumerate() {
        if k > 0 {
            write!(f, ", ")?;
        }
        body(f, item)?;
    }
    write!(f, ")")
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(c) => write!(f, "POINT ({} {})", c.x, c.y),
            Geometry::MultiPoint(cs) => {
                write_list(f, "MULTIPOINT", cs, |f, c| write!(f, "({} {})", c.x, c.y))
            }
            Geometry::LineString(cs) if cs.is_empty() => write!(f, "LINESTRING EMPTY"),
            Geometry::LineString(cs) => {
                write!(f, "LINESTRING ")?;
                write_seq(f, cs)
            }
            Geometry::MultiLineString(ls) => {
                write_list(f, "MULTILINESTRING", ls, |f, cs| write_seq(f, cs))
            }
            Geometry::Polygon(p) if p.is_empty() => write!(f, "POLYGON EMPTY"),
            Geometry::Polygon(p) => {
                write!(f, "POLYGON ")?;
                write_polygon_body(f, p)
            }
            Geometry::MultiPolygon(ps) => write_list(f, "MULTIPOLYGON", ps, write_polygon_body),
            Geometry::Collection(gs) => {
                write_list(f, "GEOMETRYCOLLECTION", gs, |f, g| write!(f, "{g}"))
            }
        }
    }
}
