//! Union of line networks into a fully noded set of segments.
//!
//! Model
//! - Every segment is moved onto the integer precision grid.
//! - Segments are split at every shared point: proper crossings, T-junctions
//!   and collinear overlaps. Orientation tests are exact (`i128`).
//! - New crossing nodes are rounded to the grid; zero-length pieces vanish and
//!   duplicates merge regardless of direction.
//!
//! Limitation: rounding a proper crossing can nudge it off the exact segment
//! lines (no full snap rounding). The rounded node always stays within the
//! closed span of both segments, possibly landing on an endpoint. Split points
//! outside a segment's open span are dropped, which only absorbs floating-point
//! error in the crossing parameter.

use std::collections::BTreeSet;

use super::precision::{GridPt, PrecisionModel};
use super::types::Geometry;

type GridSeg = (GridPt, GridPt);

/// Union all linework in `parts` (polygon rings included) into a noded
/// `MultiLineString` of two-point segments, sorted for determinism.
pub fn union_lines(parts: &[Geometry], pm: &PrecisionModel) -> Geometry {
    let mut segs: Vec<GridSeg> = Vec::new();
    for g in parts {
        for (a, b) in g.segments() {
            let (ga, gb) = (pm.to_grid(a), pm.to_grid(b));
            if ga != gb {
                segs.push((ga, gb));
            }
        }
    }
    let noded = node_segments(&segs);
    tracing::debug!(input = segs.len(), noded = noded.len(), "union_lines");
    Geometry::MultiLineString(
        noded
            .into_iter()
            .map(|(a, b)| vec![pm.from_grid(a), pm.from_grid(b)])
            .collect(),
    )
}

fn node_segments(segs: &[GridSeg]) -> BTreeSet<GridSeg> {
    let mut splits: Vec<Vec<GridPt>> = segs.iter().map(|&(a, b)| vec![a, b]).collect();

    // Sweep along x: only segments whose x-spans overlap can meet.
    let mut order: Vec<usize> = (0..segs.len()).collect();
    order.sort_by_key(|&i| min_x(segs[i]));
    for (k, &i) in order.iter().enumerate() {
        let a = segs[i];
        let a_max_x = max_x(a);
        for &j in &order[k + 1..] {
            let b = segs[j];
            if min_x(b) > a_max_x {
                break;
            }
            if !boxes_overlap(a, b) {
                continue;
            }
            for node in shared_nodes(a, b) {
                splits[i].push(node);
                splits[j].push(node);
            }
        }
    }

    let mut out = BTreeSet::new();
    for (&(a, b), pts) in segs.iter().zip(splits) {
        out.extend(split_segment(a, b, pts));
    }
    out
}

/// Pieces of `a → b` cut at `pts`, in order along the segment. Points that do not
/// project strictly inside the span are ignored unless they are the endpoints.
fn split_segment(a: GridPt, b: GridPt, mut pts: Vec<GridPt>) -> Vec<GridSeg> {
    let len2 = dot(a, b, b);
    pts.retain(|&p| p == a || p == b || (0 < dot(a, b, p) && dot(a, b, p) < len2));
    pts.sort_by_key(|&p| dot(a, b, p));
    pts.dedup();
    pts.windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| normalized(w[0], w[1]))
        .collect()
}

/// Points lying on both segments (at most two, more only in collinear overlap with
/// repeated endpoints).
fn shared_nodes(a: GridSeg, b: GridSeg) -> Vec<GridPt> {
    let (a0, a1) = a;
    let (b0, b1) = b;
    let o1 = orient(a0, a1, b0);
    let o2 = orient(a0, a1, b1);
    let o3 = orient(b0, b1, a0);
    let o4 = orient(b0, b1, a1);

    let mut nodes = Vec::new();
    if o1 == 0 && o2 == 0 {
        // Collinear: endpoints of one inside the span of the other.
        for p in [a0, a1] {
            if within_box(b, p) {
                nodes.push(p);
            }
        }
        for p in [b0, b1] {
            if within_box(a, p) {
                nodes.push(p);
            }
        }
        return nodes;
    }
    if o1 * o2 > 0 || o3 * o4 > 0 {
        return nodes;
    }
    if o1 == 0 {
        nodes.push(b0);
    }
    if o2 == 0 {
        nodes.push(b1);
    }
    if o3 == 0 {
        nodes.push(a0);
    }
    if o4 == 0 {
        nodes.push(a1);
    }
    if nodes.is_empty() {
        nodes.push(proper_crossing(a, b));
    }
    nodes
}

/// Crossing point of two properly intersecting segments, rounded to the grid.
fn proper_crossing(a: GridSeg, b: GridSeg) -> GridPt {
    let (ax, ay) = (a.0.x as f64, a.0.y as f64);
    let (dax, day) = ((a.1.x - a.0.x) as f64, (a.1.y - a.0.y) as f64);
    let (dbx, dby) = ((b.1.x - b.0.x) as f64, (b.1.y - b.0.y) as f64);
    let (wx, wy) = (b.0.x as f64 - ax, b.0.y as f64 - ay);
    let denom = dax * dby - day * dbx;
    let t = (wx * dby - wy * dbx) / denom;
    GridPt {
        x: (ax + t * dax).round() as i64,
        y: (ay + t * day).round() as i64,
    }
}

/// Sign of the turn `p → q → r`.
#[inline]
fn orient(p: GridPt, q: GridPt, r: GridPt) -> i32 {
    let v = (q.x - p.x) as i128 * (r.y - p.y) as i128 - (q.y - p.y) as i128 * (r.x - p.x) as i128;
    v.signum() as i32
}

/// Projection of `p - a` onto `b - a` (unnormalized).
#[inline]
fn dot(a: GridPt, b: GridPt, p: GridPt) -> i128 {
    (p.x - a.x) as i128 * (b.x - a.x) as i128 + (p.y - a.y) as i128 * (b.y - a.y) as i128
}

#[inline]
fn min_x(s: GridSeg) -> i64 {
    s.0.x.min(s.1.x)
}

#[inline]
fn max_x(s: GridSeg) -> i64 {
    s.0.x.max(s.1.x)
}

#[inline]
fn within_box(s: GridSeg, p: GridPt) -> bool {
    p.x >= s.0.x.min(s.1.x)
        && p.x <= s.0.x.max(s.1.x)
        && p.y >= s.0.y.min(s.1.y)
        && p.y <= s.0.y.max(s.1.y)
}

#[inline]
fn boxes_overlap(a: GridSeg, b: GridSeg) -> bool {
    a.0.x.min(a.1.x) <= b.0.x.max(b.1.x)
        && b.0.x.min(b.1.x) <= a.0.x.max(a.1.x)
        && a.0.y.min(a.1.y) <= b.0.y.max(b.1.y)
        && b.0.y.min(b.1.y) <= a.0.y.max(a.1.y)
}

#[inline]
fn normalized(p: GridPt, q: GridPt) -> GridSeg {
    if p <= q {
        (p, q)
    } else {
        (q, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coord;

    fn line(pts: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(pts.iter().map(|&(x, y)| Coord::new(x, y)).collect())
    }

    fn seg_count(g: &Geometry) -> usize {
        match g {
            Geometry::MultiLineString(ls) => ls.len(),
            _ => panic!("expected MultiLineString"),
        }
    }

    #[test]
    fn crossing_lines_split_into_four() {
        let pm = PrecisionModel::new(10_000.0);
        let g = union_lines(
            &[line(&[(0.0, 0.0), (2.0, 2.0)]), line(&[(0.0, 2.0), (2.0, 0.0)])],
            &pm,
        );
        assert_eq!(seg_count(&g), 4);
        assert!(g.coords().contains(&Coord::new(1.0, 1.0)));
    }

    #[test]
    fn t_junction_splits_the_through_line() {
        let pm = PrecisionModel::new(10_000.0);
        let g = union_lines(
            &[line(&[(0.0, 0.0), (2.0, 0.0)]), line(&[(1.0, 0.0), (1.0, 1.0)])],
            &pm,
        );
        assert_eq!(seg_count(&g), 3);
    }

    #[test]
    fn collinear_overlap_and_duplicates_merge() {
        let pm = PrecisionModel::new(10_000.0);
        let g = union_lines(
            &[
                line(&[(0.0, 0.0), (2.0, 0.0)]),
                line(&[(1.0, 0.0), (3.0, 0.0)]),
                line(&[(3.0, 0.0), (1.0, 0.0)]),
            ],
            &pm,
        );
        // 0-1, 1-2, 2-3
        assert_eq!(seg_count(&g), 3);
    }

    fn gp(x: i64, y: i64) -> GridPt {
        GridPt { x, y }
    }

    #[test]
    fn split_points_off_the_span_are_ignored() {
        let (a, b) = (gp(0, 0), gp(10, 0));
        let pieces = split_segment(a, b, vec![a, b, gp(11, 0), gp(-1, 0), gp(0, 3), gp(5, 0)]);
        assert_eq!(pieces, vec![(gp(0, 0), gp(5, 0)), (gp(5, 0), gp(10, 0))]);

        // Reversed direction orders pieces from `a` and normalizes each.
        let pieces = split_segment(b, a, vec![b, a, gp(12, 0), gp(5, 0)]);
        assert_eq!(pieces, vec![(gp(5, 0), gp(10, 0)), (gp(0, 0), gp(5, 0))]);
    }

    #[test]
    fn crossing_rounded_onto_an_endpoint() {
        // The exact crossing is (99.60.., 1.99..), which rounds onto the end of
        // the first line: it stays whole and only the second line is split.
        let pm = PrecisionModel::new(1.0);
        let a = (gp(0, 0), gp(100, 2));
        let b = (gp(101, -5), gp(99, 5));
        assert_eq!(shared_nodes(a, b), vec![gp(100, 2)]);

        let g = union_lines(
            &[
                line(&[(0.0, 0.0), (100.0, 2.0)]),
                line(&[(101.0, -5.0), (99.0, 5.0)]),
            ],
            &pm,
        );
        assert_eq!(seg_count(&g), 3);
        assert_eq!(
            g.coords().iter().filter(|c| **c == Coord::new(100.0, 2.0)).count(),
            3
        );
    }

    #[test]
    fn near_coincident_endpoints_snap_together() {
        let pm = PrecisionModel::new(10_000.0);
        let g = union_lines(
            &[
                line(&[(0.0, 0.0), (1.0, 0.000_01)]),
                line(&[(1.0, -0.000_01), (1.0, 1.0)]),
            ],
            &pm,
        );
        assert_eq!(seg_count(&g), 2);
        assert_eq!(
            g.coords().iter().filter(|c| **c == Coord::new(1.0, 0.0)).count(),
            2
        );
    }
}
