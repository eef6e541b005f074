//! Truchet tilings built from an arbitrary base tile.
//!
//! Model
//! - The base tile (line work, lower-left cell) is snapped to a fixed precision
//!   grid. Its envelope gives the grid pitch `side = ceil(max(width, height))`
//!   and the rotation centre.
//! - Cell `(i, j)` of the `n × n` grid gets `k = (i + j) mod 4` quarter turns, or
//!   with probability `randomness` a uniform `k ∈ {0,1,2,3}`. The tile is rotated
//!   by `k·π/2` about the centre, translated by `(i·side, j·side)` and snapped
//!   again, so edges from neighbouring cells coincide exactly. Cell `(0, 0)` keeps
//!   the base tile as is.
//! - The outline of the whole tiling closes the network; the union of all line
//!   work is noded and polygonized into faces.
//!
//! `randomness` is compared against a uniform draw in [0,1): values above 1 always
//! randomize, values below 0 never do.
//!
//! Code cross-refs: `geom::{PrecisionModel, AffineTransform, union_lines, polygonize}`.

use std::f64::consts::{FRAC_PI_2, PI};

use rand::Rng;

use crate::cfg::TRUCHET_SNAP_SCALE;
use crate::geom::{
    polygonize, union_lines, AffineTransform, Coord, Envelope, Geometry, PrecisionModel,
};

/// Tiling configuration.
#[derive(Clone, Copy, Debug)]
pub struct TruchetCfg {
    /// Precision grid cells per unit used for snapping tiles.
    pub scale: f64,
}

impl Default for TruchetCfg {
    fn default() -> Self {
        Self {
            scale: TRUCHET_SNAP_SCALE,
        }
    }
}

/// Quarter turns used for cell `(i, j)` when it is not randomized.
#[inline]
pub fn default_orientation(i: usize, j: usize) -> u8 {
    ((i + j) % 4) as u8
}

/// One snapped tile at its grid cell.
#[derive(Clone, Debug)]
pub struct PlacedTile {
    pub i: usize,
    pub j: usize,
    /// Quarter turns applied (always 0 for the base cell).
    pub quarter_turns: u8,
    pub lines: Geometry,
}

/// All placed tiles of an `n_side × n_side` tiling, row-major in `i`.
#[derive(Clone, Debug)]
pub struct TileLayout {
    pub n_side: usize,
    pub side: f64,
    /// Lower-left corner of the snapped base tile's envelope.
    pub origin: Coord,
    pub cells: Vec<PlacedTile>,
}

impl TileLayout {
    /// Outline of the whole tiling.
    pub fn bounds(&self) -> Envelope {
        let extent = self.n_side as f64 * self.side;
        Envelope::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + extent,
            self.origin.y + extent,
        )
    }

    pub fn cell(&self, i: usize, j: usize) -> Option<&PlacedTile> {
        if i >= self.n_side || j >= self.n_side {
            return None;
        }
        self.cells.get(i * self.n_side + j)
    }
}

/// Place snapped copies of `base` on the grid (steps 1–2 of the tiling).
///
/// Returns `None` when `n_side <= 0` or the snapped base tile is empty.
pub fn layout_tiles<R: Rng + ?Sized>(
    base: &Geometry,
    n_side: i64,
    randomness: f64,
    cfg: &TruchetCfg,
    rng: &mut R,
) -> Option<TileLayout> {
    let n = usize::try_from(n_side).ok().filter(|&n| n > 0)?;
    let pm = PrecisionModel::new(cfg.scale);
    let tile_snap = pm.reduce(base);
    let env = tile_snap.envelope()?;
    let side = env.width().max(env.height()).ceil();
    let centre = env.centre();

    let mut cells = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let mut k = default_orientation(i, j);
            if rng.gen::<f64>() < randomness {
                k = ((4.0 * rng.gen::<f64>()) as u8).min(3);
            }
            let (quarter_turns, lines) = if i == 0 && j == 0 {
                (0, tile_snap.clone())
            } else {
                let f = AffineTransform::rotation_about(f64::from(k) * FRAC_PI_2, centre)
                    .translated(i as f64 * side, j as f64 * side);
                (k, pm.reduce(&f.transform(&tile_snap)))
            };
            cells.push(PlacedTile {
                i,
                j,
                quarter_turns,
                lines,
            });
        }
    }
    Some(TileLayout {
        n_side: n,
        side,
        origin: Coord::new(env.min_x, env.min_y),
        cells,
    })
}

/// Truchet tiling with the default precision grid.
pub fn truchet_tiling<R: Rng + ?Sized>(
    base: &Geometry,
    n_side: i64,
    randomness: f64,
    rng: &mut R,
) -> Geometry {
    truchet_tiling_with_cfg(base, n_side, randomness, &TruchetCfg::default(), rng)
}

/// Faces of the Truchet tiling of `base` over an `n_side × n_side` grid.
///
/// Returns an empty `MultiPolygon` for `n_side <= 0` or an empty base tile.
/// Malformed tiles are not validated; they may yield no faces or unexpected ones.
pub fn truchet_tiling_with_cfg<R: Rng + ?Sized>(
    base: &Geometry,
    n_side: i64,
    randomness: f64,
    cfg: &TruchetCfg,
    rng: &mut R,
) -> Geometry {
    let Some(layout) = layout_tiles(base, n_side, randomness, cfg, rng) else {
        return Geometry::MultiPolygon(Vec::new());
    };
    let pm = PrecisionModel::new(cfg.scale);
    let outline = Geometry::Polygon(layout.bounds().to_polygon()).boundary();
    let side = layout.side;
    let mut parts: Vec<Geometry> = layout.cells.into_iter().map(|c| c.lines).collect();
    parts.push(outline);
    let noded = union_lines(&parts, &pm);
    let faces = polygonize(&noded);
    tracing::debug!(
        n_side,
        randomness,
        side,
        faces = faces.polygons().len(),
        "truchet tiling"
    );
    faces
}

/// Single diagonal across the unit square.
pub fn diagonal_tile() -> Geometry {
    Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)])
}

/// Unit square outline plus one diagonal (two triangles per cell).
pub fn square_diagonal_tile() -> Geometry {
    Geometry::MultiLineString(vec![
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, 0.0),
        ],
        vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)],
    ])
}

/// Smith tile: two quarter circles of radius 1/2 centred on opposite corners of the
/// unit square, each approximated by `segments` chords.
pub fn arc_tile(segments: usize) -> Geometry {
    let m = segments.max(1);
    let arc = |cx: f64, cy: f64, start: f64| -> Vec<Coord> {
        (0..=m)
            .map(|k| {
                let th = start + FRAC_PI_2 * k as f64 / m as f64;
                Coord::new(cx + 0.5 * th.cos(), cy + 0.5 * th.sin())
            })
            .collect()
    };
    Geometry::MultiLineString(vec![arc(0.0, 0.0, 0.0), arc(1.0, 1.0, PI)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn face_areas(g: &Geometry) -> Vec<f64> {
        g.polygons().iter().map(|p| p.area()).collect()
    }

    #[test]
    fn diagonal_golden_two_by_two() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = truchet_tiling(&diagonal_tile(), 2, 0.0, &mut rng);
        let areas = face_areas(&g);
        assert_eq!(areas.len(), 4);
        for a in &areas {
            assert!((a - 1.0).abs() < 1e-9, "face area {a}");
        }
        assert!((g.area() - 4.0).abs() < 1e-9);
        // All four faces meet at the centre of the tiling.
        for p in g.polygons() {
            assert!(p.exterior.contains(&Coord::new(1.0, 1.0)));
        }
    }

    #[test]
    fn non_positive_side_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [0, -3] {
            let g = truchet_tiling(&diagonal_tile(), n, 0.5, &mut rng);
            assert_eq!(g, Geometry::MultiPolygon(vec![]));
        }
        let empty = Geometry::MultiLineString(vec![]);
        assert_eq!(
            truchet_tiling(&empty, 3, 0.5, &mut rng),
            Geometry::MultiPolygon(vec![])
        );
    }

    #[test]
    fn square_tiles_give_two_faces_per_cell_under_any_rotation() {
        for seed in 1..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let g = truchet_tiling(&square_diagonal_tile(), 4, 1.0, &mut rng);
            assert_eq!(g.polygons().len(), 32);
            assert!((g.area() - 16.0).abs() < 1e-9);
        }
    }

    #[test]
    fn arc_tiling_partitions_the_square() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = truchet_tiling(&arc_tile(6), 5, 0.5, &mut rng);
        assert!(!g.polygons().is_empty());
        assert!(face_areas(&g).iter().all(|a| *a > 0.0));
        assert!((g.area() - 25.0).abs() < 1e-6, "total area {}", g.area());
    }

    #[test]
    fn neighbouring_cells_share_edge_nodes_exactly() {
        let cfg = TruchetCfg::default();
        let tol = 0.5 / cfg.scale;
        let mut rng = StdRng::seed_from_u64(11);
        let layout = layout_tiles(&arc_tile(8), 4, 1.0, &cfg, &mut rng).unwrap();
        let n = layout.n_side;
        let mut checked = 0;
        for i in 0..n {
            for j in 0..n {
                let here = layout.cell(i, j).unwrap().lines.coords();
                if i + 1 < n {
                    let edge = (i + 1) as f64 * layout.side;
                    let there = layout.cell(i + 1, j).unwrap().lines.coords();
                    for c in here.iter().filter(|c| (c.x - edge).abs() <= tol) {
                        assert!(there.contains(c), "gap at {c:?}");
                        checked += 1;
                    }
                }
                if j + 1 < n {
                    let edge = (j + 1) as f64 * layout.side;
                    let there = layout.cell(i, j + 1).unwrap().lines.coords();
                    for c in here.iter().filter(|c| (c.y - edge).abs() <= tol) {
                        assert!(there.contains(c), "gap at {c:?}");
                        checked += 1;
                    }
                }
            }
        }
        // one arc endpoint per shared edge
        assert_eq!(checked, 2 * n * (n - 1));
    }

    #[test]
    fn zero_randomness_uses_checkerboard_orientation() {
        let mut rng = StdRng::seed_from_u64(3);
        let layout =
            layout_tiles(&diagonal_tile(), 3, 0.0, &TruchetCfg::default(), &mut rng).unwrap();
        for cell in &layout.cells {
            let expect = if cell.i == 0 && cell.j == 0 {
                0
            } else {
                default_orientation(cell.i, cell.j)
            };
            assert_eq!(cell.quarter_turns, expect);
        }
        assert_eq!(layout.bounds(), Envelope::new(0.0, 0.0, 3.0, 3.0));
    }

    #[test]
    fn randomness_above_one_behaves_as_one() {
        let cfg = TruchetCfg::default();
        let turns = |r: f64| -> Vec<u8> {
            let mut rng = StdRng::seed_from_u64(99);
            layout_tiles(&arc_tile(4), 3, r, &cfg, &mut rng)
                .unwrap()
                .cells
                .iter()
                .map(|c| c.quarter_turns)
                .collect()
        };
        assert_eq!(turns(1.0), turns(5.0));
    }

    #[test]
    fn seeded_tilings_are_reproducible() {
        let a = truchet_tiling(&arc_tile(4), 3, 0.7, &mut StdRng::seed_from_u64(5));
        let b = truchet_tiling(&arc_tile(4), 3, 0.7, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn side_rounds_up_to_whole_units() {
        let tile = Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(0.6, 0.3)]);
        let layout =
            layout_tiles(&tile, 2, 0.0, &TruchetCfg::default(), &mut StdRng::seed_from_u64(0))
                .unwrap();
        assert_eq!(layout.side, 1.0);
    }
}
