//! Uniform random shapes inside an extent.
//!
//! Purpose
//! - Pseudo-random counterparts to `lowdisc` for quick test data: points (plain,
//!   gridded, radial, in a polygon or triangle), segments and random walks.
//! - Every function takes the RNG explicitly; seed it for reproducible output.
//!
//! Conventions
//! - `n <= 0` yields the empty geometry of the function's output type.
//! - Point sets are `MultiPoint`, segment sets `MultiLineString`, paths `LineString`.

use std::f64::consts::PI;

use rand::Rng;

use crate::error::GenError;
use crate::geom::{Coord, Envelope, Geometry};

/// Upper bound on rejected draws per accepted point in `random_points_in_polygon`.
const MAX_REJECTIONS_PER_POINT: usize = 1_000_000;

fn count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn uniform_in<R: Rng + ?Sized>(env: &Envelope, rng: &mut R) -> Coord {
    Coord::new(
        env.min_x + env.width() * rng.gen::<f64>(),
        env.min_y + env.height() * rng.gen::<f64>(),
    )
}

fn around<R: Rng + ?Sized>(centre: Coord, width: f64, height: f64, rng: &mut R) -> Coord {
    Coord::new(
        centre.x + width * (rng.gen::<f64>() - 0.5),
        centre.y + height * (rng.gen::<f64>() - 0.5),
    )
}

/// `n` points uniformly distributed in `env`.
pub fn random_points<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let pts = (0..count(n)).map(|_| uniform_in(env, rng)).collect();
    Geometry::MultiPoint(pts)
}

/// `n` points uniformly distributed inside the polygonal parts of `g`.
///
/// Rejection-samples the envelope against the polygons (holes excluded). Fails for
/// non-polygonal or zero-area input, and when the acceptance rate is so low that
/// sampling does not make progress.
pub fn random_points_in_polygon<R: Rng + ?Sized>(
    g: &Geometry,
    n: i64,
    rng: &mut R,
) -> Result<Geometry, GenError> {
    if !g.is_polygonal() {
        return Err(GenError::invalid("sampling region must be polygonal"));
    }
    let polys = g.polygons();
    let env = match g.envelope() {
        Some(env) if g.area() > 0.0 => env,
        _ => return Err(GenError::degenerate("sampling region has zero area")),
    };
    let n = count(n);
    let mut pts = Vec::with_capacity(n);
    let mut rejected = 0usize;
    while pts.len() < n {
        let p = uniform_in(&env, rng);
        if polys.iter().any(|poly| poly.contains_point(p)) {
            pts.push(p);
            continue;
        }
        rejected += 1;
        if rejected > MAX_REJECTIONS_PER_POINT * (pts.len() + 1) {
            return Err(GenError::degenerate(format!(
                "rejection sampling stalled after {} points",
                pts.len()
            )));
        }
    }
    tracing::debug!(n, rejected, "random points in polygon");
    Ok(Geometry::MultiPoint(pts))
}

/// Options for `random_points_in_grid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPointsCfg {
    /// Sample inside the ellipse inscribed in each cell instead of the whole cell.
    pub constrained_to_circle: bool,
    /// Fraction of each cell's width/height left empty around the sample area (clamped to [0,1]).
    pub gutter_fraction: f64,
}

impl Default for GridPointsCfg {
    fn default() -> Self {
        Self {
            constrained_to_circle: false,
            gutter_fraction: 0.0,
        }
    }
}

/// One random point per cell of a square grid over `env`.
///
/// The grid has `c × c` cells with `c = ceil(sqrt(n))`, so the result can hold more
/// than `n` points.
pub fn random_points_in_grid<R: Rng + ?Sized>(
    env: &Envelope,
    n: i64,
    cfg: &GridPointsCfg,
    rng: &mut R,
) -> Geometry {
    let n = count(n);
    if n == 0 {
        return Geometry::MultiPoint(Vec::new());
    }
    let mut cells = (n as f64).sqrt() as usize;
    if cells * cells < n {
        cells += 1;
    }
    let grid_dx = env.width() / cells as f64;
    let grid_dy = env.height() / cells as f64;
    let gutter = cfg.gutter_fraction.clamp(0.0, 1.0);
    let (off_x, off_y) = (grid_dx * gutter / 2.0, grid_dy * gutter / 2.0);
    let (cell_dx, cell_dy) = ((1.0 - gutter) * grid_dx, (1.0 - gutter) * grid_dy);

    let mut pts = Vec::with_capacity(cells * cells);
    for i in 0..cells {
        for j in 0..cells {
            let org = Coord::new(
                env.min_x + i as f64 * grid_dx + off_x,
                env.min_y + j as f64 * grid_dy + off_y,
            );
            let p = if cfg.constrained_to_circle {
                let ang = 2.0 * PI * rng.gen::<f64>();
                let r = rng.gen::<f64>().sqrt();
                Coord::new(
                    org.x + cell_dx / 2.0 + cell_dx / 2.0 * r * ang.cos(),
                    org.y + cell_dy / 2.0 + cell_dy / 2.0 * r * ang.sin(),
                )
            } else {
                Coord::new(
                    org.x + cell_dx * rng.gen::<f64>(),
                    org.y + cell_dy * rng.gen::<f64>(),
                )
            };
            pts.push(p);
        }
    }
    Geometry::MultiPoint(pts)
}

/// `n` points uniformly distributed in the triangle formed by the first three
/// coordinates of `tri`.
pub fn random_points_in_triangle<R: Rng + ?Sized>(
    tri: &Geometry,
    n: i64,
    rng: &mut R,
) -> Result<Geometry, GenError> {
    let cs = tri.coords();
    let [p0, p1, p2] = match cs.as_slice() {
        [a, b, c, ..] => [*a, *b, *c],
        _ => {
            return Err(GenError::invalid(format!(
                "triangle needs 3 coordinates, got {}",
                cs.len()
            )))
        }
    };
    let pts = (0..count(n))
        .map(|_| {
            let mut s = rng.gen::<f64>();
            let mut t = rng.gen::<f64>();
            if s + t > 1.0 {
                s = 1.0 - s;
                t = 1.0 - t;
            }
            p0 * (1.0 - s - t) + p1 * s + p2 * t
        })
        .collect();
    Ok(Geometry::MultiPoint(pts))
}

/// Points clustered towards the centre of `env` (radius `r_max · u²`).
pub fn random_radial_points<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let r_max = env.width().min(env.height()) / 2.0;
    let centre = env.centre();
    let pts = (0..count(n))
        .map(|_| {
            let u = rng.gen::<f64>();
            let r = r_max * u * u;
            let ang = 2.0 * PI * rng.gen::<f64>();
            Coord::new(centre.x + r * ang.cos(), centre.y + r * ang.sin())
        })
        .collect();
    Geometry::MultiPoint(pts)
}

/// `n` segments with both endpoints uniform in `env`.
pub fn random_segments<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let lines = (0..count(n))
        .map(|_| vec![uniform_in(env, rng), uniform_in(env, rng)])
        .collect();
    Geometry::MultiLineString(lines)
}

/// One short segment per cell of a `c × c` grid over `env`, `c = floor(sqrt(n)) + 1`.
pub fn random_segments_in_grid<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let n = count(n);
    if n == 0 {
        return Geometry::MultiLineString(Vec::new());
    }
    let cells = (n as f64).sqrt() as usize + 1;
    let dx = env.width() / cells as f64;
    let dy = env.height() / cells as f64;
    let mut lines = Vec::with_capacity(cells * cells);
    for i in 0..cells {
        for j in 0..cells {
            let cell = Envelope::new(
                env.min_x + i as f64 * dx,
                env.min_y + j as f64 * dy,
                env.min_x + (i + 1) as f64 * dx,
                env.min_y + (j + 1) as f64 * dy,
            );
            lines.push(vec![uniform_in(&cell, rng), uniform_in(&cell, rng)]);
        }
    }
    Geometry::MultiLineString(lines)
}

/// `n` axis-parallel segments in `env`, horizontal or vertical with equal odds.
pub fn random_segments_rectilinear<R: Rng + ?Sized>(
    env: &Envelope,
    n: i64,
    rng: &mut R,
) -> Geometry {
    let lines = (0..count(n))
        .map(|_| {
            let (a, b, v) = (rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>());
            if rng.gen_bool(0.5) {
                let x = env.min_x + env.width() * v;
                vec![
                    Coord::new(x, env.min_y + env.height() * a),
                    Coord::new(x, env.min_y + env.height() * b),
                ]
            } else {
                let y = env.min_y + env.height() * v;
                vec![
                    Coord::new(env.min_x + env.width() * a, y),
                    Coord::new(env.min_x + env.width() * b, y),
                ]
            }
        })
        .collect();
    Geometry::MultiLineString(lines)
}

/// Line string through `n` random vertices around the centre of `env`.
///
/// Fewer than two vertices give an empty `LineString`.
pub fn random_line_string<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let n = count(n);
    if n < 2 {
        return Geometry::LineString(Vec::new());
    }
    let centre = env.centre();
    let pts = (0..n)
        .map(|_| {
            let w = env.width() * rng.gen::<f64>();
            let h = env.height() * rng.gen::<f64>();
            around(centre, w, h, rng)
        })
        .collect();
    Geometry::LineString(pts)
}

/// Walk of `n` vertices alternating horizontal and vertical steps, starting near the
/// centre of `env`. Steps are uniform in `±width/2` (horizontal) or `±height/2`
/// (vertical), so the walk can leave the extent.
pub fn random_rectilinear_walk<R: Rng + ?Sized>(env: &Envelope, n: i64, rng: &mut R) -> Geometry {
    let n = count(n);
    if n < 2 {
        return Geometry::LineString(Vec::new());
    }
    let mut pts = Vec::with_capacity(n);
    let mut p = around(env.centre(), env.width(), env.height(), rng);
    pts.push(p);
    for step in 1..n {
        let u = rng.gen::<f64>() - 0.5;
        if step % 2 == 1 {
            p.x += env.width() * u;
        } else {
            p.y += env.height() * u;
        }
        pts.push(p);
    }
    Geometry::LineString(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Polygon;
    use rand::{rngs::StdRng, SeedableRng};

    fn unit_box() -> Envelope {
        Envelope::new(0.0, 0.0, 10.0, 5.0)
    }

    #[test]
    fn points_stay_in_extent() {
        let mut rng = StdRng::seed_from_u64(1);
        let env = unit_box();
        let g = random_points(&env, 500, &mut rng);
        assert_eq!(g.num_coords(), 500);
        assert!(g.coords().iter().all(|c| env.covers(*c)));
    }

    #[test]
    fn non_positive_counts_are_empty() {
        let mut rng = StdRng::seed_from_u64(2);
        let env = unit_box();
        for n in [0, -4] {
            assert_eq!(random_points(&env, n, &mut rng), Geometry::MultiPoint(vec![]));
            assert_eq!(
                random_points_in_grid(&env, n, &GridPointsCfg::default(), &mut rng),
                Geometry::MultiPoint(vec![])
            );
            assert_eq!(random_segments(&env, n, &mut rng), Geometry::MultiLineString(vec![]));
            assert_eq!(
                random_segments_in_grid(&env, n, &mut rng),
                Geometry::MultiLineString(vec![])
            );
            assert_eq!(random_line_string(&env, n, &mut rng), Geometry::LineString(vec![]));
            assert_eq!(
                random_rectilinear_walk(&env, n, &mut rng),
                Geometry::LineString(vec![])
            );
        }
    }

    #[test]
    fn polygon_sampling_avoids_holes() {
        let outer = Envelope::new(0.0, 0.0, 4.0, 4.0).to_polygon();
        let hole = Envelope::new(1.0, 1.0, 3.0, 3.0).to_polygon().exterior;
        let ring = Geometry::Polygon(Polygon::new(outer.exterior, vec![hole]));
        let mut rng = StdRng::seed_from_u64(3);
        let g = random_points_in_polygon(&ring, 300, &mut rng).unwrap();
        assert_eq!(g.num_coords(), 300);
        let inner = Envelope::new(1.0, 1.0, 3.0, 3.0);
        assert!(g.coords().iter().all(|c| !inner.contains(*c)));
    }

    #[test]
    fn polygon_sampling_rejects_bad_regions() {
        let mut rng = StdRng::seed_from_u64(4);
        let line = Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);
        assert!(matches!(
            random_points_in_polygon(&line, 5, &mut rng),
            Err(GenError::InvalidInput { .. })
        ));
        let flat = Geometry::Polygon(Polygon::new(
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 0.0),
                Coord::new(2.0, 0.0),
                Coord::new(0.0, 0.0),
            ],
            vec![],
        ));
        assert!(matches!(
            random_points_in_polygon(&flat, 5, &mut rng),
            Err(GenError::Degenerate { .. })
        ));
    }

    #[test]
    fn grid_points_fill_every_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let env = Envelope::new(0.0, 0.0, 3.0, 3.0);
        // 7 points need a 3x3 grid
        let g = random_points_in_grid(&env, 7, &GridPointsCfg::default(), &mut rng);
        let pts = g.coords();
        assert_eq!(pts.len(), 9);
        for (k, p) in pts.iter().enumerate() {
            let (i, j) = ((k / 3) as f64, (k % 3) as f64);
            assert!(p.x >= i && p.x < i + 1.0 && p.y >= j && p.y < j + 1.0);
        }
    }

    #[test]
    fn grid_gutter_and_circle_constraints() {
        let env = Envelope::new(0.0, 0.0, 4.0, 4.0);
        let cfg = GridPointsCfg {
            constrained_to_circle: true,
            gutter_fraction: 0.5,
        };
        let g = random_points_in_grid(&env, 16, &cfg, &mut StdRng::seed_from_u64(6));
        for (k, p) in g.coords().iter().enumerate() {
            let centre = Coord::new((k / 4) as f64 + 0.5, (k % 4) as f64 + 0.5);
            // half of each unit cell is gutter, leaving a circle of radius 0.25
            assert!((p - centre).norm() <= 0.25 + 1e-12);
        }
        let clamped = GridPointsCfg {
            constrained_to_circle: false,
            gutter_fraction: 3.0,
        };
        let g = random_points_in_grid(&env, 4, &clamped, &mut StdRng::seed_from_u64(6));
        let expect: Vec<Coord> = [(1.0, 1.0), (1.0, 3.0), (3.0, 1.0), (3.0, 3.0)]
            .iter()
            .map(|&(x, y)| Coord::new(x, y))
            .collect();
        assert_eq!(g.coords(), expect);
    }

    #[test]
    fn triangle_points_are_inside() {
        let tri = Geometry::Polygon(Polygon::new(
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(0.0, 2.0),
                Coord::new(0.0, 0.0),
            ],
            vec![],
        ));
        let g = random_points_in_triangle(&tri, 200, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(g.num_coords(), 200);
        for p in g.coords() {
            assert!(p.x >= -1e-12 && p.y >= -1e-12);
            assert!(p.x / 4.0 + p.y / 2.0 <= 1.0 + 1e-12);
        }
        let short = Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]);
        assert!(matches!(
            random_points_in_triangle(&short, 3, &mut StdRng::seed_from_u64(7)),
            Err(GenError::InvalidInput { .. })
        ));
    }

    #[test]
    fn radial_points_within_inscribed_circle() {
        let env = unit_box();
        let g = random_radial_points(&env, 300, &mut StdRng::seed_from_u64(8));
        let c = env.centre();
        assert!(g.coords().iter().all(|p| (p - c).norm() <= 2.5 + 1e-12));
    }

    #[test]
    fn segment_generators_shape() {
        let env = unit_box();
        let mut rng = StdRng::seed_from_u64(9);
        let segs = random_segments(&env, 20, &mut rng);
        assert_eq!(segs.segments().len(), 20);
        assert!(segs.coords().iter().all(|c| env.covers(*c)));

        // floor(sqrt(10)) + 1 = 4 cells per side
        let grid = random_segments_in_grid(&env, 10, &mut rng);
        assert_eq!(grid.segments().len(), 16);

        let rect = random_segments_rectilinear(&env, 50, &mut rng);
        for (a, b) in rect.segments() {
            assert!(a.x == b.x || a.y == b.y);
            assert!(env.covers(a) && env.covers(b));
        }
    }

    #[test]
    fn walks_alternate_axes() {
        let env = unit_box();
        let g = random_rectilinear_walk(&env, 9, &mut StdRng::seed_from_u64(10));
        let segs = g.segments();
        assert_eq!(segs.len(), 8);
        for (k, (a, b)) in segs.iter().enumerate() {
            if k % 2 == 0 {
                assert_eq!(a.y, b.y);
            } else {
                assert_eq!(a.x, b.x);
            }
        }
        let line = random_line_string(&env, 6, &mut StdRng::seed_from_u64(10));
        assert_eq!(line.num_coords(), 6);
        assert!(line.coords().iter().all(|c| env.covers(*c)));
    }

    #[test]
    fn seeded_output_is_reproducible() {
        let env = unit_box();
        let a = random_points(&env, 50, &mut StdRng::seed_from_u64(11));
        let b = random_points(&env, 50, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
