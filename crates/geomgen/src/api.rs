//! Generator entry points keyed on an optional extent geometry.
//!
//! Every function resolves its extent the same way: the envelope of `extent`, or
//! `DEFAULT_EXTENT` when `extent` is `None` or empty. The work is delegated to
//! `lowdisc`, `truchet` and `random`; this module only fixes the calling convention
//! used by the CLI and by callers that carry a geometry rather than an envelope.

use rand::Rng;

use crate::cfg::{ALT_HALTON_BASES, DEFAULT_HALTON_BASES};
use crate::error::GenError;
use crate::geom::{envelope_or_default, Geometry};
use crate::lowdisc::{self, QuasiMethod};
use crate::random::{self, GridPointsCfg};
use crate::truchet;

/// Halton points with bases 2 and 3.
pub fn halton_points(extent: Option<&Geometry>, n: i64) -> Geometry {
    let (b1, b2) = DEFAULT_HALTON_BASES;
    halton_points_with_bases(extent, n, b1, b2)
}

/// Halton points with bases 5 and 7.
pub fn halton_points_57(extent: Option<&Geometry>, n: i64) -> Geometry {
    let (b1, b2) = ALT_HALTON_BASES;
    halton_points_with_bases(extent, n, b1, b2)
}

/// Halton points with caller-chosen bases (both ≥ 2, ideally coprime).
pub fn halton_points_with_bases(extent: Option<&Geometry>, n: i64, base1: u32, base2: u32) -> Geometry {
    lowdisc::generate(
        &envelope_or_default(extent),
        n,
        QuasiMethod::Halton { base1, base2 },
    )
}

/// Roberts R2 points.
pub fn roberts_points(extent: Option<&Geometry>, n: i64) -> Geometry {
    lowdisc::generate(&envelope_or_default(extent), n, QuasiMethod::Roberts)
}

/// Truchet tiling of `tile` (see `truchet::truchet_tiling`).
pub fn truchet_tiling<R: Rng + ?Sized>(
    tile: &Geometry,
    n_side: i64,
    randomness: f64,
    rng: &mut R,
) -> Geometry {
    truchet::truchet_tiling(tile, n_side, randomness, rng)
}

pub fn random_points<R: Rng + ?Sized>(extent: Option<&Geometry>, n: i64, rng: &mut R) -> Geometry {
    random::random_points(&envelope_or_default(extent), n, rng)
}

/// Points inside `region`, which must be polygonal.
pub fn random_points_in_polygon<R: Rng + ?Sized>(
    region: &Geometry,
    n: i64,
    rng: &mut R,
) -> Result<Geometry, GenError> {
    random::random_points_in_polygon(region, n, rng)
}

pub fn random_points_in_grid<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    cfg: &GridPointsCfg,
    rng: &mut R,
) -> Geometry {
    random::random_points_in_grid(&envelope_or_default(extent), n, cfg, rng)
}

pub fn random_points_in_triangle<R: Rng + ?Sized>(
    tri: &Geometry,
    n: i64,
    rng: &mut R,
) -> Result<Geometry, GenError> {
    random::random_points_in_triangle(tri, n, rng)
}

pub fn random_radial_points<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    rng: &mut R,
) -> Geometry {
    random::random_radial_points(&envelope_or_default(extent), n, rng)
}

pub fn random_segments<R: Rng + ?Sized>(extent: Option<&Geometry>, n: i64, rng: &mut R) -> Geometry {
    random::random_segments(&envelope_or_default(extent), n, rng)
}

pub fn random_segments_in_grid<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    rng: &mut R,
) -> Geometry {
    random::random_segments_in_grid(&envelope_or_default(extent), n, rng)
}

pub fn random_segments_rectilinear<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    rng: &mut R,
) -> Geometry {
    random::random_segments_rectilinear(&envelope_or_default(extent), n, rng)
}

pub fn random_line_string<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    rng: &mut R,
) -> Geometry {
    random::random_line_string(&envelope_or_default(extent), n, rng)
}

pub fn random_rectilinear_walk<R: Rng + ?Sized>(
    extent: Option<&Geometry>,
    n: i64,
    rng: &mut R,
) -> Geometry {
    random::random_rectilinear_walk(&envelope_or_default(extent), n, rng)
}
