//! Fixed defaults for the generators.
//!
//! Policy
//! - Defaults are plain constants. Callers that need something else pass it
//!   explicitly (`TruchetCfg`, `QuasiMethod::Halton { .. }`, an explicit extent).

use crate::geom::Envelope;

/// Extent used when the caller supplies no geometry (or an empty one).
pub const DEFAULT_EXTENT: Envelope = Envelope {
    min_x: 0.0,
    min_y: 0.0,
    max_x: 100.0,
    max_y: 100.0,
};

/// Grid cells per unit used to snap Truchet tiles so neighbouring edges coincide.
pub const TRUCHET_SNAP_SCALE: f64 = 10_000.0;

/// Coprime Halton bases used by `halton_points`.
pub const DEFAULT_HALTON_BASES: (u32, u32) = (2, 3);

/// Alternative coprime Halton bases used by `halton_points_57`.
pub const ALT_HALTON_BASES: (u32, u32) = (5, 7);
