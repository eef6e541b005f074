//! Synthetic 2D test geometry.
//!
//! Generators for point sets and tilings used to exercise spatial algorithms:
//! low-discrepancy points (Halton, Roberts R2), Truchet tilings polygonized into
//! faces, and uniform random shapes. Output is a plain [`geom::Geometry`] value that
//! renders as WKT and serializes with serde.
//!
//! Layout
//! - `geom`: geometry model plus the operations the generators chain (snap to a
//!   precision grid, affine maps, line union, polygonize).
//! - `lowdisc`, `truchet`, `random`: the generators.
//! - `api`: the same generators keyed on an optional extent geometry.
//! - `cfg`: shared defaults. `error`: the error type for malformed input.

pub mod api;
pub mod cfg;
pub mod error;
pub mod geom;
pub mod lowdisc;
pub mod random;
pub mod truchet;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::GenError;
pub use geom::{Coord, Envelope, Geometry};
pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::GenError;
    pub use crate::geom::{
        envelope_or_default, AffineTransform, Coord, Envelope, Geometry, Polygon, PrecisionModel,
    };
    pub use crate::lowdisc::{generate, QuasiMethod};
    pub use crate::random::GridPointsCfg;
    pub use crate::truchet::{
        arc_tile, diagonal_tile, square_diagonal_tile, truchet_tiling, TruchetCfg,
    };
    pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};
}
