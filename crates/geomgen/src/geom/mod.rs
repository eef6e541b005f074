//! Planar geometry toolkit used by the generators.
//!
//! Purpose
//! - A small, explicit geometry layer: model and factory (`types`), precision
//!   grid (`precision`), affine maps (`affine`), line union (`noding`) and face
//!   extraction (`polygonize`), plus WKT output (`wkt`).
//! - Every operation returns a new geometry; inputs are never mutated.
//!
//! Code cross-refs: `truchet::truchet_tiling` (chains all of them), `lowdisc::generate`.

pub mod affine;
pub mod noding;
pub mod polygonize;
pub mod precision;
mod types;
mod wkt;

pub use affine::AffineTransform;
pub use noding::union_lines;
pub use polygonize::polygonize;
pub use precision::{GridPt, PrecisionModel};
pub use types::{
    build_geometry, envelope_or_default, point_in_ring, ring_signed_area, Coord, Envelope,
    Geometry, Polygon,
};
