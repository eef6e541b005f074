//! Low-discrepancy (quasi-random) point sets in a rectangular extent.
//!
//! Model
//! - A unit-square sequence (Halton digit reversal or Roberts R² additive
//!   recurrence) is mapped affinely onto the extent: `x = min_x + width·u`,
//!   `y = min_y + height·v`.
//! - Mapped points failing `Envelope::contains` (half-open) are discarded and the
//!   next element of the sequence is tried. Only floating-point boundary effects
//!   trigger this, since `u, v ∈ [0, 1)`.
//! - Output is a pure function of `(extent, count, method)`: no RNG, no global state.
//!
//! Precondition: the extent must not be degenerate. With zero width or height no
//! candidate is ever accepted: debug builds panic on the assertion in `generate`,
//! release builds do not check and the rejection loop never terminates.
//!
//! Reference: Roberts, “The unreasonable effectiveness of quasirandom sequences”
//! (extremelearning.com.au), for φ₂ and the R² recurrence.

use std::str::FromStr;

use crate::cfg::{ALT_HALTON_BASES, DEFAULT_HALTON_BASES};
use crate::error::GenError;
use crate::geom::{Coord, Envelope, Geometry};

/// Generalized golden ratio φ₂: the real root of `x³ = x + 1`.
#[allow(clippy::excessive_precision)]
pub const PHI2: f64 = 1.32471795724474602596;

/// Van der Corput radical inverse of `index` in `base`.
///
/// `base` must be at least 2; smaller bases are a caller error.
pub fn halton_ordinate(index: u64, base: u32) -> f64 {
    debug_assert!(base >= 2, "Halton base must be >= 2");
    let b = u64::from(base);
    let mut result = 0.0;
    let mut f = 1.0 / b as f64;
    let mut i = index;
    while i > 0 {
        result += f * (i % b) as f64;
        i /= b;
        f /= b as f64;
    }
    result
}

/// Which unit-square sequence drives the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuasiMethod {
    /// Per-axis radical inverses. Bases are not checked for coprimality.
    Halton { base1: u32, base2: u32 },
    /// Additive recurrence with increments `1/φ₂` and `1/φ₂²`.
    Roberts,
}

impl Default for QuasiMethod {
    fn default() -> Self {
        let (base1, base2) = DEFAULT_HALTON_BASES;
        QuasiMethod::Halton { base1, base2 }
    }
}

impl QuasiMethod {
    /// Fresh sequence state for one generation call.
    pub fn sequence(self) -> QuasiSequence {
        match self {
            QuasiMethod::Halton { base1, base2 } => {
                QuasiSequence::Halton(HaltonSequence::new(base1, base2))
            }
            QuasiMethod::Roberts => QuasiSequence::Roberts(RobertsSequence::new()),
        }
    }
}

/// Accepts `halton`, `halton57`, `halton:B1,B2` and `roberts`.
impl FromStr for QuasiMethod {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "halton" => return Ok(QuasiMethod::default()),
            "halton57" => {
                let (base1, base2) = ALT_HALTON_BASES;
                return Ok(QuasiMethod::Halton { base1, base2 });
            }
            "roberts" | "r2" => return Ok(QuasiMethod::Roberts),
            _ => {}
        }
        let bases = s
            .strip_prefix("halton:")
            .ok_or_else(|| GenError::invalid(format!("unknown quasi-random method `{s}`")))?;
        let parsed: Vec<u32> = bases
            .split(',')
            .map(|b| {
                b.trim()
                    .parse::<u32>()
                    .map_err(|_| GenError::invalid(format!("bad Halton base `{b}`")))
            })
            .collect::<Result<_, _>>()?;
        match parsed.as_slice() {
            [base1, base2] if *base1 < 2 || *base2 < 2 => {
                Err(GenError::invalid("Halton bases must be >= 2"))
            }
            [base1, base2] => Ok(QuasiMethod::Halton {
                base1: *base1,
                base2: *base2,
            }),
            _ => Err(GenError::invalid("Halton needs exactly two bases")),
        }
    }
}

/// Halton pairs for indices 1, 2, 3, ...
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    base1: u32,
    base2: u32,
    index: u64,
}

impl HaltonSequence {
    pub fn new(base1: u32, base2: u32) -> Self {
        Self {
            base1,
            base2,
            index: 0,
        }
    }
}

impl Iterator for HaltonSequence {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.index += 1;
        Some((
            halton_ordinate(self.index, self.base1),
            halton_ordinate(self.index, self.base2),
        ))
    }
}

/// Roberts R² pairs, starting from the state (0.5, 0.5) and advancing once per item.
#[derive(Clone, Debug)]
pub struct RobertsSequence {
    r1: f64,
    r2: f64,
}

impl RobertsSequence {
    pub const A1: f64 = 1.0 / PHI2;
    pub const A2: f64 = 1.0 / (PHI2 * PHI2);

    pub fn new() -> Self {
        Self { r1: 0.5, r2: 0.5 }
    }
}

impl Default for RobertsSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// `(curr + alpha) mod 1` for `curr ∈ [0,1)`, `alpha ∈ (0,1)`; the sum is below 2,
/// so one conditional subtraction suffices.
#[inline]
fn quasirandom_step(curr: f64, alpha: f64) -> f64 {
    let next = curr + alpha;
    if next < 1.0 {
        next
    } else {
        next - next.floor()
    }
}

impl Iterator for RobertsSequence {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.r1 = quasirandom_step(self.r1, Self::A1);
        self.r2 = quasirandom_step(self.r2, Self::A2);
        Some((self.r1, self.r2))
    }
}

/// Either sequence behind one iterator type.
#[derive(Clone, Debug)]
pub enum QuasiSequence {
    Halton(HaltonSequence),
    Roberts(RobertsSequence),
}

impl Iterator for QuasiSequence {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            QuasiSequence::Halton(s) => s.next(),
            QuasiSequence::Roberts(s) => s.next(),
        }
    }
}

/// `count` quasi-random points inside `env` as a `MultiPoint`.
///
/// `count <= 0` yields an empty `MultiPoint`.
pub fn generate(env: &Envelope, count: i64, method: QuasiMethod) -> Geometry {
    let Ok(n) = usize::try_from(count) else {
        return Geometry::MultiPoint(Vec::new());
    };
    if n == 0 {
        return Geometry::MultiPoint(Vec::new());
    }
    debug_assert!(
        !env.is_degenerate(),
        "quasi-random sampling needs a non-degenerate extent"
    );
    let (width, height) = (env.width(), env.height());
    let mut pts = Vec::with_capacity(n);
    let mut rejected = 0usize;
    let mut seq = method.sequence();
    while pts.len() < n {
        let Some((u, v)) = seq.next() else {
            break;
        };
        let p = Coord::new(env.min_x + width * u, env.min_y + height * v);
        if env.contains(p) {
            pts.push(p);
        } else {
            rejected += 1;
        }
    }
    tracing::debug!(?method, count = n, rejected, "quasi-random points");
    Geometry::MultiPoint(pts)
}
