use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use geomgen::api;
use geomgen::lowdisc::QuasiMethod;
use geomgen::random::GridPointsCfg;
use geomgen::truchet::{arc_tile, diagonal_tile, square_diagonal_tile};
use geomgen::{Envelope, Geometry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

#[derive(Parser)]
#[command(name = "geomgen")]
#[command(about = "Synthetic 2D test geometry generators")]
struct Cmd {
    /// Optional run tag; propagated to logs and provenance
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Low-discrepancy points (halton, halton57, halton:B1,B2, roberts)
    Points {
        #[arg(long, default_value = "halton")]
        method: QuasiMethod,
        #[arg(long)]
        n: i64,
        /// Extent as minx,miny,maxx,maxy (default 0,0,100,100)
        #[arg(long, allow_hyphen_values = true)]
        extent: Option<Envelope>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Uniform random shapes
    Random {
        #[arg(long, value_enum, default_value_t = Shape::Points)]
        shape: Shape,
        #[arg(long)]
        n: i64,
        #[arg(long, allow_hyphen_values = true)]
        extent: Option<Envelope>,
        /// Gutter fraction for grid shapes
        #[arg(long, default_value_t = 0.0)]
        gutter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Truchet tiling polygonized into faces
    Truchet {
        /// Built-in tile name (diagonal, square, arcs) or a .json/.csv tile file
        #[arg(long, default_value = "arcs")]
        tile: String,
        #[arg(long, default_value_t = 8)]
        n_side: i64,
        #[arg(long, default_value_t = 0.5)]
        randomness: f64,
        /// Chords per quarter circle for the arcs tile
        #[arg(long, default_value_t = 8)]
        arc_segments: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
enum Shape {
    Points,
    Grid,
    GridCircles,
    Radial,
    Segments,
    GridSegments,
    Rectilinear,
    Line,
    Walk,
}

#[derive(Serialize)]
struct PointsParams {
    method: String,
    n: i64,
    extent: Option<Envelope>,
}

#[derive(Serialize)]
struct RandomParams {
    shape: Shape,
    n: i64,
    extent: Option<Envelope>,
    gutter: f64,
    seed: u64,
}

#[derive(Serialize)]
struct TruchetParams {
    tile: String,
    n_side: i64,
    randomness: f64,
    arc_segments: usize,
    seed: u64,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Points {
            method,
            n,
            extent,
            out,
        } => points(method, n, extent, out, cmd.tag),
        Action::Random {
            shape,
            n,
            extent,
            gutter,
            seed,
            out,
        } => random(
            RandomParams {
                shape,
                n,
                extent,
                gutter,
                seed,
            },
            out,
            cmd.tag,
        ),
        Action::Truchet {
            tile,
            n_side,
            randomness,
            arc_segments,
            seed,
            out,
        } => truchet(
            TruchetParams {
                tile,
                n_side,
                randomness,
                arc_segments,
                seed,
            },
            out,
            cmd.tag,
        ),
        Action::Report => report(cmd.tag),
    }
}

fn extent_geometry(extent: Option<Envelope>) -> Option<Geometry> {
    extent.map(|env| Geometry::Polygon(env.to_polygon()))
}

fn points(
    method: QuasiMethod,
    n: i64,
    extent: Option<Envelope>,
    out: Option<PathBuf>,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(method = ?method, n, tag = ?tag, "points");
    if extent.is_some_and(|env| env.is_degenerate()) {
        bail!("extent must have positive width and height");
    }
    let g = extent_geometry(extent);
    let pts = match method {
        QuasiMethod::Halton { base1, base2 } => {
            api::halton_points_with_bases(g.as_ref(), n, base1, base2)
        }
        QuasiMethod::Roberts => api::roberts_points(g.as_ref(), n),
    };
    let params = PointsParams {
        method: format!("{method:?}"),
        n,
        extent,
    };
    emit(&pts, out, serde_json::to_value(params)?, tag)
}

fn random(params: RandomParams, out: Option<PathBuf>, tag: Option<String>) -> Result<()> {
    tracing::info!(shape = ?params.shape, n = params.n, seed = params.seed, tag = ?tag, "random");
    let g = extent_geometry(params.extent);
    let extent = g.as_ref();
    let n = params.n;
    let rng = &mut StdRng::seed_from_u64(params.seed);
    let grid = |constrained_to_circle| GridPointsCfg {
        constrained_to_circle,
        gutter_fraction: params.gutter,
    };
    let shape = match params.shape {
        Shape::Points => api::random_points(extent, n, rng),
        Shape::Grid => api::random_points_in_grid(extent, n, &grid(false), rng),
        Shape::GridCircles => api::random_points_in_grid(extent, n, &grid(true), rng),
        Shape::Radial => api::random_radial_points(extent, n, rng),
        Shape::Segments => api::random_segments(extent, n, rng),
        Shape::GridSegments => api::random_segments_in_grid(extent, n, rng),
        Shape::Rectilinear => api::random_segments_rectilinear(extent, n, rng),
        Shape::Line => api::random_line_string(extent, n, rng),
        Shape::Walk => api::random_rectilinear_walk(extent, n, rng),
    };
    emit(&shape, out, serde_json::to_value(params)?, tag)
}

fn load_tile(name: &str, arc_segments: usize) -> Result<Geometry> {
    match name {
        "diagonal" => Ok(diagonal_tile()),
        "square" => Ok(square_diagonal_tile()),
        "arcs" => Ok(arc_tile(arc_segments)),
        path => io::read_tile(path.as_ref()).with_context(|| format!("loading tile {path}")),
    }
}

fn truchet(params: TruchetParams, out: Option<PathBuf>, tag: Option<String>) -> Result<()> {
    let tile = load_tile(&params.tile, params.arc_segments)?;
    let mut rng = StdRng::seed_from_u64(params.seed);
    let faces = api::truchet_tiling(&tile, params.n_side, params.randomness, &mut rng);
    tracing::info!(
        n_side = params.n_side,
        randomness = params.randomness,
        faces = faces.polygons().len(),
        area = faces.area(),
        tag = ?tag,
        "truchet"
    );
    emit(&faces, out, serde_json::to_value(params)?, tag)
}

/// Print WKT to stdout, or write `out` plus its provenance sidecar.
fn emit(g: &Geometry, out: Option<PathBuf>, params: serde_json::Value, tag: Option<String>) -> Result<()> {
    let Some(out) = out else {
        println!("{g}");
        return Ok(());
    };
    io::write_geometry(g, &out)?;
    let mut payload = provenance::Payload::new(params, g);
    payload.tag = tag;
    let sidecar = provenance::write_sidecar(&out, payload)?;
    tracing::info!(
        out = %out.display(),
        provenance = %sidecar.display(),
        coords = g.num_coords(),
        "written"
    );
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": geomgen::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
