//! Print a few Truchet tilings and point sets as WKT for quick visual checks.
//!
//! Usage:
//!   cargo run -p geomgen --example truchet_demo -- arcs 6 0.5
//!   cargo run -p geomgen --example truchet_demo -- diagonal 4 0
//!
//! Paste the output into any WKT viewer.

use geomgen::api;
use geomgen::truchet::{arc_tile, diagonal_tile, square_diagonal_tile};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let mut args = std::env::args().skip(1);
    let tile_name = args.next().unwrap_or_else(|| "arcs".to_string());
    let n_side: i64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(6);
    let randomness: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0.5);

    let tile = match tile_name.as_str() {
        "diagonal" => diagonal_tile(),
        "square" => square_diagonal_tile(),
        "arcs" => arc_tile(8),
        _ => {
            eprintln!("usage: truchet_demo [diagonal|square|arcs] [n_side] [randomness]");
            return;
        }
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let faces = api::truchet_tiling(&tile, n_side, randomness, &mut rng);
    eprintln!(
        "{tile_name}: {} faces, total area {:.6}",
        faces.polygons().len(),
        faces.area()
    );
    println!("{faces}");

    let extent = faces.envelope().map(|env| geomgen::Geometry::Polygon(env.to_polygon()));
    println!("{}", api::roberts_points(extent.as_ref(), 64));
}
