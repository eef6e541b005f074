//! Reading tiles and writing generated geometry.
//!
//! Output format follows the file extension:
//! - `.csv` / `.parquet`: vertex table with columns `part`, `x`, `y` (one part per
//!   point, line or ring, in linework order).
//! - `.json`: serde JSON of the geometry.
//! - anything else: WKT text.
//!
//! Tiles are read from `.json` (serde geometry) or `.csv` (the vertex table above,
//! each part becoming one line string).

use anyhow::{bail, Context, Result};
use geomgen::{Coord, Geometry};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutFormat {
    Wkt,
    Json,
    Csv,
    Parquet,
}

impl OutFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Self::Csv,
            Some("parquet") => Self::Parquet,
            Some("json") => Self::Json,
            _ => Self::Wkt,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wkt => "wkt",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Vertex table of `g`.
pub fn vertex_frame(g: &Geometry) -> PolarsResult<DataFrame> {
    let mut part = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut push = |k: usize, c: &Coord| {
        part.push(k as u32);
        xs.push(c.x);
        ys.push(c.y);
    };
    match g {
        Geometry::Point(c) => push(0, c),
        Geometry::MultiPoint(cs) => cs.iter().enumerate().for_each(|(k, c)| push(k, c)),
        _ => {
            for (k, line) in g.linework().into_iter().enumerate() {
                line.iter().for_each(|c| push(k, c));
            }
        }
    }
    df!("part" => part, "x" => xs, "y" => ys)
}

pub fn write_geometry(g: &Geometry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    match OutFormat::for_path(path) {
        OutFormat::Wkt => fs::write(path, format!("{g}\n"))
            .with_context(|| format!("writing {}", path.display()))?,
        OutFormat::Json => fs::write(path, serde_json::to_vec_pretty(g)?)
            .with_context(|| format!("writing {}", path.display()))?,
        OutFormat::Csv => {
            let mut df = vertex_frame(g)?;
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        OutFormat::Parquet => {
            let mut df = vertex_frame(g)?;
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
    }
    Ok(())
}

/// Load a base tile from a serde JSON geometry or a `part,x,y` CSV table.
pub fn read_tile(path: &Path) -> Result<Geometry> {
    match OutFormat::for_path(path) {
        OutFormat::Json => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing geometry JSON {}", path.display()))
        }
        OutFormat::Csv => {
            let df = LazyCsvReader::new(path)
                .with_infer_schema_length(Some(100))
                .finish()?
                .collect()
                .with_context(|| format!("reading {}", path.display()))?;
            lines_from_frame(&df)
        }
        _ => bail!(
            "unsupported tile file {} (expected .json or .csv)",
            path.display()
        ),
    }
}

fn lines_from_frame(df: &DataFrame) -> Result<Geometry> {
    let part = df.column("part")?.cast(&DataType::UInt32)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;
    let mut lines: Vec<Vec<Coord>> = Vec::new();
    let mut current = None;
    for ((k, x), y) in part.u32()?.into_iter().zip(xs.f64()?).zip(ys.f64()?) {
        let (Some(k), Some(x), Some(y)) = (k, x, y) else {
            bail!("null value in tile table");
        };
        if current != Some(k) {
            lines.push(Vec::new());
            current = Some(k);
        }
        if let Some(line) = lines.last_mut() {
            line.push(Coord::new(x, y));
        }
    }
    Ok(Geometry::MultiLineString(lines))
}
