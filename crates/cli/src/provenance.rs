use anyhow::{Context, Result};
use geomgen::{Envelope, Geometry};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::io::OutFormat;

/// Metadata recorded next to each generated artifact.
pub struct Payload {
    pub params: Value,
    pub tag: Option<String>,
    /// Vertex count of the written geometry.
    pub coords: usize,
    pub envelope: Option<Envelope>,
}

impl Payload {
    pub fn new(params: Value, g: &Geometry) -> Self {
        Self {
            params,
            tag: None,
            coords: g.num_coords(),
            envelope: g.envelope(),
        }
    }
}

/// Write `<stem>.provenance.json` next to `artifact`.
///
/// Records the git commit, library version, callsite, params, output format
/// (from the artifact extension), geometry summary and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": geomgen::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "tag": payload.tag,
        "params": payload.params,
        "format": OutFormat::for_path(artifact).name(),
        "geometry": {
            "coords": payload.coords,
            "envelope": payload.envelope
        },
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit hash from `GIT_COMMIT` (build time, then run time) or `git rev-parse`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomgen::Coord;
    use tempfile::tempdir;

    #[test]
    fn sidecar_name_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/out/tiling.parquet"));
        assert_eq!(derived, Path::new("/tmp/out/tiling.provenance.json"));
    }

    #[test]
    fn sidecar_records_params_and_tag() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("pts.wkt");
        fs::write(&artifact, "MULTIPOINT EMPTY").unwrap();
        let empty = Geometry::MultiPoint(vec![]);
        let mut payload = Payload::new(json!({"n": 0, "method": "Roberts"}), &empty);
        payload.tag = Some("smoke".into());
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["tag"], "smoke");
        assert_eq!(parsed["params"]["method"], "Roberts");
        assert_eq!(parsed["version"], geomgen::VERSION);
        assert_eq!(parsed["format"], "wkt");
        assert_eq!(parsed["geometry"]["coords"], 0);
        assert!(parsed["geometry"]["envelope"].is_null());
    }

    #[test]
    fn sidecar_records_format_and_geometry_summary() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("pts.parquet");
        let g = Geometry::MultiPoint(vec![Coord::new(1.0, 2.0), Coord::new(3.0, 5.0)]);
        let prov_path = write_sidecar(&artifact, Payload::new(json!({}), &g)).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["format"], "parquet");
        assert_eq!(parsed["geometry"]["coords"], 2);
        let env: Envelope = serde_json::from_value(parsed["geometry"]["envelope"].clone()).unwrap();
        assert_eq!(env, Envelope::new(1.0, 2.0, 3.0, 5.0));
    }
}
