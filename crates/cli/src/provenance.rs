use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand, its parameters and a result summary.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub summary: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            summary: Value::Null,
        }
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }
}

/// Base provenance fields shared by sidecars and `report`.
pub fn base_record() -> Value {
    json!({
        "tool": "hullmesh-cli",
        "version": env!("CARGO_PKG_VERSION"),
        "library_version": hullmesh::VERSION,
        "code_rev": current_git_rev(),
    })
}

/// Write `<artifact>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let mut doc = base_record();
    doc["command"] = json!(payload.command);
    doc["callsite"] = json!({ "file": callsite.file(), "line": callsite.line() });
    doc["params"] = payload.params;
    doc["summary"] = payload.summary;
    doc["outputs"] = json!([artifact.to_string_lossy()]);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(sidecar = %path.display(), "provenance_written");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_build = option_env!("GIT_COMMIT").filter(|s| !s.is_empty());
    if let Some(rev) = from_build {
        return rev.to_string();
    }
    if let Some(rev) = std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()) {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_replaces_extension() {
        let derived = sidecar_path(Path::new("/tmp/out/hull.json"));
        assert_eq!(derived, Path::new("/tmp/out/hull.provenance.json"));
    }

    #[test]
    fn sidecar_records_command_params_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("hull.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new("hull", json!({"tolerance": 1e-10}))
            .with_summary(json!({"faces": 4}));
        let path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "hull");
        assert_eq!(parsed["summary"]["faces"], 4);
        assert_eq!(parsed["tool"], "hullmesh-cli");
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert!(parsed["callsite"]["line"].as_u64().is_some());
    }
}
