use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::model::{PackageVersion, VersionInfo};

/// Package metadata file that bower leaves in every installed library.
const PACKAGE_MANIFEST: &str = ".bower.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    version: Option<String>,
}

/// Versions of every library under `libs_dir` that carries a manifest.
///
/// Libraries are keyed by the manifest's `name`, falling back to the
/// directory name. Unreadable manifests are skipped with a warning.
pub fn collect_packages(libs_dir: &Path) -> BTreeMap<String, PackageVersion> {
    let mut packages = BTreeMap::new();

    let entries = match std::fs::read_dir(libs_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No packages under {}: {}", libs_dir.display(), e);
            return packages;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let manifest_path = entry.path().join(PACKAGE_MANIFEST);
        let Ok(raw) = std::fs::read_to_string(&manifest_path) else {
            continue;
        };
        let manifest: PackageManifest = match serde_json::from_str(&raw) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Skipping {}: {}", manifest_path.display(), e);
                continue;
            }
        };

        let name = manifest
            .name
            .unwrap_or_else(|| entry.file_name().to_string_lossy().into_owned());
        packages.insert(
            name,
            PackageVersion {
                version: manifest.version.unwrap_or_default(),
            },
        );
    }

    packages
}

/// Commit checked out in `dir`, when git is installed and `dir` is a work tree.
pub fn current_commit(dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("HEAD")
        .current_dir(dir)
        .output()
        .map_err(|e| debug!("git unavailable: {}", e))
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!commit.is_empty()).then_some(commit)
}

/// Version document for the assets rooted at `root`.
pub fn collect_version_info(root: &Path, libs_dir: &Path) -> VersionInfo {
    VersionInfo {
        commit_id: current_commit(root),
        packages: collect_packages(libs_dir),
        ..VersionInfo::current()
    }
}
