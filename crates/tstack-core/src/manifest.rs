//! Package manifest mutation
//!
//! Generated packages accumulate dependency edges over a run. This module
//! owns the read-merge-write cycle on `package.json` files. Merges are keyed
//! by package name with the incoming version winning, so wiring the same
//! dependency twice is idempotent. A manifest that fails to parse is a fatal
//! error for the run.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// Pinned versions for dependencies the wirer may inject. Kept in one table
/// so generated projects stay reproducible across runs.
const DEPENDENCY_VERSIONS: &[(&str, &str)] = &[
    ("dotenv", "^17.2.2"),
    ("zod", "^4.1.11"),
    ("tsdown", "^0.15.5"),
    ("@types/node", "^22.13.11"),
    ("@types/bun", "^1.2.6"),
    ("@polar-sh/better-auth", "^1.1.3"),
    ("@polar-sh/sdk", "^0.34.16"),
];

/// Look up the pinned version for a catalog dependency.
pub fn version_of(name: &str) -> Option<&'static str> {
    DEPENDENCY_VERSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

/// Dependencies to merge into one package manifest.
#[derive(Debug, Clone, Default)]
pub struct DependencyPatch {
    /// Catalog names merged into `dependencies` at their pinned versions.
    pub dependencies: Vec<&'static str>,
    /// Catalog names merged into `devDependencies` at their pinned versions.
    pub dev_dependencies: Vec<&'static str>,
    /// Explicit name/version pairs (workspace references) merged into
    /// `dependencies`.
    pub custom_dependencies: BTreeMap<String, String>,
}

impl DependencyPatch {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
            && self.dev_dependencies.is_empty()
            && self.custom_dependencies.is_empty()
    }
}

/// Merge `patch` into the `package.json` at `target_dir` and write it back.
pub async fn add_package_dependency(target_dir: &Path, patch: &DependencyPatch) -> Result<()> {
    if patch.is_empty() {
        return Ok(());
    }

    let manifest_path = target_dir.join("package.json");
    let content = fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
    let mut manifest: Value = serde_json::from_str(&content)
        .with_context(|| format!("Malformed manifest: {}", manifest_path.display()))?;

    let root = manifest
        .as_object_mut()
        .with_context(|| format!("Manifest is not an object: {}", manifest_path.display()))?;

    if !patch.dependencies.is_empty() || !patch.custom_dependencies.is_empty() {
        let deps = section(root, "dependencies")?;
        for name in &patch.dependencies {
            let version = version_of(name)
                .with_context(|| format!("Unknown dependency '{name}' (not in version catalog)"))?;
            deps.insert((*name).to_string(), Value::String(version.to_string()));
        }
        for (name, version) in &patch.custom_dependencies {
            deps.insert(name.clone(), Value::String(version.clone()));
        }
    }

    if !patch.dev_dependencies.is_empty() {
        let dev = section(root, "devDependencies")?;
        for name in &patch.dev_dependencies {
            let version = version_of(name)
                .with_context(|| format!("Unknown dependency '{name}' (not in version catalog)"))?;
            dev.insert((*name).to_string(), Value::String(version.to_string()));
        }
    }

    let mut out = serde_json::to_string_pretty(&manifest)?;
    out.push('\n');
    fs::write(&manifest_path, out)
        .await
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;
    Ok(())
}

/// Fetch (or create) a dependency map section on the manifest root.
fn section<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>> {
    root.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .with_context(|| format!("Manifest field '{key}' is not an object"))
}
