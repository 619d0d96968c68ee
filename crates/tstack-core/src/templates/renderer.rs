//! Template rendering and subtree application
//!
//! The copy/render primitive behind every composition step. Files carrying
//! the `.hbs` suffix go through `{{field}}` substitution against the resolved
//! configuration and lose the suffix on write; everything else is copied
//! verbatim. A few reserved names (`_gitignore`, `_npmrc`) are renamed to
//! their real dotfile names, since those cannot ship literally inside a
//! source-controlled template tree.

use crate::config::ProjectConfig;
use crate::templates::locator::{FileSet, TemplateStep};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Suffix marking a file for variable substitution.
pub const TEMPLATE_SUFFIX: &str = ".hbs";

/// Variable context for `{{field}}` substitution: the resolved configuration
/// serialized to a flat key/value map. Only scalar fields substitute;
/// placeholders naming list fields or unknown keys are left untouched.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: serde_json::Map<String, Value>,
}

impl TemplateContext {
    pub fn new(config: &ProjectConfig) -> Result<Self> {
        let value = serde_json::to_value(config).context("Failed to serialize config")?;
        let Value::Object(vars) = value else {
            anyhow::bail!("Config did not serialize to an object");
        };
        Ok(Self { vars })
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.vars.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Replace `{{field}}` placeholders with config values. Unknown or
/// non-scalar fields are preserved verbatim.
pub fn substitute(input: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let key = after[..end].trim();
        match ctx.lookup(key) {
            Some(value) => {
                out.push_str(&rest[..start]);
                out.push_str(&value);
            }
            None => out.push_str(&rest[..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Map a source-relative path to its destination-relative path: drop the
/// template suffix and expand reserved placeholder names.
fn dest_rel_path(rel: &Path) -> PathBuf {
    let mut name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(stripped) = name.strip_suffix(TEMPLATE_SUFFIX) {
        name = stripped.to_string();
    }
    name = match name.as_str() {
        "_gitignore" => ".gitignore".to_string(),
        "_npmrc" => ".npmrc".to_string(),
        _ => name,
    };
    rel.parent()
        .map(|p| p.join(&name))
        .unwrap_or_else(|| PathBuf::from(&name))
}

/// Render one template file (or copy it verbatim) to `dest`.
pub async fn render_file(src: &Path, dest: &Path, ctx: &TemplateContext) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let is_template = src
        .file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(TEMPLATE_SUFFIX));

    if is_template {
        let content = fs::read_to_string(src)
            .await
            .with_context(|| format!("Failed to read template: {}", src.display()))?;
        fs::write(dest, substitute(&content, ctx))
            .await
            .with_context(|| format!("Failed to write file: {}", dest.display()))?;
    } else {
        let bytes = fs::read(src)
            .await
            .with_context(|| format!("Failed to read: {}", src.display()))?;
        fs::write(dest, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", dest.display()))?;
    }
    Ok(())
}

/// Apply one located subtree against the destination tree.
///
/// This is where the missing-template policy lives: a source subtree absent
/// from the pack is a silent no-op, never an error, since packs are allowed
/// to be incomplete for rarely-used combinations. Returns the number of
/// files written so the driver can flag concerns where nothing applied.
pub async fn apply_step(
    pack_root: &Path,
    project_dir: &Path,
    step: &TemplateStep,
    ctx: &TemplateContext,
) -> Result<usize> {
    let src_dir = pack_root.join(&step.source);
    if !src_dir.is_dir() {
        tracing::debug!(subtree = %step.source.display(), "template subtree not in pack, skipping");
        return Ok(0);
    }

    let dest_root = project_dir.join(step.dest.rel_path());
    let files = collect_files(&src_dir, &step.files)?;
    let mut written = 0usize;

    for rel in files {
        let src = src_dir.join(&rel);
        let dest = dest_root.join(dest_rel_path(&rel));

        if !step.overwrite && dest.exists() {
            continue;
        }

        render_file(&src, &dest, ctx).await?;
        written += 1;
    }

    Ok(written)
}

/// Enumerate source files for a step, relative to the subtree root.
fn collect_files(src_dir: &Path, files: &FileSet) -> Result<Vec<PathBuf>> {
    match files {
        FileSet::All => {
            let mut out = Vec::new();
            for entry in WalkDir::new(src_dir).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk: {}", src_dir.display()))?;
                if entry.file_type().is_file() {
                    let rel = entry
                        .path()
                        .strip_prefix(src_dir)
                        .expect("walkdir yields paths under its root")
                        .to_path_buf();
                    out.push(rel);
                }
            }
            Ok(out)
        }
        FileSet::Only(names) => Ok(names
            .iter()
            .map(PathBuf::from)
            .filter(|name| src_dir.join(name).is_file())
            .collect()),
    }
}

/// Rename any stray `_gitignore` files left under the project tree. Template
/// packs occasionally place them in nested directories that no rendering
/// step touched by name.
pub async fn normalize_gitignore_files(project_dir: &Path) -> Result<()> {
    let strays: Vec<PathBuf> = WalkDir::new(project_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "_gitignore")
        .map(|e| e.path().to_path_buf())
        .collect();

    for path in strays {
        let dest = path.with_file_name(".gitignore");
        fs::rename(&path, &dest)
            .await
            .with_context(|| format!("Failed to rename: {}", path.display()))?;
    }
    Ok(())
}
