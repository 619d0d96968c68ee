//! Project composition driver
//!
//! Ties the pipeline together: validate the configuration, compose the file
//! tree concern by concern from the template pack, wire workspace
//! dependencies, then normalize leftover reserved file names.

use crate::config::{Backend, ProjectConfig};
use crate::templates::locator::{locate, Concern, PackageDir};
use crate::templates::renderer::{apply_step, normalize_gitignore_files, TemplateContext};
use crate::validate::{validate, IncompatibleConfig};
use crate::wire;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Destination roots reported in the run summary, in display order.
const SUMMARY_DIRS: &[PackageDir] = &[
    PackageDir::WebApp,
    PackageDir::NativeApp,
    PackageDir::ServerApp,
    PackageDir::BackendPackage,
    PackageDir::ApiPackage,
    PackageDir::AuthPackage,
    PackageDir::DbPackage,
];

/// Why a run did not produce a project.
///
/// `Invalid` means the configuration itself was rejected before any file was
/// touched; `Failed` is an I/O or manifest error partway through.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error(transparent)]
    Invalid(#[from] IncompatibleConfig),
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub project_dir: PathBuf,
    /// Generated package directories, relative to the project root.
    pub packages: Vec<String>,
    pub files_written: usize,
}

/// Compose a new project at `config.project_dir` from the template pack
/// rooted at `pack_root`.
pub async fn create_project(
    config: &ProjectConfig,
    pack_root: &Path,
) -> Result<ProjectSummary, CreateError> {
    validate(config)?;

    fs::create_dir_all(&config.project_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create project directory: {}",
                config.project_dir.display()
            )
        })?;

    let ctx = TemplateContext::new(config)?;
    let mut files_written = 0usize;

    for &concern in Concern::ORDER {
        if concern == Concern::BackendServer && config.backend == Backend::Convex {
            remove_server_app(config).await?;
        }

        let steps = locate(concern, config);
        if steps.is_empty() {
            continue;
        }

        let mut applied = 0usize;
        for step in &steps {
            applied += apply_step(pack_root, &config.project_dir, step, &ctx).await?;
        }

        if applied == 0 {
            warn!(
                concern = concern.name(),
                "no template files applied, pack may be missing content"
            );
        } else {
            debug!(concern = concern.name(), files = applied, "concern applied");
        }
        files_written += applied;
    }

    wire::setup_workspace_dependencies(config).await?;
    normalize_gitignore_files(&config.project_dir).await?;

    let packages = SUMMARY_DIRS
        .iter()
        .filter(|dir| config.project_dir.join(dir.rel_path()).is_dir())
        .map(|dir| dir.rel_path().to_string())
        .collect();

    Ok(ProjectSummary {
        project_dir: config.project_dir.clone(),
        packages,
        files_written,
    })
}

/// Convex supersedes the conventional server app with a function package;
/// anything an earlier concern placed under `apps/server` is discarded.
async fn remove_server_app(config: &ProjectConfig) -> Result<(), CreateError> {
    let server_dir = config.project_dir.join(PackageDir::ServerApp.rel_path());
    if server_dir.is_dir() {
        fs::remove_dir_all(&server_dir)
            .await
            .with_context(|| format!("Failed to remove: {}", server_dir.display()))?;
    }
    Ok(())
}
