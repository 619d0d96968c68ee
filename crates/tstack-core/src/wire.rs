//! Workspace dependency wiring
//!
//! After the file tree is composed, the generated packages exist but do not
//! yet reference each other. This pass walks the fixed dependency topology
//! (db -> auth -> api -> apps) and merges the missing edges into each
//! package manifest. Every edge is gated on the target directory actually
//! existing, so sparse configurations skip cleanly.

use crate::config::{Backend, PackageManager, Payments, ProjectConfig, Runtime};
use crate::manifest::{add_package_dependency, DependencyPatch};
use crate::templates::PackageDir;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Runtime-agnostic dependencies every generated workspace package gets.
const COMMON_DEPENDENCIES: &[&str] = &["dotenv", "zod"];
const COMMON_DEV_DEPENDENCIES: &[&str] = &["tsdown"];

/// Protocol used for intra-workspace references. npm has no `workspace:`
/// protocol support, so it falls back to a bare wildcard.
fn workspace_version(package_manager: PackageManager) -> &'static str {
    match package_manager {
        PackageManager::Npm => "*",
        PackageManager::Pnpm | PackageManager::Bun => "workspace:*",
    }
}

/// Type packages matching the selected runtime, for the workspace root.
fn runtime_dev_dependencies(config: &ProjectConfig) -> Vec<&'static str> {
    match (config.runtime, config.backend) {
        // A self-hosted backend without an explicit runtime still compiles
        // against Node types.
        (Runtime::None, Backend::SelfHosted) => vec!["@types/node"],
        (Runtime::Node, _) | (Runtime::Workers, _) => vec!["@types/node"],
        (Runtime::Bun, _) => vec!["@types/bun"],
        _ => vec![],
    }
}

/// Wire workspace-internal and shared external dependencies into every
/// generated package manifest under `config.project_dir`.
pub async fn setup_workspace_dependencies(config: &ProjectConfig) -> Result<()> {
    let ws = workspace_version(config.package_manager);
    let scoped = |pkg: &str| format!("@{}/{}", config.project_name, pkg);

    let dir_of = |pkg: PackageDir| -> Option<PathBuf> {
        let dir = config.project_dir.join(pkg.rel_path());
        dir.is_dir().then_some(dir)
    };

    let workspace_ref = |pkg: PackageDir| -> Option<(String, String)> {
        let suffix = pkg.workspace_suffix()?;
        dir_of(pkg).map(|_| (scoped(suffix), ws.to_string()))
    };

    // Polar wiring targets the server app. Without one, payments wiring is
    // skipped entirely, including the web client half.
    let polar_active =
        config.payments == Payments::Polar && dir_of(PackageDir::ServerApp).is_some();

    if let Some(dir) = dir_of(PackageDir::DbPackage) {
        let patch = DependencyPatch {
            dependencies: COMMON_DEPENDENCIES.to_vec(),
            dev_dependencies: COMMON_DEV_DEPENDENCIES.to_vec(),
            ..Default::default()
        };
        debug!(package = "db", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    if let Some(dir) = dir_of(PackageDir::AuthPackage) {
        let custom: BTreeMap<String, String> =
            workspace_ref(PackageDir::DbPackage).into_iter().collect();
        let patch = DependencyPatch {
            dependencies: COMMON_DEPENDENCIES.to_vec(),
            dev_dependencies: COMMON_DEV_DEPENDENCIES.to_vec(),
            custom_dependencies: custom,
        };
        debug!(package = "auth", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    if let Some(dir) = dir_of(PackageDir::ApiPackage) {
        let custom: BTreeMap<String, String> = workspace_ref(PackageDir::AuthPackage)
            .into_iter()
            .chain(workspace_ref(PackageDir::DbPackage))
            .collect();
        let patch = DependencyPatch {
            dependencies: COMMON_DEPENDENCIES.to_vec(),
            dev_dependencies: COMMON_DEV_DEPENDENCIES.to_vec(),
            custom_dependencies: custom,
        };
        debug!(package = "api", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    if let Some(dir) = dir_of(PackageDir::ServerApp) {
        let custom: BTreeMap<String, String> = workspace_ref(PackageDir::ApiPackage)
            .into_iter()
            .chain(workspace_ref(PackageDir::AuthPackage))
            .chain(workspace_ref(PackageDir::DbPackage))
            .collect();
        let mut dependencies = COMMON_DEPENDENCIES.to_vec();
        if polar_active {
            dependencies.extend(["@polar-sh/better-auth", "@polar-sh/sdk"]);
        }
        let patch = DependencyPatch {
            dependencies,
            dev_dependencies: COMMON_DEV_DEPENDENCIES.to_vec(),
            custom_dependencies: custom,
        };
        debug!(package = "server", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    if let Some(dir) = dir_of(PackageDir::WebApp) {
        let custom: BTreeMap<String, String> = workspace_ref(PackageDir::ApiPackage)
            .into_iter()
            .chain(workspace_ref(PackageDir::AuthPackage))
            .collect();
        let mut dependencies = Vec::new();
        if polar_active && config.has_web_frontend() {
            dependencies.push("@polar-sh/better-auth");
        }
        let patch = DependencyPatch {
            dependencies,
            custom_dependencies: custom,
            ..Default::default()
        };
        debug!(package = "web", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    if let Some(dir) = dir_of(PackageDir::NativeApp) {
        let custom: BTreeMap<String, String> =
            workspace_ref(PackageDir::ApiPackage).into_iter().collect();
        let patch = DependencyPatch {
            custom_dependencies: custom,
            ..Default::default()
        };
        debug!(package = "native", "wiring dependencies");
        add_package_dependency(&dir, &patch).await?;
    }

    // Workspace root: shared runtime deps plus type packages for the
    // selected JS runtime.
    let mut dev_dependencies = COMMON_DEV_DEPENDENCIES.to_vec();
    dev_dependencies.extend(runtime_dev_dependencies(config));
    let patch = DependencyPatch {
        dependencies: COMMON_DEPENDENCIES.to_vec(),
        dev_dependencies,
        ..Default::default()
    };
    debug!(package = "root", "wiring dependencies");
    add_package_dependency(&config.project_dir, &patch).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, ConfigOverrides};
    use serde_json::Value;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn seed_package(root: &Path, rel: &str, name: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name": "{name}"}}"#),
        )
        .unwrap();
    }

    fn manifest(root: &Path, rel: &str) -> Value {
        let path = if rel.is_empty() {
            root.join("package.json")
        } else {
            root.join(rel).join("package.json")
        };
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn full_stack_config(root: &Path) -> crate::config::ProjectConfig {
        seed_package(root, "", "demo");
        seed_package(root, "apps/web", "web");
        seed_package(root, "apps/server", "server");
        seed_package(root, "packages/api", "@demo/api");
        seed_package(root, "packages/auth", "@demo/auth");
        seed_package(root, "packages/db", "@demo/db");
        ConfigBuilder::new("demo", root).build()
    }

    #[tokio::test]
    async fn test_full_stack_wiring() {
        let tmp = TempDir::new().unwrap();
        let config = full_stack_config(tmp.path());

        setup_workspace_dependencies(&config).await.unwrap();

        let api = manifest(tmp.path(), "packages/api");
        assert_eq!(api["dependencies"]["@demo/auth"], "workspace:*");
        assert_eq!(api["dependencies"]["@demo/db"], "workspace:*");
        assert_eq!(api["dependencies"]["dotenv"], "^17.2.2");

        let server = manifest(tmp.path(), "apps/server");
        assert_eq!(server["dependencies"]["@demo/api"], "workspace:*");
        assert_eq!(server["dependencies"]["@demo/auth"], "workspace:*");
        assert_eq!(server["dependencies"]["@demo/db"], "workspace:*");

        let web = manifest(tmp.path(), "apps/web");
        assert_eq!(web["dependencies"]["@demo/api"], "workspace:*");
        assert_eq!(web["dependencies"]["@demo/auth"], "workspace:*");

        let root = manifest(tmp.path(), "");
        assert_eq!(root["devDependencies"]["tsdown"], "^0.15.5");
        assert_eq!(root["devDependencies"]["@types/bun"], "^1.2.6");
    }

    #[tokio::test]
    async fn test_shared_packages_get_tsdown_dev_dep() {
        let tmp = TempDir::new().unwrap();
        let config = full_stack_config(tmp.path());

        setup_workspace_dependencies(&config).await.unwrap();

        // tsdown goes on every buildable workspace package, not just the root.
        for pkg in ["packages/db", "packages/auth", "packages/api", "apps/server"] {
            let m = manifest(tmp.path(), pkg);
            assert_eq!(m["devDependencies"]["tsdown"], "^0.15.5", "{pkg}");
        }
        let web = manifest(tmp.path(), "apps/web");
        assert!(web.get("devDependencies").is_none());
    }

    #[tokio::test]
    async fn test_npm_uses_wildcard_workspace_refs() {
        let tmp = TempDir::new().unwrap();
        seed_package(tmp.path(), "", "demo");
        seed_package(tmp.path(), "packages/auth", "@demo/auth");
        seed_package(tmp.path(), "packages/db", "@demo/db");
        let config = ConfigBuilder::new("demo", tmp.path())
            .overrides(ConfigOverrides {
                package_manager: Some(PackageManager::Npm),
                ..Default::default()
            })
            .build();

        setup_workspace_dependencies(&config).await.unwrap();

        let auth = manifest(tmp.path(), "packages/auth");
        assert_eq!(auth["dependencies"]["@demo/db"], "*");
    }

    #[tokio::test]
    async fn test_missing_packages_are_skipped() {
        let tmp = TempDir::new().unwrap();
        seed_package(tmp.path(), "", "demo");
        seed_package(tmp.path(), "apps/web", "web");
        let config = ConfigBuilder::new("demo", tmp.path())
            .overrides(ConfigOverrides {
                backend: Some(Backend::None),
                runtime: Some(Runtime::None),
                api: Some(crate::config::Api::None),
                database: Some(crate::config::Database::None),
                orm: Some(crate::config::Orm::None),
                auth: Some(crate::config::Auth::None),
                ..Default::default()
            })
            .build();

        setup_workspace_dependencies(&config).await.unwrap();

        let web = manifest(tmp.path(), "apps/web");
        // No api/auth packages on disk, so no workspace refs appear.
        assert!(web.get("dependencies").is_none());
        let root = manifest(tmp.path(), "");
        assert!(root["devDependencies"].get("@types/node").is_none());
        assert!(root["devDependencies"].get("@types/bun").is_none());
    }

    #[tokio::test]
    async fn test_polar_deps_target_server_app() {
        let tmp = TempDir::new().unwrap();
        let mut config = full_stack_config(tmp.path());
        config.payments = Payments::Polar;
        config.package_manager = PackageManager::Pnpm;

        setup_workspace_dependencies(&config).await.unwrap();

        let server = manifest(tmp.path(), "apps/server");
        assert_eq!(server["dependencies"]["@polar-sh/better-auth"], "^1.1.3");
        assert_eq!(server["dependencies"]["@polar-sh/sdk"], "^0.34.16");
        // The auth package only carries its usual wiring.
        let auth = manifest(tmp.path(), "packages/auth");
        assert!(auth["dependencies"].get("@polar-sh/sdk").is_none());
        // The web app gets the client plugin.
        let web = manifest(tmp.path(), "apps/web");
        assert_eq!(web["dependencies"]["@polar-sh/better-auth"], "^1.1.3");
    }

    #[tokio::test]
    async fn test_polar_skipped_without_server_app() {
        let tmp = TempDir::new().unwrap();
        seed_package(tmp.path(), "", "demo");
        seed_package(tmp.path(), "apps/web", "web");
        let mut config = ConfigBuilder::new("demo", tmp.path()).build();
        config.payments = Payments::Polar;

        setup_workspace_dependencies(&config).await.unwrap();

        let web = manifest(tmp.path(), "apps/web");
        assert!(web.get("dependencies").is_none());
    }

    #[tokio::test]
    async fn test_self_hosted_without_runtime_gets_node_types() {
        let tmp = TempDir::new().unwrap();
        seed_package(tmp.path(), "", "demo");
        let config = ConfigBuilder::new("demo", tmp.path())
            .overrides(ConfigOverrides {
                backend: Some(Backend::SelfHosted),
                runtime: Some(Runtime::None),
                ..Default::default()
            })
            .build();

        setup_workspace_dependencies(&config).await.unwrap();

        let root = manifest(tmp.path(), "");
        assert_eq!(root["devDependencies"]["@types/node"], "^22.13.11");
    }
}
