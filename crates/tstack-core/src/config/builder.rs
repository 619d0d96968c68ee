//! Configuration builder
//!
//! Replaces any process-wide default-config state: callers construct a
//! builder, layer sparse overrides on top of the documented defaults, and get
//! back a fully resolved [`ProjectConfig`].

use super::{
    Addon, Api, Auth, Backend, Database, DbSetup, Example, Frontend, Orm, PackageManager, Payments,
    ProjectConfig, Runtime, ServerDeploy, WebDeploy,
};
use std::path::PathBuf;

/// Sparse overrides, typically gathered from CLI flags or prompts.
/// Unset fields fall back to the builder defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub frontend: Option<Vec<Frontend>>,
    pub backend: Option<Backend>,
    pub runtime: Option<Runtime>,
    pub api: Option<Api>,
    pub database: Option<Database>,
    pub orm: Option<Orm>,
    pub auth: Option<Auth>,
    pub payments: Option<Payments>,
    pub addons: Option<Vec<Addon>>,
    pub examples: Option<Vec<Example>>,
    pub db_setup: Option<DbSetup>,
    pub web_deploy: Option<WebDeploy>,
    pub server_deploy: Option<ServerDeploy>,
    pub package_manager: Option<PackageManager>,
    pub git: Option<bool>,
    pub install: Option<bool>,
}

/// Builds a resolved [`ProjectConfig`] from defaults plus overrides.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    project_name: String,
    project_dir: PathBuf,
    overrides: ConfigOverrides,
}

impl ConfigBuilder {
    pub fn new(project_name: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            project_dir: project_dir.into(),
            overrides: ConfigOverrides::default(),
        }
    }

    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> ProjectConfig {
        let o = self.overrides;
        ProjectConfig {
            project_name: self.project_name,
            project_dir: self.project_dir,
            frontend: o.frontend.unwrap_or_else(|| vec![Frontend::TanstackRouter]),
            backend: o.backend.unwrap_or(Backend::Hono),
            runtime: o.runtime.unwrap_or(Runtime::Bun),
            api: o.api.unwrap_or(Api::Trpc),
            database: o.database.unwrap_or(Database::Sqlite),
            orm: o.orm.unwrap_or(Orm::Drizzle),
            auth: o.auth.unwrap_or(Auth::BetterAuth),
            payments: o.payments.unwrap_or(Payments::None),
            addons: o.addons.unwrap_or_else(|| vec![Addon::Turborepo]),
            examples: o.examples.unwrap_or_default(),
            db_setup: o.db_setup.unwrap_or(DbSetup::None),
            web_deploy: o.web_deploy.unwrap_or(WebDeploy::None),
            server_deploy: o.server_deploy.unwrap_or(ServerDeploy::None),
            package_manager: o.package_manager.unwrap_or(PackageManager::Npm),
            git: o.git.unwrap_or(true),
            install: o.install.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigBuilder::new("my-app", "/tmp/my-app").build();
        assert_eq!(config.backend, Backend::Hono);
        assert_eq!(config.runtime, Runtime::Bun);
        assert_eq!(config.api, Api::Trpc);
        assert_eq!(config.database, Database::Sqlite);
        assert_eq!(config.orm, Orm::Drizzle);
        assert_eq!(config.auth, Auth::BetterAuth);
        assert_eq!(config.frontend, vec![Frontend::TanstackRouter]);
        assert_eq!(config.addons, vec![Addon::Turborepo]);
        assert!(config.examples.is_empty());
        assert!(config.git);
    }

    #[test]
    fn test_overrides_win() {
        let config = ConfigBuilder::new("my-app", "/tmp/my-app")
            .overrides(ConfigOverrides {
                backend: Some(Backend::Convex),
                runtime: Some(Runtime::None),
                database: Some(Database::None),
                orm: Some(Orm::None),
                api: Some(Api::None),
                auth: Some(Auth::Clerk),
                ..Default::default()
            })
            .build();
        assert_eq!(config.backend, Backend::Convex);
        assert_eq!(config.runtime, Runtime::None);
        assert_eq!(config.auth, Auth::Clerk);
        // Untouched axes keep their defaults.
        assert_eq!(config.frontend, vec![Frontend::TanstackRouter]);
    }
}
