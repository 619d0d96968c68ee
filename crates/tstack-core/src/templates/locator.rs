//! Template subtree location
//!
//! Pure path computation: given a composition concern and a resolved
//! configuration, produce the ordered list of template subtrees to apply.
//! Most-general subtrees come first, most-specific last, so that later
//! applications win file-for-file under the default overwrite policy.
//!
//! Nothing in this module touches the filesystem; the composer checks
//! whether a located subtree actually exists in the template pack.

use crate::config::{Addon, Api, Backend, Database, DbSetup, Example, Frontend, Orm};
use crate::config::{Auth, Payments, ProjectConfig, ServerDeploy, WebDeploy};
use std::fmt;
use std::path::PathBuf;

/// One of the fixed destination roots a run may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageDir {
    Root,
    WebApp,
    NativeApp,
    ServerApp,
    ApiPackage,
    AuthPackage,
    DbPackage,
    /// Convex function package, supersedes `apps/server`.
    BackendPackage,
}

impl PackageDir {
    /// Destination path relative to the project root.
    pub fn rel_path(&self) -> &'static str {
        match self {
            PackageDir::Root => "",
            PackageDir::WebApp => "apps/web",
            PackageDir::NativeApp => "apps/native",
            PackageDir::ServerApp => "apps/server",
            PackageDir::ApiPackage => "packages/api",
            PackageDir::AuthPackage => "packages/auth",
            PackageDir::DbPackage => "packages/db",
            PackageDir::BackendPackage => "packages/backend",
        }
    }

    /// Workspace package suffix, e.g. `db` in `@my-app/db`.
    pub fn workspace_suffix(&self) -> Option<&'static str> {
        match self {
            PackageDir::ApiPackage => Some("api"),
            PackageDir::AuthPackage => Some("auth"),
            PackageDir::DbPackage => Some("db"),
            PackageDir::BackendPackage => Some("backend"),
            _ => None,
        }
    }
}

impl fmt::Display for PackageDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self == PackageDir::Root {
            "."
        } else {
            self.rel_path()
        })
    }
}

/// Which files of a source subtree a step applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSet {
    /// Every file under the subtree, recursively.
    All,
    /// Only the named files at the subtree root.
    Only(Vec<String>),
}

/// A single "apply subtree A onto destination B" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStep {
    /// Source directory, relative to the template pack root.
    pub source: PathBuf,
    pub files: FileSet,
    pub dest: PackageDir,
    /// When false, files already present at the destination are preserved
    /// (used by example overlays).
    pub overwrite: bool,
}

impl TemplateStep {
    fn tree(source: impl Into<PathBuf>, dest: PackageDir) -> Self {
        Self {
            source: source.into(),
            files: FileSet::All,
            dest,
            overwrite: true,
        }
    }

    fn overlay(source: impl Into<PathBuf>, dest: PackageDir) -> Self {
        Self {
            overwrite: false,
            ..Self::tree(source, dest)
        }
    }

    fn file(source: impl Into<PathBuf>, name: &str, dest: PackageDir) -> Self {
        Self {
            source: source.into(),
            files: FileSet::Only(vec![name.to_string()]),
            dest,
            overwrite: true,
        }
    }
}

/// A logical composition area, processed as one atomic ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concern {
    Base,
    FrontendWeb,
    FrontendNative,
    BackendServer,
    ApiPackage,
    DbPackage,
    Auth,
    Payments,
    Addons,
    Examples,
    DbSetup,
    Deploy,
    Extras,
}

impl Concern {
    /// Top-level composition order. Later concerns may assume earlier output
    /// exists on disk and win overlapping paths under overwrite=true.
    pub const ORDER: &'static [Concern] = &[
        Concern::Base,
        Concern::FrontendWeb,
        Concern::FrontendNative,
        Concern::BackendServer,
        Concern::ApiPackage,
        Concern::DbPackage,
        Concern::Auth,
        Concern::Payments,
        Concern::Addons,
        Concern::Examples,
        Concern::DbSetup,
        Concern::Deploy,
        Concern::Extras,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Concern::Base => "base",
            Concern::FrontendWeb => "frontend-web",
            Concern::FrontendNative => "frontend-native",
            Concern::BackendServer => "backend-server",
            Concern::ApiPackage => "api-package",
            Concern::DbPackage => "db-package",
            Concern::Auth => "auth",
            Concern::Payments => "payments",
            Concern::Addons => "addons",
            Concern::Examples => "examples",
            Concern::DbSetup => "db-setup",
            Concern::Deploy => "deploy",
            Concern::Extras => "extras",
        }
    }
}

/// Compute the ordered subtree applications for one concern.
pub fn locate(concern: Concern, config: &ProjectConfig) -> Vec<TemplateStep> {
    match concern {
        Concern::Base => vec![TemplateStep::tree("base", PackageDir::Root)],
        Concern::FrontendWeb => locate_frontend_web(config),
        Concern::FrontendNative => locate_frontend_native(config),
        Concern::BackendServer => locate_backend(config),
        Concern::ApiPackage => locate_api_package(config),
        Concern::DbPackage => locate_db_package(config),
        Concern::Auth => locate_auth(config),
        Concern::Payments => locate_payments(config),
        Concern::Addons => locate_addons(config),
        Concern::Examples => locate_examples(config),
        Concern::DbSetup => locate_db_setup(config),
        Concern::Deploy => locate_deploy(config),
        Concern::Extras => locate_extras(config),
    }
}

/// React frameworks that can absorb the API as in-process routes
/// when the backend is `self`.
fn supports_fullstack(frontend: Frontend) -> bool {
    matches!(frontend, Frontend::Next | Frontend::TanstackStart)
}

fn locate_frontend_web(config: &ProjectConfig) -> Vec<TemplateStep> {
    let mut steps = Vec::new();
    let is_convex = config.backend == Backend::Convex;

    if let Some(framework) = config.react_web_frontend() {
        steps.push(TemplateStep::tree(
            "frontend/react/web-base",
            PackageDir::WebApp,
        ));
        steps.push(TemplateStep::tree(
            format!("frontend/react/{framework}"),
            PackageDir::WebApp,
        ));
        if !is_convex && config.api != Api::None {
            steps.push(TemplateStep::tree(
                format!("api/{}/web/react/base", config.api),
                PackageDir::WebApp,
            ));
        }
        if config.backend == Backend::SelfHosted
            && supports_fullstack(framework)
            && config.api != Api::None
        {
            steps.push(TemplateStep::tree(
                format!("api/{}/fullstack/{framework}", config.api),
                PackageDir::WebApp,
            ));
        }
    } else if let Some(framework) = config.other_web_frontend() {
        steps.push(TemplateStep::tree(
            format!("frontend/{framework}"),
            PackageDir::WebApp,
        ));
        // Only the oRPC client ships bindings for these frameworks.
        if !is_convex && config.api == Api::Orpc {
            steps.push(TemplateStep::tree(
                format!("api/orpc/web/{framework}"),
                PackageDir::WebApp,
            ));
        }
    }

    steps
}

fn locate_frontend_native(config: &ProjectConfig) -> Vec<TemplateStep> {
    let Some(segment) = config.native_segment() else {
        return Vec::new();
    };
    let mut steps = vec![
        TemplateStep::tree("frontend/native/native-base", PackageDir::NativeApp),
        TemplateStep::tree(format!("frontend/native/{segment}"), PackageDir::NativeApp),
    ];
    if config.backend != Backend::Convex && config.api != Api::None {
        steps.push(TemplateStep::tree(
            format!("api/{}/native", config.api),
            PackageDir::NativeApp,
        ));
    }
    steps
}

fn locate_backend(config: &ProjectConfig) -> Vec<TemplateStep> {
    match config.backend {
        Backend::None | Backend::SelfHosted => Vec::new(),
        Backend::Convex => vec![TemplateStep::tree(
            "backend/convex/packages/backend",
            PackageDir::BackendPackage,
        )],
        backend => vec![
            TemplateStep::tree("backend/server/base", PackageDir::ServerApp),
            TemplateStep::tree(format!("backend/server/{backend}"), PackageDir::ServerApp),
        ],
    }
}

fn locate_api_package(config: &ProjectConfig) -> Vec<TemplateStep> {
    if !config.has_api_package() {
        return Vec::new();
    }
    vec![TemplateStep::tree(
        format!("api/{}/server", config.api),
        PackageDir::ApiPackage,
    )]
}

fn locate_db_package(config: &ProjectConfig) -> Vec<TemplateStep> {
    if !config.has_db_package() {
        return Vec::new();
    }
    vec![
        TemplateStep::tree("db/base", PackageDir::DbPackage),
        TemplateStep::tree(
            format!("db/{}/{}", config.orm, config.database),
            PackageDir::DbPackage,
        ),
    ]
}

fn locate_auth(config: &ProjectConfig) -> Vec<TemplateStep> {
    if config.auth == Auth::None {
        return Vec::new();
    }
    let provider = config.auth;

    if config.backend == Backend::Convex {
        return locate_auth_convex(config, provider);
    }

    let mut steps = Vec::new();

    // Server-side auth package plus its db integration.
    if config.backend.has_server_app() || config.backend == Backend::SelfHosted {
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/server/base"),
            PackageDir::AuthPackage,
        ));
        if config.has_db_package() {
            steps.push(TemplateStep::tree(
                format!(
                    "auth/{provider}/server/db/{}/{}",
                    config.orm, config.database
                ),
                PackageDir::DbPackage,
            ));
        }
    }

    // Web client integration.
    if let Some(framework) = config.react_web_frontend() {
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/web/react/base"),
            PackageDir::WebApp,
        ));
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/web/react/{framework}"),
            PackageDir::WebApp,
        ));
        if config.backend == Backend::SelfHosted && supports_fullstack(framework) {
            steps.push(TemplateStep::tree(
                format!("auth/{provider}/fullstack/{framework}"),
                PackageDir::WebApp,
            ));
        }
    } else if let Some(framework) = config.other_web_frontend() {
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/web/{framework}"),
            PackageDir::WebApp,
        ));
    }

    // Native client integration.
    if let Some(segment) = config.native_segment() {
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/native/native-base"),
            PackageDir::NativeApp,
        ));
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/native/{segment}"),
            PackageDir::NativeApp,
        ));
    }

    steps
}

fn locate_auth_convex(config: &ProjectConfig, provider: Auth) -> Vec<TemplateStep> {
    let mut steps = vec![TemplateStep::tree(
        format!("auth/{provider}/convex/backend"),
        PackageDir::BackendPackage,
    )];

    if let Some(framework) = config.react_web_frontend() {
        if provider == Auth::BetterAuth {
            steps.push(TemplateStep::tree(
                format!("auth/{provider}/convex/web/react/base"),
                PackageDir::WebApp,
            ));
        }
        steps.push(TemplateStep::tree(
            format!("auth/{provider}/convex/web/react/{framework}"),
            PackageDir::WebApp,
        ));
    }

    // Clerk is the only provider shipping Convex-native templates.
    if provider == Auth::Clerk {
        if let Some(segment) = config.native_segment() {
            steps.push(TemplateStep::tree(
                format!("auth/{provider}/convex/native/base"),
                PackageDir::NativeApp,
            ));
            steps.push(TemplateStep::tree(
                format!("auth/{provider}/convex/native/{segment}"),
                PackageDir::NativeApp,
            ));
        }
    }

    steps
}

fn locate_payments(config: &ProjectConfig) -> Vec<TemplateStep> {
    if config.payments == Payments::None {
        return Vec::new();
    }
    let provider = config.payments;
    let mut steps = Vec::new();

    if config.backend == Backend::Convex {
        steps.push(TemplateStep::tree(
            format!("payments/{provider}/convex/backend"),
            PackageDir::BackendPackage,
        ));
        if let Some(framework) = config.react_web_frontend() {
            steps.push(TemplateStep::tree(
                format!("payments/{provider}/convex/web/react/base"),
                PackageDir::WebApp,
            ));
            steps.push(TemplateStep::tree(
                format!("payments/{provider}/convex/web/react/{framework}"),
                PackageDir::WebApp,
            ));
        }
        return steps;
    }

    if config.backend.has_server_app() || config.backend == Backend::SelfHosted {
        // Payment plugins hook into the auth package on traditional stacks.
        steps.push(TemplateStep::tree(
            format!("payments/{provider}/server/base"),
            PackageDir::AuthPackage,
        ));
    }

    if let Some(framework) = config.react_web_frontend() {
        steps.push(TemplateStep::tree(
            format!("payments/{provider}/web/react/{framework}"),
            PackageDir::WebApp,
        ));
    } else if let Some(framework) = config.other_web_frontend() {
        steps.push(TemplateStep::tree(
            format!("payments/{provider}/web/{framework}"),
            PackageDir::WebApp,
        ));
    }

    steps
}

fn locate_addons(config: &ProjectConfig) -> Vec<TemplateStep> {
    let mut steps = Vec::new();
    for addon in config.active_addons() {
        if addon == Addon::Pwa {
            // The PWA addon ships per-bundler variants and lands inside the
            // web app rather than at the project root.
            if !config.has_web_frontend() {
                continue;
            }
            if config.frontend.contains(&Frontend::Next) {
                steps.push(TemplateStep::tree(
                    "addons/pwa/apps/web/next",
                    PackageDir::WebApp,
                ));
            } else if config.frontend.iter().any(|f| {
                matches!(
                    f,
                    Frontend::TanstackRouter | Frontend::ReactRouter | Frontend::Solid
                )
            }) {
                steps.push(TemplateStep::tree(
                    "addons/pwa/apps/web/vite",
                    PackageDir::WebApp,
                ));
            }
            continue;
        }
        steps.push(TemplateStep::tree(
            format!("addons/{addon}"),
            PackageDir::Root,
        ));
    }
    steps
}

fn locate_examples(config: &ProjectConfig) -> Vec<TemplateStep> {
    let mut steps = Vec::new();
    let server_side = (config.backend.has_server_app() || config.backend == Backend::SelfHosted)
        && config.backend != Backend::Convex;

    for example in config.active_examples() {
        let base = format!("examples/{example}");

        if server_side {
            if config.api != Api::None {
                steps.push(TemplateStep::overlay(
                    format!("{base}/server/{}/base", config.orm),
                    PackageDir::ApiPackage,
                ));
            }
            if config.orm != Orm::None && config.database != Database::None {
                steps.push(TemplateStep::overlay(
                    format!("{base}/server/{}/{}", config.orm, config.database),
                    PackageDir::DbPackage,
                ));
            }
        }

        if let Some(framework) = config.react_web_frontend() {
            if example == Example::Ai {
                steps.push(TemplateStep::overlay(
                    format!("{base}/web/react/base"),
                    PackageDir::WebApp,
                ));
            }
            steps.push(TemplateStep::overlay(
                format!("{base}/web/react/{framework}"),
                PackageDir::WebApp,
            ));
            if config.backend == Backend::SelfHosted && supports_fullstack(framework) {
                steps.push(TemplateStep::overlay(
                    format!("{base}/fullstack/{framework}"),
                    PackageDir::WebApp,
                ));
            }
        } else if let Some(framework) = config.other_web_frontend() {
            steps.push(TemplateStep::overlay(
                format!("{base}/web/{framework}"),
                PackageDir::WebApp,
            ));
        }

        if let Some(segment) = config.native_segment() {
            steps.push(TemplateStep::overlay(
                format!("{base}/native/{segment}"),
                PackageDir::NativeApp,
            ));
        }
    }

    steps
}

fn locate_db_setup(config: &ProjectConfig) -> Vec<TemplateStep> {
    if config.db_setup != DbSetup::Docker || config.database == Database::None {
        return Vec::new();
    }
    vec![TemplateStep::tree(
        format!("db-setup/docker-compose/{}", config.database),
        PackageDir::DbPackage,
    )]
}

const ALCHEMY_DIR: &str = "deploy/alchemy";
const ALCHEMY_RUN: &str = "alchemy.run.ts.hbs";
const ALCHEMY_ENV_DTS: &str = "env.d.ts.hbs";

fn locate_deploy(config: &ProjectConfig) -> Vec<TemplateStep> {
    let mut steps = Vec::new();
    let is_self = config.backend == Backend::SelfHosted;

    if config.web_deploy == WebDeploy::Alchemy || config.server_deploy == ServerDeploy::Alchemy {
        if config.web_deploy == WebDeploy::Alchemy
            && (config.server_deploy == ServerDeploy::Alchemy || is_self)
        {
            // One combined infrastructure entrypoint. Fullstack setups keep it
            // in the web app, split setups at the workspace root.
            let dest = if is_self && config.has_web_frontend() {
                PackageDir::WebApp
            } else {
                PackageDir::Root
            };
            steps.push(TemplateStep::file(ALCHEMY_DIR, ALCHEMY_RUN, dest));
            steps.extend(alchemy_env_steps(config));
        } else {
            if config.web_deploy == WebDeploy::Alchemy && config.has_web_frontend() {
                steps.push(TemplateStep::file(ALCHEMY_DIR, ALCHEMY_RUN, PackageDir::WebApp));
                steps.extend(alchemy_env_steps(config));
            }
            if config.server_deploy == ServerDeploy::Alchemy && config.backend.has_server_app() {
                steps.push(TemplateStep::file(ALCHEMY_DIR, ALCHEMY_RUN, PackageDir::ServerApp));
                steps.extend(alchemy_env_steps(config));
            }
        }
    }

    if !matches!(config.web_deploy, WebDeploy::None | WebDeploy::Alchemy)
        && config.has_web_frontend()
    {
        for frontend in &config.frontend {
            if let Some(segment) = web_deploy_segment(*frontend) {
                steps.push(TemplateStep::tree(
                    format!("deploy/{}/web/{segment}", config.web_deploy),
                    PackageDir::WebApp,
                ));
            }
        }
    }

    if !matches!(config.server_deploy, ServerDeploy::None | ServerDeploy::Alchemy)
        && config.backend.has_server_app()
    {
        steps.push(TemplateStep::tree(
            format!("deploy/{}/server", config.server_deploy),
            PackageDir::ServerApp,
        ));
    }

    steps
}

/// Alchemy distributes a generated environment-typings file into every
/// generated package so infra bindings type-check everywhere.
fn alchemy_env_steps(config: &ProjectConfig) -> Vec<TemplateStep> {
    let mut dests = Vec::new();
    if config.has_web_frontend() {
        dests.push(PackageDir::WebApp);
    }
    if config.has_native_frontend() {
        dests.push(PackageDir::NativeApp);
    }
    if config.backend.has_server_app() {
        dests.push(PackageDir::ServerApp);
    }
    if config.backend == Backend::Convex {
        dests.push(PackageDir::BackendPackage);
    }
    if config.has_api_package() {
        dests.push(PackageDir::ApiPackage);
    }
    if config.has_auth_package() {
        dests.push(PackageDir::AuthPackage);
    }
    if config.has_db_package() {
        dests.push(PackageDir::DbPackage);
    }
    dests
        .into_iter()
        .map(|dest| TemplateStep::file(ALCHEMY_DIR, ALCHEMY_ENV_DTS, dest))
        .collect()
}

fn web_deploy_segment(frontend: Frontend) -> Option<&'static str> {
    match frontend {
        Frontend::TanstackRouter => Some("react/tanstack-router"),
        Frontend::TanstackStart => Some("react/tanstack-start"),
        Frontend::ReactRouter => Some("react/react-router"),
        Frontend::Next => Some("react/next"),
        Frontend::Solid => Some("solid"),
        Frontend::Nuxt => Some("nuxt"),
        Frontend::Svelte => Some("svelte"),
        Frontend::NativeNativewind | Frontend::NativeUnistyles => None,
    }
}

fn locate_extras(config: &ProjectConfig) -> Vec<TemplateStep> {
    use crate::config::PackageManager;

    let mut steps = Vec::new();
    match config.package_manager {
        PackageManager::Pnpm => {
            steps.push(TemplateStep::file(
                "extras",
                "pnpm-workspace.yaml",
                PackageDir::Root,
            ));
            // Hoisting overrides needed by expo and nuxt module resolution.
            if config.has_native_frontend() || config.frontend.contains(&Frontend::Nuxt) {
                steps.push(TemplateStep::file("extras", "_npmrc.hbs", PackageDir::Root));
            }
        }
        PackageManager::Bun => {
            steps.push(TemplateStep::file("extras", "bunfig.toml.hbs", PackageDir::Root));
        }
        PackageManager::Npm => {}
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, ConfigOverrides, Runtime};
    use std::path::Path;

    fn config(overrides: ConfigOverrides) -> ProjectConfig {
        ConfigBuilder::new("test-app", "/tmp/test-app")
            .overrides(overrides)
            .build()
    }

    fn sources(steps: &[TemplateStep]) -> Vec<&Path> {
        steps.iter().map(|s| s.source.as_path()).collect()
    }

    #[test]
    fn test_react_web_ordering_general_to_specific() {
        let config = config(ConfigOverrides {
            frontend: Some(vec![Frontend::TanstackRouter]),
            ..Default::default()
        });
        let steps = locate(Concern::FrontendWeb, &config);
        assert_eq!(
            sources(&steps),
            vec![
                Path::new("frontend/react/web-base"),
                Path::new("frontend/react/tanstack-router"),
                Path::new("api/trpc/web/react/base"),
            ]
        );
        assert!(steps.iter().all(|s| s.dest == PackageDir::WebApp && s.overwrite));
    }

    #[test]
    fn test_fullstack_overlay_only_for_self_backend() {
        let fullstack = config(ConfigOverrides {
            frontend: Some(vec![Frontend::Next]),
            backend: Some(Backend::SelfHosted),
            runtime: Some(Runtime::None),
            ..Default::default()
        });
        let steps = locate(Concern::FrontendWeb, &fullstack);
        assert_eq!(
            steps.last().unwrap().source,
            Path::new("api/trpc/fullstack/next")
        );

        let split = config(ConfigOverrides {
            frontend: Some(vec![Frontend::Next]),
            backend: Some(Backend::Hono),
            ..Default::default()
        });
        let steps = locate(Concern::FrontendWeb, &split);
        assert!(!steps
            .iter()
            .any(|s| s.source.starts_with("api/trpc/fullstack")));
    }

    #[test]
    fn test_nuxt_gets_orpc_client_only() {
        let config = config(ConfigOverrides {
            frontend: Some(vec![Frontend::Nuxt]),
            api: Some(Api::Orpc),
            ..Default::default()
        });
        let steps = locate(Concern::FrontendWeb, &config);
        assert_eq!(
            sources(&steps),
            vec![Path::new("frontend/nuxt"), Path::new("api/orpc/web/nuxt")]
        );
    }

    #[test]
    fn test_native_frontend_steps() {
        let config = config(ConfigOverrides {
            frontend: Some(vec![Frontend::NativeUnistyles]),
            ..Default::default()
        });
        let steps = locate(Concern::FrontendNative, &config);
        assert_eq!(
            sources(&steps),
            vec![
                Path::new("frontend/native/native-base"),
                Path::new("frontend/native/unistyles"),
                Path::new("api/trpc/native"),
            ]
        );
        assert!(steps.iter().all(|s| s.dest == PackageDir::NativeApp));
    }

    #[test]
    fn test_backend_variants() {
        let hono = config(ConfigOverrides::default());
        assert_eq!(
            sources(&locate(Concern::BackendServer, &hono)),
            vec![
                Path::new("backend/server/base"),
                Path::new("backend/server/hono")
            ]
        );

        let convex = config(ConfigOverrides {
            backend: Some(Backend::Convex),
            runtime: Some(Runtime::None),
            database: Some(Database::None),
            orm: Some(Orm::None),
            api: Some(Api::None),
            auth: Some(Auth::None),
            ..Default::default()
        });
        let steps = locate(Concern::BackendServer, &convex);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].dest, PackageDir::BackendPackage);

        // `self` has no server app; api/db concerns cover it.
        let selfhost = config(ConfigOverrides {
            backend: Some(Backend::SelfHosted),
            runtime: Some(Runtime::None),
            frontend: Some(vec![Frontend::Next]),
            ..Default::default()
        });
        assert!(locate(Concern::BackendServer, &selfhost).is_empty());
        assert!(!locate(Concern::ApiPackage, &selfhost).is_empty());
        assert!(!locate(Concern::DbPackage, &selfhost).is_empty());
    }

    #[test]
    fn test_db_package_requires_database_and_orm() {
        let config_without_db = config(ConfigOverrides {
            database: Some(Database::None),
            orm: Some(Orm::None),
            auth: Some(Auth::None),
            ..Default::default()
        });
        assert!(locate(Concern::DbPackage, &config_without_db).is_empty());

        let with_db = config(ConfigOverrides {
            database: Some(Database::Postgres),
            orm: Some(Orm::Prisma),
            ..Default::default()
        });
        assert_eq!(
            sources(&locate(Concern::DbPackage, &with_db)),
            vec![Path::new("db/base"), Path::new("db/prisma/postgres")]
        );
    }

    #[test]
    fn test_auth_sequence_traditional_backend() {
        let config = config(ConfigOverrides {
            frontend: Some(vec![Frontend::TanstackRouter, Frontend::NativeNativewind]),
            auth: Some(Auth::BetterAuth),
            ..Default::default()
        });
        let steps = locate(Concern::Auth, &config);
        assert_eq!(
            sources(&steps),
            vec![
                Path::new("auth/better-auth/server/base"),
                Path::new("auth/better-auth/server/db/drizzle/sqlite"),
                Path::new("auth/better-auth/web/react/base"),
                Path::new("auth/better-auth/web/react/tanstack-router"),
                Path::new("auth/better-auth/native/native-base"),
                Path::new("auth/better-auth/native/nativewind"),
            ]
        );
        assert_eq!(steps[0].dest, PackageDir::AuthPackage);
        assert_eq!(steps[1].dest, PackageDir::DbPackage);
    }

    #[test]
    fn test_auth_convex_clerk() {
        let config = config(ConfigOverrides {
            backend: Some(Backend::Convex),
            runtime: Some(Runtime::None),
            database: Some(Database::None),
            orm: Some(Orm::None),
            api: Some(Api::None),
            auth: Some(Auth::Clerk),
            frontend: Some(vec![Frontend::TanstackRouter]),
            ..Default::default()
        });
        let steps = locate(Concern::Auth, &config);
        assert_eq!(
            sources(&steps),
            vec![
                Path::new("auth/clerk/convex/backend"),
                Path::new("auth/clerk/convex/web/react/tanstack-router"),
            ]
        );
        assert_eq!(steps[0].dest, PackageDir::BackendPackage);
    }

    #[test]
    fn test_example_overlays_never_overwrite() {
        let config = config(ConfigOverrides {
            examples: Some(vec![Example::Todo, Example::Ai]),
            ..Default::default()
        });
        let steps = locate(Concern::Examples, &config);
        assert!(!steps.is_empty());
        assert!(steps.iter().all(|s| !s.overwrite));
        // The AI example layers a shared web base before the framework overlay.
        assert!(steps
            .iter()
            .any(|s| s.source == Path::new("examples/ai/web/react/base")));
        assert!(!steps
            .iter()
            .any(|s| s.source == Path::new("examples/todo/web/react/base")));
    }

    #[test]
    fn test_pwa_addon_branches_on_bundler() {
        let next = config(ConfigOverrides {
            frontend: Some(vec![Frontend::Next]),
            addons: Some(vec![Addon::Pwa]),
            ..Default::default()
        });
        assert_eq!(
            sources(&locate(Concern::Addons, &next)),
            vec![Path::new("addons/pwa/apps/web/next")]
        );

        let vite = config(ConfigOverrides {
            frontend: Some(vec![Frontend::TanstackRouter]),
            addons: Some(vec![Addon::Pwa, Addon::Turborepo]),
            ..Default::default()
        });
        assert_eq!(
            sources(&locate(Concern::Addons, &vite)),
            vec![Path::new("addons/pwa/apps/web/vite"), Path::new("addons/turborepo")]
        );
    }

    #[test]
    fn test_deploy_wrangler_per_frontend() {
        let config = config(ConfigOverrides {
            frontend: Some(vec![Frontend::Svelte]),
            api: Some(Api::Orpc),
            web_deploy: Some(WebDeploy::Wrangler),
            server_deploy: Some(ServerDeploy::Wrangler),
            ..Default::default()
        });
        let steps = locate(Concern::Deploy, &config);
        assert_eq!(
            sources(&steps),
            vec![
                Path::new("deploy/wrangler/web/svelte"),
                Path::new("deploy/wrangler/server"),
            ]
        );
    }

    fn alchemy_env_dests(steps: &[TemplateStep]) -> Vec<PackageDir> {
        steps
            .iter()
            .filter(|s| s.files == FileSet::Only(vec![ALCHEMY_ENV_DTS.to_string()]))
            .map(|s| s.dest)
            .collect()
    }

    #[test]
    fn test_alchemy_distributes_env_typings_to_every_package() {
        let config = config(ConfigOverrides {
            server_deploy: Some(ServerDeploy::Alchemy),
            auth: Some(Auth::BetterAuth),
            ..Default::default()
        });
        let steps = locate(Concern::Deploy, &config);

        // Every generated package gets the typings file, exactly once each.
        assert_eq!(
            alchemy_env_dests(&steps),
            vec![
                PackageDir::WebApp,
                PackageDir::ServerApp,
                PackageDir::ApiPackage,
                PackageDir::AuthPackage,
                PackageDir::DbPackage,
            ]
        );
        let run_steps = steps
            .iter()
            .filter(|s| s.files == FileSet::Only(vec![ALCHEMY_RUN.to_string()]))
            .count();
        assert_eq!(run_steps, 1);
    }

    #[test]
    fn test_alchemy_env_typings_cover_native_and_convex() {
        let native = config(ConfigOverrides {
            frontend: Some(vec![Frontend::TanstackRouter, Frontend::NativeNativewind]),
            web_deploy: Some(WebDeploy::Alchemy),
            server_deploy: Some(ServerDeploy::Alchemy),
            ..Default::default()
        });
        let dests = alchemy_env_dests(&locate(Concern::Deploy, &native));
        assert!(dests.contains(&PackageDir::NativeApp));
        assert!(dests.contains(&PackageDir::WebApp));

        let convex = config(ConfigOverrides {
            backend: Some(Backend::Convex),
            runtime: Some(Runtime::None),
            api: Some(Api::None),
            database: Some(Database::None),
            orm: Some(Orm::None),
            web_deploy: Some(WebDeploy::Alchemy),
            ..Default::default()
        });
        let dests = alchemy_env_dests(&locate(Concern::Deploy, &convex));
        assert!(dests.contains(&PackageDir::BackendPackage));
        assert!(dests.contains(&PackageDir::WebApp));
        assert!(!dests.contains(&PackageDir::ServerApp));
    }

    #[test]
    fn test_extras_per_package_manager() {
        use crate::config::PackageManager;

        let pnpm_native = config(ConfigOverrides {
            package_manager: Some(PackageManager::Pnpm),
            frontend: Some(vec![Frontend::TanstackRouter, Frontend::NativeNativewind]),
            ..Default::default()
        });
        let steps = locate(Concern::Extras, &pnpm_native);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].files, FileSet::Only(vec!["pnpm-workspace.yaml".into()]));
        assert_eq!(steps[1].files, FileSet::Only(vec!["_npmrc.hbs".into()]));

        let bun = config(ConfigOverrides {
            package_manager: Some(PackageManager::Bun),
            ..Default::default()
        });
        let steps = locate(Concern::Extras, &bun);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].files, FileSet::Only(vec!["bunfig.toml.hbs".into()]));

        let npm = config(ConfigOverrides {
            package_manager: Some(PackageManager::Npm),
            ..Default::default()
        });
        assert!(locate(Concern::Extras, &npm).is_empty());
    }
}
