//! Cross-axis compatibility validation
//!
//! Rules are independent predicates evaluated in a fixed order; the first
//! failing rule is returned. Messages are stable and user-facing: the CLI
//! prints them verbatim and the test suite asserts on their content, so treat
//! any wording change as a breaking change.

use crate::config::{Addon, Api, Auth, Backend, Database, Frontend, Orm, ProjectConfig, Runtime};
use crate::config::{ServerDeploy, WebDeploy};
use thiserror::Error;

/// A configuration rejected by the compatibility rules.
///
/// Returned (never panicked) so callers can distinguish bad input from
/// system failure and re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncompatibleConfig {
    #[error("tRPC API is not supported with '{0}' frontend. Use '--api orpc' instead.")]
    TrpcFrontend(Frontend),

    #[error("Cloudflare Workers runtime (--runtime workers) is only supported with Hono backend (--backend hono).")]
    WorkersRequiresHono,

    #[error("Convex backend requires '--runtime none'.")]
    ConvexRuntime,

    #[error("Backend 'none' requires '--runtime none'.")]
    NoBackendRuntime,

    #[error("'--runtime none' is only supported with '--backend convex' or '--backend none'.")]
    RuntimeNoneBackend,

    #[error("Convex backend requires '--database none'.")]
    ConvexDatabase,

    #[error("Convex backend requires '--orm none'.")]
    ConvexOrm,

    #[error("Convex backend requires '--api none'.")]
    ConvexApi,

    #[error("Cloudflare Workers runtime (--runtime workers) is not compatible with MongoDB database.")]
    WorkersMongodb,

    #[error("Cloudflare Workers runtime requires a server deployment. Set '--server-deploy' to a supported provider.")]
    WorkersServerDeploy,

    #[error("Backend 'none' requires '--server-deploy none'. Please remove the --server-deploy flag or set it to 'none'.")]
    NoBackendServerDeploy,

    #[error("Convex backend requires '--server-deploy none'.")]
    ConvexServerDeploy,

    #[error("'--web-deploy' requires a web frontend. Select a web frontend or set '--web-deploy none'.")]
    WebDeployNoWebFrontend,

    #[error("Cannot use '--examples' when '--api' is set to 'none' (examples need an API layer unless the backend is Convex).")]
    ExamplesWithoutApi,

    #[error("'--orm {0}' requires a database. Select a database or set '--orm none'.")]
    OrmWithoutDatabase(Orm),

    #[error("Mongoose ORM requires '--database mongodb'.")]
    MongooseDatabase,

    #[error("MongoDB database requires '--orm mongoose' or '--orm prisma'.")]
    MongodbOrm,

    #[error("Auth provider '{0}' requires a database. Select a database or set '--auth none'.")]
    AuthWithoutDatabase(Auth),

    #[error("The '{addon}' addon requires one of these frontends: {expected}.")]
    AddonFrontend { addon: Addon, expected: String },
}

/// Check a fully resolved configuration against every compatibility rule.
/// Fail-fast: the first violated rule is returned, not an aggregate.
pub fn validate(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    check_api_frontend(config)?;
    check_backend_runtime(config)?;
    check_convex_constraints(config)?;
    check_workers_constraints(config)?;
    check_deploy_targets(config)?;
    check_examples(config)?;
    check_database_orm(config)?;
    check_auth(config)?;
    check_addons(config)?;
    Ok(())
}

/// tRPC ships React/native client bindings only; oRPC covers every frontend.
fn check_api_frontend(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.api != Api::Trpc {
        return Ok(());
    }
    for frontend in &config.frontend {
        if matches!(frontend, Frontend::Nuxt | Frontend::Svelte | Frontend::Solid) {
            return Err(IncompatibleConfig::TrpcFrontend(*frontend));
        }
    }
    Ok(())
}

fn check_backend_runtime(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    match (config.backend, config.runtime) {
        (Backend::Convex, Runtime::None) | (Backend::None, Runtime::None) => Ok(()),
        (Backend::Convex, _) => Err(IncompatibleConfig::ConvexRuntime),
        (Backend::None, _) => Err(IncompatibleConfig::NoBackendRuntime),
        (Backend::Hono, Runtime::Workers) => Ok(()),
        (_, Runtime::Workers) => Err(IncompatibleConfig::WorkersRequiresHono),
        // `self` embeds the API in the web framework and runs on its runtime.
        (Backend::SelfHosted, Runtime::None) => Ok(()),
        (_, Runtime::None) => Err(IncompatibleConfig::RuntimeNoneBackend),
        _ => Ok(()),
    }
}

fn check_convex_constraints(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.backend != Backend::Convex {
        return Ok(());
    }
    if config.database != Database::None {
        return Err(IncompatibleConfig::ConvexDatabase);
    }
    if config.orm != Orm::None {
        return Err(IncompatibleConfig::ConvexOrm);
    }
    if config.api != Api::None {
        return Err(IncompatibleConfig::ConvexApi);
    }
    Ok(())
}

fn check_workers_constraints(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.runtime != Runtime::Workers {
        return Ok(());
    }
    if config.database == Database::Mongodb {
        return Err(IncompatibleConfig::WorkersMongodb);
    }
    if config.server_deploy == ServerDeploy::None {
        return Err(IncompatibleConfig::WorkersServerDeploy);
    }
    Ok(())
}

fn check_deploy_targets(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.server_deploy != ServerDeploy::None {
        if config.backend == Backend::None {
            return Err(IncompatibleConfig::NoBackendServerDeploy);
        }
        if config.backend == Backend::Convex {
            return Err(IncompatibleConfig::ConvexServerDeploy);
        }
    }
    if config.web_deploy != WebDeploy::None && !config.has_web_frontend() {
        return Err(IncompatibleConfig::WebDeployNoWebFrontend);
    }
    Ok(())
}

/// Examples need an API layer, except under Convex where they target Convex
/// functions directly.
fn check_examples(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.active_examples().is_empty() {
        return Ok(());
    }
    if config.api == Api::None && config.backend != Backend::Convex {
        return Err(IncompatibleConfig::ExamplesWithoutApi);
    }
    Ok(())
}

fn check_database_orm(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.orm != Orm::None && config.database == Database::None {
        return Err(IncompatibleConfig::OrmWithoutDatabase(config.orm));
    }
    if config.orm == Orm::Mongoose && config.database != Database::Mongodb {
        return Err(IncompatibleConfig::MongooseDatabase);
    }
    if config.database == Database::Mongodb
        && !matches!(config.orm, Orm::Mongoose | Orm::Prisma)
    {
        return Err(IncompatibleConfig::MongodbOrm);
    }
    Ok(())
}

/// Traditional auth providers persist sessions and need a database; Convex
/// brings its own storage so the rule does not apply there.
fn check_auth(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    if config.auth == Auth::None || config.backend == Backend::Convex {
        return Ok(());
    }
    if config.database == Database::None {
        return Err(IncompatibleConfig::AuthWithoutDatabase(config.auth));
    }
    Ok(())
}

fn check_addons(config: &ProjectConfig) -> Result<(), IncompatibleConfig> {
    for addon in config.active_addons() {
        let compatible = addon.compatible_frontends();
        if compatible.is_empty() {
            continue;
        }
        if !config.frontend.iter().any(|f| compatible.contains(f)) {
            return Err(IncompatibleConfig::AddonFrontend {
                addon,
                expected: compatible
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }
    Ok(())
}
