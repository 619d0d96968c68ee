//! Project configuration model
//!
//! Every configuration axis is a closed enum; the resolved [`ProjectConfig`]
//! record doubles as the variable context for template rendering (serialized
//! with camelCase keys, matching `{{field}}` placeholders in template files).

mod builder;

pub use builder::{ConfigBuilder, ConfigOverrides};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Declares the CLI identifier for each enum variant and derives
/// `FromStr`/`Display` plus an `ALL` listing from it.
macro_rules! config_axis {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// CLI-facing identifier, also used as a template path segment.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", stringify!($name), " '{}', expected one of: {}"),
                        other,
                        [$($s),+].join(", ")
                    )),
                }
            }
        }
    };
}

config_axis! {
    /// Frontend variants: web frameworks plus native styling flavours.
    Frontend {
        TanstackRouter => "tanstack-router",
        ReactRouter => "react-router",
        TanstackStart => "tanstack-start",
        Next => "next",
        Nuxt => "nuxt",
        Svelte => "svelte",
        Solid => "solid",
        NativeNativewind => "native-nativewind",
        NativeUnistyles => "native-unistyles",
    }
}

impl Frontend {
    pub fn is_native(&self) -> bool {
        matches!(self, Frontend::NativeNativewind | Frontend::NativeUnistyles)
    }

    pub fn is_web(&self) -> bool {
        !self.is_native()
    }

    /// React-based web frameworks share the `react/` template family.
    pub fn is_react_web(&self) -> bool {
        matches!(
            self,
            Frontend::TanstackRouter
                | Frontend::ReactRouter
                | Frontend::TanstackStart
                | Frontend::Next
        )
    }

    /// Template path segment for the native styling flavour.
    pub fn native_segment(&self) -> Option<&'static str> {
        match self {
            Frontend::NativeNativewind => Some("nativewind"),
            Frontend::NativeUnistyles => Some("unistyles"),
            _ => None,
        }
    }
}

config_axis! {
    Backend {
        None => "none",
        SelfHosted => "self",
        Convex => "convex",
        Hono => "hono",
        Express => "express",
        Fastify => "fastify",
        Elysia => "elysia",
        Next => "next",
    }
}

impl Backend {
    /// Backends that produce a standalone `apps/server` application.
    pub fn has_server_app(&self) -> bool {
        !matches!(self, Backend::None | Backend::SelfHosted | Backend::Convex)
    }
}

config_axis! {
    Runtime {
        None => "none",
        Bun => "bun",
        Node => "node",
        Workers => "workers",
    }
}

config_axis! {
    Api {
        None => "none",
        Trpc => "trpc",
        Orpc => "orpc",
    }
}

config_axis! {
    Database {
        None => "none",
        Sqlite => "sqlite",
        Postgres => "postgres",
        Mysql => "mysql",
        Mongodb => "mongodb",
    }
}

config_axis! {
    Orm {
        None => "none",
        Drizzle => "drizzle",
        Prisma => "prisma",
        Mongoose => "mongoose",
    }
}

config_axis! {
    Auth {
        None => "none",
        BetterAuth => "better-auth",
        Clerk => "clerk",
    }
}

config_axis! {
    Payments {
        None => "none",
        Polar => "polar",
    }
}

config_axis! {
    Addon {
        Pwa => "pwa",
        Tauri => "tauri",
        Biome => "biome",
        Husky => "husky",
        Turborepo => "turborepo",
        Starlight => "starlight",
        Ultracite => "ultracite",
        Ruler => "ruler",
        Oxlint => "oxlint",
        Fumadocs => "fumadocs",
        Docker => "docker",
        None => "none",
    }
}

impl Addon {
    /// Frontends an addon is restricted to. An empty list means the addon
    /// carries no frontend constraint.
    pub fn compatible_frontends(&self) -> &'static [Frontend] {
        match self {
            Addon::Pwa => &[
                Frontend::TanstackRouter,
                Frontend::ReactRouter,
                Frontend::Solid,
                Frontend::Next,
            ],
            Addon::Tauri => &[
                Frontend::TanstackRouter,
                Frontend::ReactRouter,
                Frontend::Nuxt,
                Frontend::Svelte,
                Frontend::Solid,
                Frontend::Next,
            ],
            _ => &[],
        }
    }
}

config_axis! {
    Example {
        Todo => "todo",
        Ai => "ai",
        None => "none",
    }
}

config_axis! {
    /// Database provisioning strategy; only `docker` contributes templates,
    /// the hosted setups are handled by external provisioning collaborators.
    DbSetup {
        None => "none",
        Docker => "docker",
        Turso => "turso",
        D1 => "d1",
        Neon => "neon",
        Atlas => "atlas",
    }
}

config_axis! {
    WebDeploy {
        None => "none",
        Wrangler => "wrangler",
        Alchemy => "alchemy",
    }
}

config_axis! {
    ServerDeploy {
        None => "none",
        Wrangler => "wrangler",
        Alchemy => "alchemy",
    }
}

config_axis! {
    PackageManager {
        Npm => "npm",
        Pnpm => "pnpm",
        Bun => "bun",
    }
}

/// Fully resolved project configuration.
///
/// Must pass [`crate::validate::validate`] before composition begins;
/// the composer assumes internal consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    pub project_dir: PathBuf,
    /// Order-preserving set; may mix one web and one native variant.
    pub frontend: Vec<Frontend>,
    pub backend: Backend,
    pub runtime: Runtime,
    pub api: Api,
    pub database: Database,
    pub orm: Orm,
    pub auth: Auth,
    pub payments: Payments,
    pub addons: Vec<Addon>,
    pub examples: Vec<Example>,
    pub db_setup: DbSetup,
    pub web_deploy: WebDeploy,
    pub server_deploy: ServerDeploy,
    pub package_manager: PackageManager,
    pub git: bool,
    pub install: bool,
}

impl ProjectConfig {
    pub fn has_web_frontend(&self) -> bool {
        self.frontend.iter().any(|f| f.is_web())
    }

    pub fn has_native_frontend(&self) -> bool {
        self.frontend.iter().any(|f| f.is_native())
    }

    /// First React-based web framework in the frontend set, if any.
    pub fn react_web_frontend(&self) -> Option<Frontend> {
        self.frontend.iter().copied().find(|f| f.is_react_web())
    }

    /// First non-React web framework (nuxt, svelte, solid), if any.
    pub fn other_web_frontend(&self) -> Option<Frontend> {
        self.frontend
            .iter()
            .copied()
            .find(|f| f.is_web() && !f.is_react_web())
    }

    /// Template segment of the selected native styling flavour, if any.
    pub fn native_segment(&self) -> Option<&'static str> {
        self.frontend.iter().find_map(|f| f.native_segment())
    }

    pub fn has_db_package(&self) -> bool {
        self.database != Database::None
            && self.orm != Orm::None
            && !matches!(self.backend, Backend::None | Backend::Convex)
    }

    pub fn has_api_package(&self) -> bool {
        self.api != Api::None && !matches!(self.backend, Backend::None | Backend::Convex)
    }

    pub fn has_auth_package(&self) -> bool {
        self.auth != Auth::None && !matches!(self.backend, Backend::None | Backend::Convex)
    }

    /// Examples resolve to an empty set when only `none` was given.
    pub fn active_examples(&self) -> Vec<Example> {
        self.examples
            .iter()
            .copied()
            .filter(|e| *e != Example::None)
            .collect()
    }

    /// Active addons, with the `none` placeholder removed.
    pub fn active_addons(&self) -> Vec<Addon> {
        self.addons
            .iter()
            .copied()
            .filter(|a| *a != Addon::None)
            .collect()
    }
}
