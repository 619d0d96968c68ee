//! tstack Core - Shared library for stack scaffolding CLIs
//!
//! This library composes full-stack TypeScript project scaffolds from a
//! local template pack. A resolved [`config::ProjectConfig`] selects one
//! value per stack axis (frontend, backend, runtime, api, database, orm,
//! auth, payments, addons, examples, db setup, deploy targets); the library
//! validates the combination, locates the matching template subtrees,
//! renders them into the destination tree, and wires the generated
//! workspace packages together.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure config validation and template path
//!   computation ([`validate`], [`templates::locator`])
//! - **Layer 2: Composition** - Subtree rendering, manifest merging, and
//!   workspace wiring ([`templates::renderer`], [`manifest`], [`wire`])
//! - **Layer 3: Orchestration and TUI** - The [`project::create_project`]
//!   driver, plus optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based interactive prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use tstack_core::config::{ConfigBuilder, ConfigOverrides};
//! use tstack_core::project::create_project;
//!
//! let config = ConfigBuilder::new("my-app", "/tmp/my-app")
//!     .overrides(ConfigOverrides::default())
//!     .build();
//! let summary = create_project(&config, pack_root).await?;
//! println!("wrote {} files", summary.files_written);
//! ```

pub mod config;
pub mod manifest;
pub mod project;
pub mod templates;
pub mod validate;
pub mod wire;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigBuilder, ConfigOverrides, ProjectConfig};
pub use project::{create_project, CreateError, ProjectSummary};
pub use validate::{validate as validate_config, IncompatibleConfig};

#[cfg(feature = "tui")]
pub use tui::{run, CreateArgs};
