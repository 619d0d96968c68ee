//! Charm-style CLI prompts using cliclack

use crate::config::{
    Addon, Api, Auth, Backend, ConfigBuilder, ConfigOverrides, Database, DbSetup, Example,
    Frontend, Orm, PackageManager, Payments, ProjectConfig, Runtime, ServerDeploy, WebDeploy,
};
use crate::project::{create_project, CreateError, ProjectSummary};
use anyhow::Result;
use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

/// Environment variable pointing at a local template pack.
const TEMPLATE_DIR_ENV: &str = "TSTACK_TEMPLATE_DIR";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name; prompted for when absent
    pub project_name: Option<String>,

    /// Destination directory; defaults to `./<project-name>`
    pub directory: Option<PathBuf>,

    /// Template pack root; falls back to $TSTACK_TEMPLATE_DIR, then `./templates`
    pub template_dir: Option<PathBuf>,

    /// Axes already fixed by flags; unset axes are prompted for
    pub overrides: ConfigOverrides,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs) -> Result<()> {
    cliclack::intro("create-tstack-app")?;

    let project_name = select_project_name(&args)?;
    let project_dir = select_directory(&args, &project_name)?;

    let overrides = if args.yes {
        args.overrides.clone()
    } else {
        fill_overrides(args.overrides.clone())?
    };

    let config = ConfigBuilder::new(&project_name, &project_dir)
        .overrides(overrides)
        .build();
    let pack_root = resolve_pack_root(&args);

    let spinner = cliclack::spinner();
    spinner.start("Composing project...");

    match create_project(&config, &pack_root).await {
        Ok(summary) => {
            spinner.stop(format!(
                "Created {} files in {}",
                summary.files_written,
                summary.project_dir.display()
            ));
            print_next_steps(&config, &summary)?;
            Ok(())
        }
        Err(CreateError::Invalid(e)) => {
            spinner.stop("Incompatible configuration");
            cliclack::log::error(e.to_string())?;
            anyhow::bail!("Setup cancelled.")
        }
        Err(CreateError::Failed(e)) => {
            spinner.stop("Failed to create project");
            Err(e)
        }
    }
}

fn resolve_pack_root(args: &CreateArgs) -> PathBuf {
    args.template_dir
        .clone()
        .or_else(|| std::env::var_os(TEMPLATE_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("templates"))
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.project_name {
        return Ok(name.clone());
    }
    if args.yes {
        return Ok("my-app".to_string());
    }

    let name: String = cliclack::input("Project name")
        .placeholder("my-app")
        .default_input("my-app")
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Project name cannot be empty")
            } else if input.contains('/') || input.contains('\\') {
                Err("Project name cannot contain path separators")
            } else {
                Ok(())
            }
        })
        .interact()?;

    Ok(name)
}

fn select_directory(args: &CreateArgs, project_name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir.join(project_name),
    };

    // Warn if directory exists and has files
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

/// Single-choice prompt over one configuration axis.
fn select_axis<T>(prompt: &str, options: &[T], initial: T) -> Result<T>
where
    T: Copy + PartialEq + fmt::Display,
{
    let initial_idx = options.iter().position(|o| *o == initial).unwrap_or(0);
    let mut select = cliclack::select(prompt).initial_value(initial_idx);
    for (idx, option) in options.iter().enumerate() {
        select = select.item(idx, option.to_string(), "");
    }
    let selected: usize = select.interact()?;
    Ok(options[selected])
}

/// Multi-choice prompt over one configuration axis; empty selection allowed.
fn multiselect_axis<T>(prompt: &str, options: &[T], initial: &[T]) -> Result<Vec<T>>
where
    T: Copy + PartialEq + fmt::Display,
{
    let initial_idxs: Vec<usize> = initial
        .iter()
        .filter_map(|v| options.iter().position(|o| o == v))
        .collect();
    let mut multi = cliclack::multiselect(prompt).initial_values(initial_idxs);
    for (idx, option) in options.iter().enumerate() {
        multi = multi.item(idx, option.to_string(), "");
    }
    let selected: Vec<usize> = multi.required(false).interact()?;
    Ok(selected.into_iter().map(|idx| options[idx]).collect())
}

/// Prompt for every axis the caller did not fix with a flag.
fn fill_overrides(mut o: ConfigOverrides) -> Result<ConfigOverrides> {
    if o.frontend.is_none() {
        o.frontend = Some(multiselect_axis(
            "Frontend (web and/or native)",
            Frontend::ALL,
            &[Frontend::TanstackRouter],
        )?);
    }
    if o.backend.is_none() {
        o.backend = Some(select_axis("Backend", Backend::ALL, Backend::Hono)?);
    }
    if o.runtime.is_none() {
        o.runtime = Some(select_axis("Runtime", Runtime::ALL, Runtime::Bun)?);
    }
    if o.api.is_none() {
        o.api = Some(select_axis("API layer", Api::ALL, Api::Trpc)?);
    }
    if o.database.is_none() {
        o.database = Some(select_axis("Database", Database::ALL, Database::Sqlite)?);
    }
    if o.orm.is_none() {
        o.orm = Some(select_axis("ORM", Orm::ALL, Orm::Drizzle)?);
    }
    if o.auth.is_none() {
        o.auth = Some(select_axis("Authentication", Auth::ALL, Auth::BetterAuth)?);
    }
    if o.payments.is_none() {
        o.payments = Some(select_axis("Payments", Payments::ALL, Payments::None)?);
    }
    if o.addons.is_none() {
        o.addons = Some(multiselect_axis(
            "Addons",
            Addon::ALL,
            &[Addon::Turborepo],
        )?);
    }
    if o.examples.is_none() {
        o.examples = Some(multiselect_axis("Examples", Example::ALL, &[])?);
    }
    if o.db_setup.is_none() {
        o.db_setup = Some(select_axis("Database setup", DbSetup::ALL, DbSetup::None)?);
    }
    if o.web_deploy.is_none() {
        o.web_deploy = Some(select_axis("Web deploy", WebDeploy::ALL, WebDeploy::None)?);
    }
    if o.server_deploy.is_none() {
        o.server_deploy = Some(select_axis(
            "Server deploy",
            ServerDeploy::ALL,
            ServerDeploy::None,
        )?);
    }
    if o.package_manager.is_none() {
        o.package_manager = Some(select_axis(
            "Package manager",
            PackageManager::ALL,
            PackageManager::Npm,
        )?);
    }
    Ok(o)
}

fn print_next_steps(config: &ProjectConfig, summary: &ProjectSummary) -> Result<()> {
    let pm = config.package_manager.as_str();
    let mut steps = vec![format!("cd {}", summary.project_dir.display())];
    steps.push(format!("{pm} install"));
    if config.db_setup == DbSetup::Docker {
        steps.push(format!("{pm} run db:start"));
    }
    if config.has_db_package() {
        steps.push(format!("{pm} run db:push"));
    }
    steps.push(format!("{pm} run dev"));

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", format!("{}", i + 1).cyan(), step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
