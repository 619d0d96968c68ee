//! tstack CLI - Scaffolding for full-stack TypeScript projects

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tstack_core::config::{
    Addon, Api, Auth, Backend, ConfigOverrides, Database, DbSetup, Example, Frontend, Orm,
    PackageManager, Payments, Runtime, ServerDeploy, WebDeploy,
};
use tstack_core::tui::CreateArgs;

#[derive(Parser, Debug)]
#[command(name = "create-tstack")]
#[command(about = "CLI for scaffolding full-stack TypeScript projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Project directory to create (defaults to ./<name>)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Local template pack directory (defaults to $TSTACK_TEMPLATE_DIR, then ./templates)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Frontend frameworks (comma-separated, e.g. tanstack-router,native-nativewind)
    #[arg(long, value_delimiter = ',')]
    pub frontend: Option<Vec<Frontend>>,

    /// Backend framework
    #[arg(long)]
    pub backend: Option<Backend>,

    /// JavaScript runtime
    #[arg(long)]
    pub runtime: Option<Runtime>,

    /// API layer
    #[arg(long)]
    pub api: Option<Api>,

    /// Database engine
    #[arg(long)]
    pub database: Option<Database>,

    /// ORM
    #[arg(long)]
    pub orm: Option<Orm>,

    /// Authentication provider
    #[arg(long)]
    pub auth: Option<Auth>,

    /// Payments provider
    #[arg(long)]
    pub payments: Option<Payments>,

    /// Addons (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub addons: Option<Vec<Addon>>,

    /// Example apps (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub examples: Option<Vec<Example>>,

    /// Local database setup
    #[arg(long = "db-setup")]
    pub db_setup: Option<DbSetup>,

    /// Web deployment target
    #[arg(long = "web-deploy")]
    pub web_deploy: Option<WebDeploy>,

    /// Server deployment target
    #[arg(long = "server-deploy")]
    pub server_deploy: Option<ServerDeploy>,

    /// Package manager for the generated workspace
    #[arg(short = 'p', long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            project_name: args.name,
            directory: args.directory,
            template_dir: args.template_dir,
            overrides: ConfigOverrides {
                frontend: args.frontend,
                backend: args.backend,
                runtime: args.runtime,
                api: args.api,
                database: args.database,
                orm: args.orm,
                auth: args.auth,
                payments: args.payments,
                addons: args.addons,
                examples: args.examples,
                db_setup: args.db_setup,
                web_deploy: args.web_deploy,
                server_deploy: args.server_deploy,
                package_manager: args.package_manager,
                git: None,
                install: None,
            },
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        // No subcommand provided, default to interactive create
        None => CreateArgs::default(),
    };

    let result = tstack_core::run(create_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
