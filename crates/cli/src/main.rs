mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use commands::utils::PlaneContext;
use plane_cli_api::error::ApiError;
use plane_cli_api::PlaneClient;
use plane_cli_config::{Config, Profile};
use plane_cli_output::{print_error, print_warning, OutputFormat, OutputRenderer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "plane-cli", version, about = "CLI for Plane project tracking", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.plane-cli/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: PlaneCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum PlaneCommand {
    /// Inspect and resolve workspace projects
    Projects(commands::projects::ProjectsArgs),
    /// List and create issues
    Issues(commands::issues::IssuesArgs),
    /// Inspect workflow states
    States(commands::states::StatesArgs),
    /// Create a batch of issues from a plan file
    Seed(commands::seed::SeedArgs),
    /// Manage configuration profiles
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.debug)?;

    let config_path = cli.config.clone();
    let config = Config::load(config_path.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);

    match cli.command {
        PlaneCommand::Config(args) => {
            commands::config::execute(args, config, config_path.as_deref(), &renderer)
        }
        PlaneCommand::Projects(args) => {
            let ctx = workspace_context(&config, cli.profile.as_deref(), &renderer)?;
            commands::projects::execute(args, &ctx).await
        }
        PlaneCommand::Issues(args) => {
            let ctx = workspace_context(&config, cli.profile.as_deref(), &renderer)?;
            commands::issues::execute(args, &ctx).await
        }
        PlaneCommand::States(args) => {
            let ctx = workspace_context(&config, cli.profile.as_deref(), &renderer)?;
            commands::states::execute(args, &ctx).await
        }
        PlaneCommand::Seed(args) => {
            let ctx = workspace_context(&config, cli.profile.as_deref(), &renderer)?;
            commands::seed::execute(args, &ctx).await
        }
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,plane_cli=debug,plane_cli_api=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn report_error(err: &anyhow::Error) {
    print_error(&format!("{err:#}"));

    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        if let Some(hint) = api_err.suggestion() {
            print_warning(hint);
        }
    }
}

struct ActiveProfile {
    base_url: String,
    workspace: String,
    api_key: String,
    project: Option<String>,
}

fn workspace_context<'a>(
    config: &Config,
    requested_profile: Option<&str>,
    renderer: &'a OutputRenderer,
) -> Result<PlaneContext<'a>> {
    let profile = resolve_active_profile(config, requested_profile)?;
    let client = PlaneClient::new(&profile.base_url, profile.api_key, profile.workspace)?;

    Ok(PlaneContext {
        client,
        renderer,
        default_project: profile.project,
    })
}

fn resolve_active_profile(config: &Config, requested: Option<&str>) -> Result<ActiveProfile> {
    let resolved = config.resolve_profile(requested);

    if let Some(name) = requested {
        if resolved.is_none() {
            return Err(anyhow!("Profile '{name}' not found in the config file."));
        }
    }

    // Operation without any config file is supported as long as the
    // environment carries the connection values.
    let (name, profile) = match resolved {
        Some((name, profile)) => (name.to_string(), profile.clone()),
        None => ("default".to_string(), Profile::default()),
    };

    // Multi-tier key lookup: profile-specific env var → generic env var → config file
    let api_key = {
        let profile_env_var = format!("PLANE_CLI_API_KEY_{}", name.to_uppercase());
        env_value(&profile_env_var)
            .or_else(|| env_value("PLANE_API_KEY"))
            .or_else(|| profile.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No API key found for profile '{name}'. Set PLANE_API_KEY or run `plane-cli config init`."
                )
            })?
    };

    let base_url = profile
        .base_url
        .clone()
        .or_else(|| env_value("PLANE_BASE_URL"))
        .ok_or_else(|| {
            anyhow!(
                "Profile '{name}' is missing a base_url. Set PLANE_BASE_URL or run `plane-cli config init`."
            )
        })?;

    let workspace = profile
        .workspace
        .clone()
        .or_else(|| env_value("PLANE_WORKSPACE_SLUG"))
        .ok_or_else(|| {
            anyhow!(
                "Profile '{name}' is missing a workspace. Set PLANE_WORKSPACE_SLUG or run `plane-cli config init`."
            )
        })?;

    Ok(ActiveProfile {
        base_url,
        workspace,
        api_key,
        project: profile.project,
    })
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
