use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use plane_cli_config::{Config, Profile};
use plane_cli_output::{print_success, OutputRenderer};
use serde::Serialize;
use url::Url;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommands {
    /// Create or update a connection profile
    Init {
        /// Base URL of the Plane instance, e.g. https://api.plane.so
        #[arg(long)]
        base_url: String,

        /// Workspace slug the profile operates on
        #[arg(long)]
        workspace: String,

        /// API key; prompted for interactively when omitted
        #[arg(long)]
        api_key: Option<String>,

        /// Default project reference for commands without --project
        #[arg(long)]
        project: Option<String>,

        /// Profile name to write
        #[arg(long, default_value = "default")]
        profile: String,
    },

    /// Show configured profiles with the API key redacted
    Show,
}

pub fn execute(
    args: ConfigArgs,
    mut config: Config,
    config_path: Option<&Path>,
    renderer: &OutputRenderer,
) -> Result<()> {
    match args.command {
        ConfigCommands::Init {
            base_url,
            workspace,
            api_key,
            project,
            profile,
        } => init_profile(
            &mut config,
            config_path,
            base_url,
            workspace,
            api_key,
            project,
            profile,
        ),
        ConfigCommands::Show => show_profiles(&config, renderer),
    }
}

fn init_profile(
    config: &mut Config,
    config_path: Option<&Path>,
    base_url: String,
    workspace: String,
    api_key: Option<String>,
    project: Option<String>,
    profile_name: String,
) -> Result<()> {
    Url::parse(&base_url).with_context(|| format!("Invalid base URL '{base_url}'"))?;

    let api_key = match api_key {
        Some(key) => key,
        None => rpassword::prompt_password("API key: ").context("Failed to read API key")?,
    };

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let profile = Profile {
        base_url: Some(base_url.trim_end_matches('/').to_string()),
        workspace: Some(workspace),
        api_key: Some(api_key),
        project,
    };

    config.profiles.insert(profile_name.clone(), profile);
    if config.default_profile.is_none() {
        config.default_profile = Some(profile_name.clone());
    }

    config.save(config_path)?;
    print_success(&format!("Profile '{profile_name}' saved"));
    Ok(())
}

fn show_profiles(config: &Config, renderer: &OutputRenderer) -> Result<()> {
    if config.profiles.is_empty() {
        tracing::info!("No profiles configured. Run `plane-cli config init` first.");
        return Ok(());
    }

    #[derive(Serialize)]
    struct Row<'a> {
        profile: &'a str,
        base_url: &'a str,
        workspace: &'a str,
        project: &'a str,
        api_key: &'a str,
        default: bool,
    }

    let mut entries: Vec<(&String, &Profile)> = config.profiles.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let rows: Vec<Row<'_>> = entries
        .iter()
        .map(|(name, profile)| Row {
            profile: name.as_str(),
            base_url: profile.base_url.as_deref().unwrap_or(""),
            workspace: profile.workspace.as_deref().unwrap_or(""),
            project: profile.project.as_deref().unwrap_or(""),
            api_key: if profile.api_key.is_some() {
                "(set)"
            } else {
                ""
            },
            default: config.default_profile.as_deref() == Some(name.as_str()),
        })
        .collect();

    renderer.render(&rows)
}
