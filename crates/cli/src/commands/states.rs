use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::utils::{self, PlaneContext};

#[derive(Args, Debug, Clone)]
pub struct StatesArgs {
    #[command(subcommand)]
    command: StatesCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum StatesCommands {
    /// List workflow states of a project
    List {
        /// Project id, identifier, slug or name
        #[arg(short, long)]
        project: Option<String>,
    },
}

pub async fn execute(args: StatesArgs, ctx: &PlaneContext<'_>) -> Result<()> {
    match args.command {
        StatesCommands::List { project } => list_states(ctx, project.as_deref()).await,
    }
}

async fn list_states(ctx: &PlaneContext<'_>, project: Option<&str>) -> Result<()> {
    let reference = ctx.project_reference(project)?;
    let project_id = utils::resolve_project_reference(ctx, reference).await?;

    let states = ctx
        .client
        .list_states(&project_id)
        .await
        .context("Failed to list states")?;

    if states.is_empty() {
        tracing::info!("No workflow states in this project.");
        return Ok(());
    }

    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        group: &'a str,
        id: &'a str,
    }

    let rows: Vec<Row<'_>> = states
        .iter()
        .map(|state| Row {
            name: state.name.as_str(),
            group: state.group.as_deref().unwrap_or(""),
            id: state.id.as_str(),
        })
        .collect();

    ctx.renderer.render(&rows)
}
