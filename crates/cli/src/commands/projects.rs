use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::utils::PlaneContext;

#[derive(Args, Debug, Clone)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    command: ProjectsCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum ProjectsCommands {
    /// List projects in the workspace
    List,
    /// Print the id of the project matching an identifier, slug or name
    Resolve {
        /// Project identifier, slug or name (exact match)
        query: String,
    },
}

pub async fn execute(args: ProjectsArgs, ctx: &PlaneContext<'_>) -> Result<()> {
    match args.command {
        ProjectsCommands::List => list_projects(ctx).await,
        ProjectsCommands::Resolve { query } => resolve_project(ctx, &query).await,
    }
}

async fn list_projects(ctx: &PlaneContext<'_>) -> Result<()> {
    let projects = ctx
        .client
        .list_projects()
        .await
        .context("Failed to list projects")?;

    if projects.is_empty() {
        tracing::info!("No projects in this workspace.");
        return Ok(());
    }

    #[derive(Serialize)]
    struct Row<'a> {
        identifier: &'a str,
        name: &'a str,
        id: &'a str,
    }

    let rows: Vec<Row<'_>> = projects
        .iter()
        .map(|project| Row {
            identifier: project
                .identifier
                .as_deref()
                .or(project.slug.as_deref())
                .unwrap_or(""),
            name: project.name.as_str(),
            id: project.id.as_str(),
        })
        .collect();

    ctx.renderer.render(&rows)
}

async fn resolve_project(ctx: &PlaneContext<'_>, query: &str) -> Result<()> {
    let id = ctx
        .client
        .resolve_project_id(query)
        .await
        .with_context(|| format!("Failed to resolve project '{query}'"))?
        .ok_or_else(|| anyhow!("No project matches '{query}' in this workspace"))?;

    println!("{id}");
    Ok(())
}
