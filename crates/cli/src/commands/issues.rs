use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use plane_cli_api::models::{NewIssue, Priority};
use plane_cli_output::print_success;
use serde::Serialize;

use super::utils::{self, PlaneContext};

#[derive(Args, Debug, Clone)]
pub struct IssuesArgs {
    #[command(subcommand)]
    command: IssuesCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum IssuesCommands {
    /// List issues of a project
    List {
        /// Project id, identifier, slug or name
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Create a single issue
    Create {
        /// Project id, identifier, slug or name
        #[arg(short, long)]
        project: Option<String>,

        /// Issue title
        #[arg(long)]
        title: String,

        /// HTML description body
        #[arg(long, default_value = "")]
        description: String,

        /// Priority: urgent, high, medium, low or none (any casing)
        #[arg(long, default_value = "none")]
        priority: String,

        /// Workflow state name, matched case-insensitively; the backend
        /// default applies when omitted or not found
        #[arg(long)]
        state: Option<String>,

        /// Exact title of an existing issue to attach this one to as a
        /// sub-issue
        #[arg(long)]
        parent: Option<String>,
    },
}

pub async fn execute(args: IssuesArgs, ctx: &PlaneContext<'_>) -> Result<()> {
    match args.command {
        IssuesCommands::List { project } => list_issues(ctx, project.as_deref()).await,
        IssuesCommands::Create {
            project,
            title,
            description,
            priority,
            state,
            parent,
        } => {
            create_issue(
                ctx,
                project.as_deref(),
                &title,
                &description,
                &priority,
                state.as_deref(),
                parent.as_deref(),
            )
            .await
        }
    }
}

async fn list_issues(ctx: &PlaneContext<'_>, project: Option<&str>) -> Result<()> {
    let reference = ctx.project_reference(project)?;
    let project_id = utils::resolve_project_reference(ctx, reference).await?;

    let issues = ctx
        .client
        .list_issues(&project_id)
        .await
        .context("Failed to list issues")?;

    if issues.is_empty() {
        tracing::info!("No issues in this project.");
        return Ok(());
    }

    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        priority: &'a str,
        state: &'a str,
        id: &'a str,
    }

    let rows: Vec<Row<'_>> = issues
        .iter()
        .map(|issue| Row {
            name: issue.name.as_str(),
            priority: issue.priority.map(|p| p.as_str()).unwrap_or(""),
            state: issue.state.as_deref().unwrap_or(""),
            id: issue.id.as_str(),
        })
        .collect();

    ctx.renderer.render(&rows)
}

async fn create_issue(
    ctx: &PlaneContext<'_>,
    project: Option<&str>,
    title: &str,
    description: &str,
    priority: &str,
    state: Option<&str>,
    parent: Option<&str>,
) -> Result<()> {
    let priority: Priority = priority.parse()?;

    let reference = ctx.project_reference(project)?;
    let project_id = utils::resolve_project_reference(ctx, reference).await?;

    let state_id = match state {
        Some(name) => utils::resolve_state(ctx, &project_id, name).await?,
        None => None,
    };

    let parent_id = match parent {
        Some(parent_title) => {
            Some(utils::require_issue_id_by_title(ctx, &project_id, parent_title).await?)
        }
        None => None,
    };

    let new_issue = NewIssue {
        name: title.to_string(),
        description_html: description.to_string(),
        priority,
        state: state_id,
        parent: parent_id,
    };

    let issue = ctx
        .client
        .create_issue(&project_id, &new_issue)
        .await
        .with_context(|| format!("Failed to create issue '{title}'"))?;

    tracing::info!(issue_id = %issue.id, "Issue created successfully");
    print_success(&format!("Created issue: {} ({})", issue.name, issue.id));
    Ok(())
}
