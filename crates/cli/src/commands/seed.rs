use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use plane_cli_api::models::{NewIssue, Priority};
use plane_cli_output::print_success;
use serde::Deserialize;

use super::utils::{self, PlaneContext};

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Path to the YAML plan file
    #[arg(short, long)]
    file: PathBuf,

    /// Project overriding the plan's `project` entry
    #[arg(short, long)]
    project: Option<String>,

    /// State name overriding the plan's `state` entry
    #[arg(long)]
    state: Option<String>,

    /// Parent issue title overriding the plan's `parent` entry
    #[arg(long)]
    parent: Option<String>,

    /// Resolve everything and list the issues without creating them
    #[arg(long)]
    dry_run: bool,
}

/// Batch description loaded from a plan file:
///
/// ```yaml
/// project: eng          # optional; --project or the profile default otherwise
/// state: Todo           # optional target state name
/// parent: Roadmap       # optional parent issue title for sub-issues
/// issues:
///   - title: Set up CI
///     description: "<p>Wire the build</p>"
///     priority: high
/// ```
#[derive(Debug, Deserialize)]
pub struct SeedPlan {
    pub project: Option<String>,
    pub state: Option<String>,
    pub parent: Option<String>,
    pub issues: Vec<SeedIssue>,
}

#[derive(Debug, Deserialize)]
pub struct SeedIssue {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl SeedPlan {
    pub fn parse(raw: &str) -> Result<Self> {
        let plan: SeedPlan = serde_yaml::from_str(raw).context("Malformed YAML in plan file")?;

        if plan.issues.is_empty() {
            bail!("Plan file contains no issues");
        }

        Ok(plan)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Unable to read plan file at {}", path.display()))?;

        Self::parse(&raw).with_context(|| format!("Invalid plan file {}", path.display()))
    }
}

pub async fn execute(args: SeedArgs, ctx: &PlaneContext<'_>) -> Result<()> {
    let plan = SeedPlan::from_path(&args.file)?;

    let reference = args.project.as_deref().or(plan.project.as_deref());
    let reference = ctx.project_reference(reference)?;
    let project_id = utils::resolve_project_reference(ctx, reference).await?;

    let state_name = args.state.as_deref().or(plan.state.as_deref());
    let state_id = match state_name {
        Some(name) => utils::resolve_state(ctx, &project_id, name).await?,
        None => None,
    };

    let parent_title = args.parent.as_deref().or(plan.parent.as_deref());
    let parent_id = match parent_title {
        Some(title) => Some(utils::require_issue_id_by_title(ctx, &project_id, title).await?),
        None => None,
    };

    let total = plan.issues.len();

    if args.dry_run {
        println!("Would create {total} issue(s) in project {project_id}:");
        for (index, record) in plan.issues.iter().enumerate() {
            println!(
                "  [{}/{}] {} (priority: {})",
                index + 1,
                total,
                record.title,
                record.priority
            );
        }
        return Ok(());
    }

    // Strictly sequential: one request in flight, and the first failure
    // aborts the remainder. Issues created before the failure stand.
    for (index, record) in plan.issues.iter().enumerate() {
        let new_issue = NewIssue {
            name: record.title.clone(),
            description_html: record.description.clone(),
            priority: record.priority,
            state: state_id.clone(),
            parent: parent_id.clone(),
        };

        let issue = ctx
            .client
            .create_issue(&project_id, &new_issue)
            .await
            .with_context(|| format!("Failed to create issue '{}'", record.title))?;

        println!("[{}/{}] Created: {} ({})", index + 1, total, issue.name, issue.id);
    }

    print_success(&format!("Seeded {total} issue(s) into project {project_id}"));
    Ok(())
}
