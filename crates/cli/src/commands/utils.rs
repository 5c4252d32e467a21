use anyhow::{anyhow, Context, Result};
use plane_cli_api::PlaneClient;
use plane_cli_output::{print_warning, OutputRenderer};

pub struct PlaneContext<'a> {
    pub client: PlaneClient,
    pub renderer: &'a OutputRenderer,
    pub default_project: Option<String>,
}

impl PlaneContext<'_> {
    /// The `--project` flag wins over the profile's default project.
    pub fn project_reference<'b>(&'b self, flag: Option<&'b str>) -> Result<&'b str> {
        flag.or(self.default_project.as_deref()).ok_or_else(|| {
            anyhow!("No project specified. Pass --project or set one in the profile.")
        })
    }
}

/// UUID-shaped references skip the lookup and are used verbatim as project
/// ids; anything else is matched against the workspace's project list by
/// identifier, slug or name.
pub async fn resolve_project_reference(ctx: &PlaneContext<'_>, reference: &str) -> Result<String> {
    if looks_like_project_id(reference) {
        return Ok(reference.to_string());
    }

    ctx.client
        .resolve_project_id(reference)
        .await
        .with_context(|| format!("Failed to resolve project '{reference}'"))?
        .ok_or_else(|| anyhow!("No project matches '{reference}' in this workspace"))
}

pub fn looks_like_project_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// A state name that does not exist is not fatal: creation proceeds without
/// a state and the backend applies its default.
pub async fn resolve_state(
    ctx: &PlaneContext<'_>,
    project_id: &str,
    name: &str,
) -> Result<Option<String>> {
    let state_id = ctx
        .client
        .resolve_state_id(project_id, name)
        .await
        .with_context(|| format!("Failed to look up state '{name}'"))?;

    if state_id.is_none() {
        print_warning(&format!(
            "State '{name}' not found in this project. Issues will use the backend's default state."
        ));
    }

    Ok(state_id)
}

pub async fn find_issue_id_by_title(
    ctx: &PlaneContext<'_>,
    project_id: &str,
    title: &str,
) -> Result<Option<String>> {
    let issues = ctx
        .client
        .list_issues(project_id)
        .await
        .context("Failed to list issues")?;

    Ok(issues
        .into_iter()
        .find(|issue| issue.name == title)
        .map(|issue| issue.id))
}

/// Sub-issue creation requires the parent to exist up front; a missing
/// title is an error, never a silent fallback.
pub async fn require_issue_id_by_title(
    ctx: &PlaneContext<'_>,
    project_id: &str,
    title: &str,
) -> Result<String> {
    find_issue_id_by_title(ctx, project_id, title)
        .await?
        .ok_or_else(|| anyhow!("No issue titled '{title}' found in this project"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_shaped_values_are_project_ids() {
        assert!(looks_like_project_id(
            "2f3a8e7c-5b41-4c19-9d2e-8a6f1b3c4d5e"
        ));
        assert!(looks_like_project_id(
            "00000000-0000-0000-0000-000000000000"
        ));
    }

    #[test]
    fn test_names_and_slugs_are_not_project_ids() {
        assert!(!looks_like_project_id("engineering"));
        assert!(!looks_like_project_id("ENG"));
        assert!(!looks_like_project_id(""));
        // Right length, wrong hyphen positions
        assert!(!looks_like_project_id(
            "2f3a8e7c5b41-4c19-9d2e-8a6f-1b3c4d5e0000"
        ));
        // Non-hex content
        assert!(!looks_like_project_id(
            "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"
        ));
    }
}
