pub mod error;
pub mod models;
pub mod pagination;

use error::{ApiError, Result};
use models::{Issue, NewIssue, Project, WorkflowState};
use pagination::Listing;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Clone)]
pub struct PlaneClient {
    client: Client,
    base_url: String,
    api_key: String,
    workspace: String,
}

impl PlaneClient {
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("plane-cli/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            workspace: workspace.into(),
        })
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let listing: Listing<Project> = self.get(&self.projects_path()).await?;
        Ok(listing.into_vec())
    }

    /// Looks the reference up against the workspace's project list. `None`
    /// when no project matches; see [`find_project_id`] for the match rule.
    pub async fn resolve_project_id(&self, reference: &str) -> Result<Option<String>> {
        let projects = self.list_projects().await?;
        Ok(find_project_id(&projects, reference))
    }

    pub async fn list_issues(&self, project_id: &str) -> Result<Vec<Issue>> {
        let listing: Listing<Issue> = self.get(&self.issues_path(project_id)).await?;
        Ok(listing.into_vec())
    }

    pub async fn list_states(&self, project_id: &str) -> Result<Vec<WorkflowState>> {
        let listing: Listing<WorkflowState> = self.get(&self.states_path(project_id)).await?;
        Ok(listing.into_vec())
    }

    /// Case-insensitive lookup of a workflow state by display name. `None`
    /// when the project has no state with that name.
    pub async fn resolve_state_id(&self, project_id: &str, name: &str) -> Result<Option<String>> {
        let states = self.list_states(project_id).await?;
        Ok(find_state_id(&states, name))
    }

    /// Creates one issue. Not idempotent: repeating the call creates a
    /// duplicate. The parent id, when set, is sent as-is; callers resolve
    /// and validate it beforehand.
    pub async fn create_issue(&self, project_id: &str, issue: &NewIssue) -> Result<Issue> {
        let created: Issue = self.post(&self.issues_path(project_id), issue).await?;
        debug!(issue_id = %created.id, name = %created.name, "Created issue");
        Ok(created)
    }

    fn projects_path(&self) -> String {
        format!("/api/v1/workspaces/{}/projects/", self.workspace)
    }

    fn issues_path(&self, project_id: &str) -> String {
        format!(
            "/api/v1/workspaces/{}/projects/{}/issues/",
            self.workspace, project_id
        )
    }

    fn states_path(&self, project_id: &str) -> String {
        format!(
            "/api/v1/workspaces/{}/projects/{}/states/",
            self.workspace, project_id
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(method = %method, url = %url, "Sending request");

        let mut req = self
            .client
            .request(method, &url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(ApiError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), url = %url, "API request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse JSON response: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })
    }
}

/// The first project whose `identifier`, `slug` or `name` equals the
/// reference wins; list order decides between multiple matches. Comparison
/// is exact (case-sensitive).
pub fn find_project_id(projects: &[Project], reference: &str) -> Option<String> {
    projects
        .iter()
        .find(|project| {
            project.identifier.as_deref() == Some(reference)
                || project.slug.as_deref() == Some(reference)
                || project.name == reference
        })
        .map(|project| project.id.clone())
}

pub fn find_state_id(states: &[WorkflowState], name: &str) -> Option<String> {
    states
        .iter()
        .find(|state| state.name.eq_ignore_ascii_case(name))
        .map(|state| state.id.clone())
}
