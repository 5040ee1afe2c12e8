//! Typed reads against the dashboard backend.
//!
//! No retries and no caching: every call is one request. Independent lists are
//! requested concurrently and aggregation only starts once all have resolved.

use crate::error::{PlanError, PlanResult};
use crate::hierarchy::TreeNode;
use crate::model::{
    BusinessUnit, Department, ProductLine, Project, ResourcePlanRecord, SubTeam, User,
    WorklogRoleSummary,
};
use crate::source::PlanSnapshot;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PlanResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PlanError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body = resp.json::<T>().await?;
        debug!(%url, "fetched");
        Ok(body)
    }

    pub async fn resource_plans(&self) -> PlanResult<Vec<ResourcePlanRecord>> {
        self.get_json("/resource-plans").await
    }

    pub async fn worklog_summaries(&self) -> PlanResult<Vec<WorklogRoleSummary>> {
        self.get_json("/worklogs/role-summary").await
    }

    pub async fn business_units(&self) -> PlanResult<Vec<BusinessUnit>> {
        self.get_json("/business-units").await
    }

    pub async fn product_lines(&self) -> PlanResult<Vec<ProductLine>> {
        self.get_json("/product-lines").await
    }

    pub async fn departments(&self) -> PlanResult<Vec<Department>> {
        self.get_json("/departments").await
    }

    pub async fn sub_teams(&self) -> PlanResult<Vec<SubTeam>> {
        self.get_json("/sub-teams").await
    }

    /// Lazy level of the organization tree.
    pub async fn team_users(&self, sub_team_id: i64) -> PlanResult<Vec<TreeNode>> {
        let users: Vec<User> = self
            .get_json(&format!("/sub-teams/{sub_team_id}/users"))
            .await?;
        Ok(users.iter().map(|u| TreeNode::from_item(u, true)).collect())
    }

    /// Lazy level of the project tree.
    pub async fn line_projects(&self, product_line_id: i64) -> PlanResult<Vec<TreeNode>> {
        let projects: Vec<Project> = self
            .get_json(&format!("/product-lines/{product_line_id}/projects"))
            .await?;
        Ok(projects
            .iter()
            .map(|p| TreeNode::from_item(p, true))
            .collect())
    }

    /// Fetches every list the planning views need. Fails if any request fails.
    ///
    /// Projects and users are left empty; they are the lazy tree levels and are
    /// requested per node through [`ApiClient::line_projects`] and [`ApiClient::team_users`].
    pub async fn fetch_snapshot(&self) -> PlanResult<PlanSnapshot> {
        let (
            resource_plans,
            worklog_summaries,
            business_units,
            product_lines,
            departments,
            sub_teams,
        ) = tokio::try_join!(
            self.resource_plans(),
            self.worklog_summaries(),
            self.business_units(),
            self.product_lines(),
            self.departments(),
            self.sub_teams(),
        )?;

        let snapshot = PlanSnapshot {
            resource_plans,
            worklog_summaries,
            worklog_entries: Vec::new(),
            business_units,
            product_lines,
            projects: Vec::new(),
            departments,
            sub_teams,
            users: Vec::new(),
        };
        crate::source::validate_snapshot(&snapshot)?;
        info!(
            base_url = %self.base_url,
            plans = snapshot.resource_plans.len(),
            worklogs = snapshot.worklog_summaries.len(),
            "fetched snapshot"
        );
        Ok(snapshot)
    }
}
