// handlers/protected/commits.rs - /{tenant_url}/api/v1/commits (read-only)

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::require;
use crate::api::{ApiPath, ApiQuery, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::handlers::crud;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Deadline};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub tenant_id: String,
    pub database_name: String,
    pub branch_name: String,
    pub commit_id: String,
    pub commit_code: String,
    pub commit_message: String,
    pub parent_commit_id: String,
    pub is_head: bool,
    pub created: String,
}

/// `limit` must be numeric; anything else fails query decoding with a 400.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCommitsQuery {
    #[serde(default)]
    pub database_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Validate for ListCommitsQuery {
    fn validate(&self) -> Result<(), ApiError> {
        require("database_name", &self.database_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowCommitQuery {
    #[serde(default)]
    pub database_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

impl Validate for ShowCommitQuery {
    fn validate(&self) -> Result<(), ApiError> {
        require("database_name", &self.database_name)
    }
}

/// GET /{tenant_url}/api/v1/commits?database_name=&branch_name=&limit=
pub async fn list(
    State(state): State<AppState>,
    profile: Profile,
    ApiQuery(query): ApiQuery<ListCommitsQuery>,
) -> ApiResult<Value> {
    query.validate()?;
    let failure = "Failed to list commits";
    let request = crud::scoped_request(&profile, &query, &[])?;
    let response: Value = state
        .core_call("ListCommits", &request, Deadline::Default, failure)
        .await?;
    let commits: Vec<Commit> = crud::take_list(&response, "commits", failure)?;
    Ok(ApiResponse::success(crud::keyed("commits", &commits, failure)?))
}

/// GET /{tenant_url}/api/v1/commits/:commit_id?database_name=
pub async fn show(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, commit_id)): ApiPath<(String, String)>,
    ApiQuery(query): ApiQuery<ShowCommitQuery>,
) -> ApiResult<Value> {
    query.validate()?;
    let failure = "Failed to get commit";
    let request = crud::scoped_request(&profile, &query, &[("commit_id", commit_id.as_str())])?;
    let response: Value = state
        .core_call("ShowCommit", &request, Deadline::Default, failure)
        .await?;
    let commit: Commit = crud::take_entity(&response, "commit", failure)?;
    Ok(ApiResponse::success(crud::keyed("commit", &commit, failure)?))
}
