//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CheckRun, CommitStatus, MergeMethod, MergeRequest, MergeResult, PullRequest, RepoConfig,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size for listings (GitHub maximum)
const PER_PAGE: u8 = 100;

/// Merge responses meaning GitHub refused this merge: not mergeable (405) or
/// head moved (409)
const DECLINED_MERGE_STATUSES: [u16; 2] = [405, 409];

// REST payloads. Only the fields the policy reads are declared.

#[derive(Deserialize)]
struct PullPayload {
    number: u64,
    title: Option<String>,
    user: Option<UserPayload>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    head: HeadPayload,
    mergeable: Option<bool>,
    mergeable_state: Option<String>,
    merged: Option<bool>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Deserialize)]
struct HeadPayload {
    sha: String,
}

impl From<PullPayload> for PullRequest {
    fn from(pr: PullPayload) -> Self {
        Self {
            number: pr.number,
            author: pr.user.map(|u| u.login).unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
            head_sha: pr.head.sha,
            mergeable: pr.mergeable,
            mergeable_state: pr.mergeable_state.map(|s| s.to_lowercase()),
            is_merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
        }
    }
}

#[derive(Deserialize)]
struct StatusPayload {
    context: String,
    state: String,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CheckRunsPayload {
    total_count: usize,
    check_runs: Vec<CheckRunPayload>,
}

#[derive(Deserialize)]
struct CheckRunPayload {
    name: String,
    status: String,
    conclusion: Option<String>,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: RepoConfig,
    /// Token for raw HTTP requests (check runs)
    token: String,
    /// HTTP client for raw requests (check runs)
    http_client: Client,
    /// API base URL without trailing slash
    api_url: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` defaults to [`DEFAULT_API_URL`]; pass
    /// `https://{host}/api/v3` for GitHub Enterprise.
    pub fn new(token: &str, config: RepoConfig, api_url: Option<&str>) -> Result<Self> {
        let api_url = api_url
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("feedstock-automerge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_url,
        })
    }

    fn repo_route(&self, rest: &str) -> String {
        format!("/repos/{}/{}/{rest}", self.config.owner, self.config.repo)
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    fn config(&self) -> &RepoConfig {
        &self.config
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let payload: PullPayload = self
            .client
            .get(self.repo_route(&format!("pulls/{pr_number}")), None::<&()>)
            .await?;

        let pr = PullRequest::from(payload);
        debug!(
            pr_number,
            head_sha = %pr.head_sha,
            mergeable = ?pr.mergeable,
            mergeable_state = ?pr.mergeable_state,
            merged = pr.is_merged,
            "got PR"
        );
        Ok(pr)
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        debug!(sha, "listing commit statuses");
        let route = self.repo_route(&format!("commits/{sha}/statuses"));
        let mut statuses = Vec::new();

        for page in 1.. {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<StatusPayload> = self.client.get(&route, Some(&params)).await?;
            let done = batch.len() < usize::from(PER_PAGE);

            statuses.extend(batch.into_iter().map(|s| CommitStatus {
                context: s.context,
                state: s.state,
                updated_at: s.updated_at,
            }));

            if done {
                break;
            }
        }

        debug!(sha, count = statuses.len(), "listed commit statuses");
        Ok(statuses)
    }

    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.api_url, self.config.owner, self.config.repo, sha
        );
        debug!(%url, "fetching check runs");
        let mut runs = Vec::new();

        for page in 1u32.. {
            let response = self
                .http_client
                .get(&url)
                .query(&[("per_page", u32::from(PER_PAGE)), ("page", page)])
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", "2022-11-28")
                .send()
                .await?
                .error_for_status()?;

            let payload: CheckRunsPayload = response.json().await?;
            let empty = payload.check_runs.is_empty();

            runs.extend(payload.check_runs.into_iter().map(|r| CheckRun {
                name: r.name,
                status: r.status,
                conclusion: r.conclusion,
            }));

            if runs.len() >= payload.total_count {
                break;
            }
            if empty {
                return Err(Error::GitHubApi(format!(
                    "check runs for {sha} ended at {} of {} on page {page}",
                    runs.len(),
                    payload.total_count
                )));
            }
        }

        debug!(sha, count = runs.len(), "fetched check runs");
        Ok(runs)
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        debug!(pr_number, method = %request.method, sha = %request.sha, "merging PR");

        let octocrab_method = match request.method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .title(request.commit_title.clone())
            .message(request.commit_message.clone())
            .sha(request.sha.clone())
            .method(octocrab_method)
            .send()
            .await;

        let merge_result = match result {
            Ok(merge) => MergeResult {
                merged: merge.merged,
                sha: merge.sha,
                message: merge.message,
            },
            Err(octocrab::Error::GitHub { source, .. })
                if DECLINED_MERGE_STATUSES.contains(&source.status_code.as_u16()) =>
            {
                MergeResult {
                    merged: false,
                    sha: None,
                    message: Some(source.message.clone()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }
}
