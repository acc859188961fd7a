use std::time::Duration;

use async_trait::async_trait;
use roster::{DifficultyStats, RecentSubmission};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::provider::{FetchError, ProviderInfo, RemoteStats, StatsProvider};

/// Accepted submissions returned alongside the counts.
pub const RECENT_LIMIT: u32 = 2;

const USER_STATS_QUERY: &str = r#"
  query userStats($username: String!) {
    matchedUser(username: $username) {
      username
      submitStats: submitStatsGlobal {
        acSubmissionNum {
          difficulty
          count
          submissions
        }
      }
    }
  }
"#;

const RECENT_AC_QUERY: &str = r#"
  query recentAcSubmissions($username: String!, $limit: Int!) {
    recentAcSubmissionList(username: $username, limit: $limit) {
      id
      title
      timestamp
      statusDisplay
      runtime
      memory
      lang
    }
  }
"#;

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatsData {
    matched_user: Option<MatchedUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    submit_stats: SubmitStats,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    #[serde(default)]
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Deserialize)]
struct DifficultyCount {
    difficulty: String,
    count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentData {
    recent_ac_submission_list: Option<Vec<RecentSubmission>>,
}

pub struct LeetCodeProvider {
    graphql_url: String,
    client: reqwest::Client,
}

impl LeetCodeProvider {
    pub fn new(graphql_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { graphql_url, client })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, FetchError> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let resp = self
            .client
            .post(&self.graphql_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: GraphQlResponse<T> = resp.json().await?;

        if !parsed.errors.is_empty() {
            let msg = parsed
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::Api(msg));
        }
        parsed
            .data
            .ok_or_else(|| FetchError::Api("response has no data".to_string()))
    }
}

#[async_trait]
impl StatsProvider for LeetCodeProvider {
    async fn fetch_stats(&self, username: &str) -> Result<RemoteStats, FetchError> {
        let (counts, recent) = tokio::try_join!(
            self.query::<UserStatsData>(USER_STATS_QUERY, serde_json::json!({ "username": username })),
            self.query::<RecentData>(
                RECENT_AC_QUERY,
                serde_json::json!({ "username": username, "limit": RECENT_LIMIT }),
            ),
        )?;

        let user = counts
            .matched_user
            .ok_or_else(|| FetchError::NotFound(username.to_string()))?;

        let mut stats = DifficultyStats::default();
        for item in &user.submit_stats.ac_submission_num {
            stats.record(&item.difficulty, item.count);
        }

        Ok(RemoteStats {
            stats,
            recent_submissions: recent.recent_ac_submission_list.unwrap_or_default(),
        })
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "leetcode".to_string(),
            base_url: self.graphql_url.clone(),
        }
    }
}
