use serde::{Deserialize, Serialize};

/// Text attached to records whose profile URL is not a recognized profile.
pub const NO_DATA_INFO: &str = "No LeetCode data available";

/// One roster row. Field names on the wire are the ones the published
/// documents have always used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRow {
    #[serde(rename = "roll")]
    pub identifier: String,
    pub name: String,
    #[serde(rename = "url")]
    pub profile_url: String,
    pub section: String,
    #[serde(rename = "dayi")]
    pub day: String,
    #[serde(rename = "mobno")]
    pub phone: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub total_solved: u64,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
}

impl DifficultyStats {
    /// Applies one `{difficulty, count}` entry; unknown tags are ignored.
    pub fn record(&mut self, difficulty: &str, count: u64) {
        match difficulty {
            "All" => self.total_solved = count,
            "Easy" => self.easy_solved = count,
            "Medium" => self.medium_solved = count,
            "Hard" => self.hard_solved = count,
            _ => {}
        }
    }
}

/// Opaque submission entry, kept exactly as the remote API returned it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSubmission(pub serde_json::Value);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchedProfile {
    pub username: String,
    #[serde(flatten)]
    pub stats: DifficultyStats,
    #[serde(rename = "recentSubmissions")]
    pub recent_submissions: Vec<RecentSubmission>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileData {
    Fetched(FetchedProfile),
    Unavailable { info: String },
}

impl ProfileData {
    pub fn unavailable() -> Self {
        ProfileData::Unavailable { info: NO_DATA_INFO.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(flatten)]
    pub identity: IdentityRow,
    #[serde(flatten)]
    pub profile: ProfileData,
}

impl MergedRecord {
    pub fn total_solved(&self) -> u64 {
        match &self.profile {
            ProfileData::Fetched(p) => p.stats.total_solved,
            ProfileData::Unavailable { .. } => 0,
        }
    }
}
