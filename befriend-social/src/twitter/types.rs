use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const PROFILE_BASE_URL: &str = "https://twitter.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub screen_name: String,
}

impl User {
    /// `https://twitter.com/<screen_name>`
    pub fn profile_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(PROFILE_BASE_URL)?.join(&self.screen_name)
    }
}

/// One page of `friends/ids.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendIdsPage {
    #[serde(default)]
    pub ids: Vec<UserId>,
    #[serde(default)]
    pub next_cursor: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    #[serde(default, alias = "full_text")]
    pub text: String,
    pub user: User,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Opaque query string (`?max_id=...&q=...`) for the next page; absent on the last.
    #[serde(default)]
    pub next_results: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Tweet>,
    #[serde(default)]
    pub search_metadata: SearchMetadata,
}

impl SearchResponse {
    /// Continuation handle, if the API says more pages exist.
    pub fn next_page(&self) -> Option<&str> {
        self.search_metadata
            .next_results
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Parameters for `users/search.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearch<'a> {
    pub term: &'a str,
    /// 0-indexed page.
    pub page: u32,
    pub count: u32,
}

/// Ranking of `search/tweets.json` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    #[default]
    Mixed,
    Recent,
    Popular,
}

impl ResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Mixed => "mixed",
            ResultType::Recent => "recent",
            ResultType::Popular => "popular",
        }
    }
}

/// Parameters for the first page of `search/tweets.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetSearch<'a> {
    pub term: &'a str,
    pub count: u32,
    pub lang: &'a str,
    pub result_type: ResultType,
}
