#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use befriend_common::observability::{LogConfig, LogFormat};
use befriend_http::{HttpError, StatusCode};
use befriend_social::twitter::types::{
    FriendIdsPage, SearchMetadata, SearchResponse, Tweet, TweetSearch, UserSearch,
};
use befriend_social::twitter::{TwitterApi, TwitterError, User, UserId};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join("befriend-tests");
        let config = LogConfig {
            app_name: "befriend-tests",
            log_dir: Some(dir),
            emit_stderr: true,
            format: if std::env::var("BEFRIEND_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        befriend_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub fn user(id: u64) -> User {
    User {
        id: UserId(id),
        name: format!("User {id}"),
        screen_name: format!("user{id}"),
    }
}

pub fn users(ids: &[u64]) -> Vec<User> {
    ids.iter().copied().map(user).collect()
}

pub fn ids(users: &[User]) -> Vec<u64> {
    users.iter().map(|u| u.id.0).collect()
}

pub fn api_error(status: StatusCode, code: i64) -> TwitterError {
    TwitterError::Http(HttpError::Api {
        status,
        code: Some(code),
        message: format!("scripted failure {code}"),
        request_id: "test".to_string(),
    })
}

/// Every call the fake saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Verify,
    FriendIds(i64),
    SearchUsers { page: u32, count: u32 },
    SearchTweets { count: u32 },
    SearchTweetsNext(String),
    Follow(u64),
}

/// Scripted [`TwitterApi`].
///
/// Friend pages are keyed by cursor. User search pages are served by index. Tweet
/// pages are served in order; each one except the last hands back a `?max_id=N`
/// handle pointing at the next.
#[derive(Default)]
pub struct FakeTwitter {
    friend_pages: HashMap<i64, FriendIdsPage>,
    user_pages: Vec<Vec<User>>,
    tweet_pages: Vec<Vec<User>>,
    /// Drop the handle after this tweet page index even if more are scripted.
    tweet_handle_until: Option<usize>,
    follow_failures: HashSet<u64>,
    user_page_failures: HashSet<u32>,
    tweet_page_failures: HashSet<usize>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTwitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn friend_page(mut self, cursor: i64, ids: &[u64], next_cursor: i64) -> Self {
        self.friend_pages.insert(
            cursor,
            FriendIdsPage {
                ids: ids.iter().copied().map(UserId).collect(),
                next_cursor,
            },
        );
        self
    }

    pub fn user_page(mut self, ids: &[u64]) -> Self {
        self.user_pages.push(users(ids));
        self
    }

    pub fn tweet_page(mut self, author_ids: &[u64]) -> Self {
        self.tweet_pages.push(users(author_ids));
        self
    }

    pub fn tweet_handles_until(mut self, index: usize) -> Self {
        self.tweet_handle_until = Some(index);
        self
    }

    /// User search page `page` answers 429 with code 88.
    pub fn fail_user_page(mut self, page: u32) -> Self {
        self.user_page_failures.insert(page);
        self
    }

    /// Tweet page `index` (0 is the first request) answers 429 with code 88.
    pub fn fail_tweet_page(mut self, index: usize) -> Self {
        self.tweet_page_failures.insert(index);
        self
    }

    pub fn fail_follow(mut self, id: u64) -> Self {
        self.follow_failures.insert(id);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn follow_calls(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Follow(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn tweet_response(&self, index: usize) -> Result<SearchResponse, TwitterError> {
        if self.tweet_page_failures.contains(&index) {
            return Err(api_error(StatusCode::TOO_MANY_REQUESTS, 88));
        }
        let authors = self.tweet_pages.get(index).cloned().unwrap_or_default();
        let statuses = authors
            .into_iter()
            .enumerate()
            .map(|(n, user)| Tweet {
                id: (index * 1000 + n) as u64,
                text: format!("tweet by {}", user.screen_name),
                user,
                lang: Some("en".to_string()),
            })
            .collect();
        let has_next = index + 1 < self.tweet_pages.len()
            && self.tweet_handle_until.map_or(true, |last| index < last);
        Ok(SearchResponse {
            statuses,
            search_metadata: SearchMetadata {
                next_results: has_next.then(|| format!("?max_id={}&q=term", index + 1)),
                count: None,
                query: None,
            },
        })
    }
}

#[async_trait]
impl TwitterApi for FakeTwitter {
    async fn verify_credentials(&self) -> Result<User, TwitterError> {
        self.record(Call::Verify);
        Ok(user(0))
    }

    async fn friend_ids(&self, cursor: i64) -> Result<FriendIdsPage, TwitterError> {
        self.record(Call::FriendIds(cursor));
        self.friend_pages
            .get(&cursor)
            .cloned()
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, 44))
    }

    async fn search_users(&self, query: &UserSearch<'_>) -> Result<Vec<User>, TwitterError> {
        self.record(Call::SearchUsers {
            page: query.page,
            count: query.count,
        });
        if self.user_page_failures.contains(&query.page) {
            return Err(api_error(StatusCode::TOO_MANY_REQUESTS, 88));
        }
        Ok(self
            .user_pages
            .get(query.page as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_tweets(&self, query: &TweetSearch<'_>) -> Result<SearchResponse, TwitterError> {
        self.record(Call::SearchTweets { count: query.count });
        self.tweet_response(0)
    }

    async fn search_tweets_next(
        &self,
        _term: &str,
        next_results: &str,
    ) -> Result<SearchResponse, TwitterError> {
        self.record(Call::SearchTweetsNext(next_results.to_string()));
        let index = next_results
            .trim_start_matches("?max_id=")
            .split('&')
            .next()
            .and_then(|raw| raw.parse::<usize>().ok())
            .ok_or_else(|| TwitterError::Pagination(next_results.to_string()))?;
        self.tweet_response(index)
    }

    async fn follow(&self, user_id: UserId) -> Result<User, TwitterError> {
        self.record(Call::Follow(user_id.0));
        if self.follow_failures.contains(&user_id.0) {
            return Err(api_error(StatusCode::FORBIDDEN, 161));
        }
        Ok(user(user_id.0))
    }
}
