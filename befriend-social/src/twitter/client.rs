//! Twitter v1.1 REST client signed with OAuth 1.0a user credentials.
//!
//! Each method is a single request; pagination is left to the caller through the
//! page index, cursor or `next_results` handle the API hands back.
use async_trait::async_trait;
use befriend_http::{Auth, HttpClient, OAuth1Credentials, OAuth1Signer, RequestOpts};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;

use crate::twitter::api::TwitterApi;
use crate::twitter::error::TwitterError;
use crate::twitter::types::{
    FriendIdsPage, SearchResponse, TweetSearch, User, UserId, UserSearch,
};

pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

const FRIEND_IDS_PAGE_SIZE: &str = "5000";

type Query<'a> = Vec<(&'a str, Cow<'a, str>)>;

#[derive(Clone)]
pub struct TwitterClient {
    http: HttpClient,
    signer: OAuth1Signer,
}

impl TwitterClient {
    pub fn new(
        api_url: &str,
        credentials: OAuth1Credentials,
        timeout: Duration,
    ) -> Result<Self, TwitterError> {
        let http = HttpClient::new(api_url)?.with_timeout(timeout);
        Ok(Self {
            http,
            signer: OAuth1Signer::new(credentials),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, TwitterError> {
        let resp = self
            .http
            .get_json(
                path,
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.signer)),
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;
        Ok(resp)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> Result<T, TwitterError> {
        let resp = self
            .http
            .post_json(
                path,
                RequestOpts {
                    auth: Some(Auth::OAuth1(&self.signer)),
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await?;
        Ok(resp)
    }
}

/// Turn a `next_results` handle (`?max_id=..&q=..`) into query pairs, with `q`
/// replaced by the original term.
fn continuation_query<'a>(term: &'a str, next_results: &str) -> Result<Query<'a>, TwitterError> {
    let raw = next_results.trim().trim_start_matches('?');
    if raw.is_empty() {
        return Err(TwitterError::Pagination("empty next_results handle".into()));
    }

    let mut query: Query<'a> = vec![("q", Cow::Borrowed(term))];
    for (k, v) in url::form_urlencoded::parse(raw.as_bytes()) {
        let key: &'static str = match k.as_ref() {
            "q" => continue,
            "max_id" => "max_id",
            "since_id" => "since_id",
            "count" => "count",
            "include_entities" => "include_entities",
            "result_type" => "result_type",
            "lang" => "lang",
            "geocode" => "geocode",
            "locale" => "locale",
            "until" => "until",
            "tweet_mode" => "tweet_mode",
            other => {
                tracing::debug!(param = other, "twitter.search.next.unknown_param_dropped");
                continue;
            }
        };
        query.push((key, Cow::Owned(v.into_owned())));
    }

    if !query.iter().any(|(k, _)| *k == "max_id") {
        return Err(TwitterError::Pagination(format!(
            "next_results handle without max_id: {next_results}"
        )));
    }
    Ok(query)
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn verify_credentials(&self) -> Result<User, TwitterError> {
        let me: User = self
            .get(
                "1.1/account/verify_credentials.json",
                vec![
                    ("include_entities", "false".into()),
                    ("skip_status", "true".into()),
                ],
            )
            .await?;
        tracing::info!(user_id = %me.id, screen_name = %me.screen_name, "twitter.credentials.verified");
        Ok(me)
    }

    async fn friend_ids(&self, cursor: i64) -> Result<FriendIdsPage, TwitterError> {
        let page: FriendIdsPage = self
            .get(
                "1.1/friends/ids.json",
                vec![
                    ("cursor", cursor.to_string().into()),
                    ("count", FRIEND_IDS_PAGE_SIZE.into()),
                    ("stringify_ids", "false".into()),
                ],
            )
            .await?;
        tracing::debug!(
            cursor,
            ids = page.ids.len(),
            next_cursor = page.next_cursor,
            "twitter.friends.page"
        );
        Ok(page)
    }

    async fn search_users(&self, query: &UserSearch<'_>) -> Result<Vec<User>, TwitterError> {
        let users: Vec<User> = self
            .get(
                "1.1/users/search.json",
                vec![
                    ("q", query.term.into()),
                    ("page", query.page.to_string().into()),
                    ("count", query.count.to_string().into()),
                    ("include_entities", "false".into()),
                ],
            )
            .await?;
        tracing::debug!(
            page = query.page,
            requested = query.count,
            returned = users.len(),
            "twitter.users.search"
        );
        Ok(users)
    }

    async fn search_tweets(&self, query: &TweetSearch<'_>) -> Result<SearchResponse, TwitterError> {
        let resp: SearchResponse = self
            .get(
                "1.1/search/tweets.json",
                vec![
                    ("q", query.term.into()),
                    ("result_type", query.result_type.as_str().into()),
                    ("count", query.count.to_string().into()),
                    ("include_entities", "false".into()),
                    ("lang", query.lang.into()),
                ],
            )
            .await?;
        tracing::debug!(
            requested = query.count,
            returned = resp.statuses.len(),
            has_next = resp.next_page().is_some(),
            "twitter.tweets.search"
        );
        Ok(resp)
    }

    async fn search_tweets_next(
        &self,
        term: &str,
        next_results: &str,
    ) -> Result<SearchResponse, TwitterError> {
        let query = continuation_query(term, next_results)?;
        let resp: SearchResponse = self.get("1.1/search/tweets.json", query).await?;
        tracing::debug!(
            returned = resp.statuses.len(),
            has_next = resp.next_page().is_some(),
            "twitter.tweets.search.next"
        );
        Ok(resp)
    }

    async fn follow(&self, user_id: UserId) -> Result<User, TwitterError> {
        let user: User = self
            .post(
                "1.1/friendships/create.json",
                vec![("user_id", user_id.to_string().into())],
            )
            .await?;
        Ok(user)
    }
}
