use async_trait::async_trait;

use crate::twitter::error::TwitterError;
use crate::twitter::types::{FriendIdsPage, SearchResponse, TweetSearch, User, UserId, UserSearch};

/// Everything the discovery engine needs from Twitter.
///
/// [`crate::twitter::TwitterClient`] implements it over HTTP; tests use scripted fakes.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Check the credentials and return the authenticated account.
    async fn verify_credentials(&self) -> Result<User, TwitterError>;

    /// One page of the authenticated account's friend IDs. Start with cursor `-1`;
    /// a returned `next_cursor` of `0` means there are no more pages.
    async fn friend_ids(&self, cursor: i64) -> Result<FriendIdsPage, TwitterError>;

    /// One page of profile search results. The last page is shorter than `count`.
    async fn search_users(&self, query: &UserSearch<'_>) -> Result<Vec<User>, TwitterError>;

    /// First page of a tweet search.
    async fn search_tweets(&self, query: &TweetSearch<'_>) -> Result<SearchResponse, TwitterError>;

    /// Follow-up page of a tweet search, from the handle returned by the previous page.
    async fn search_tweets_next(
        &self,
        term: &str,
        next_results: &str,
    ) -> Result<SearchResponse, TwitterError>;

    /// Follow a user by ID. Following an existing friend is not special-cased.
    async fn follow(&self, user_id: UserId) -> Result<User, TwitterError>;
}
