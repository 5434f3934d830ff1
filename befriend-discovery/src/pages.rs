//! Page fetchers for the two search sources.
//!
//! Profile search pages by explicit index; tweet search chains the continuation
//! handle from each response. Both report "more may exist" the same way, so the
//! collector does not care which one it is driving.
use async_trait::async_trait;
use befriend_social::twitter::types::{ResultType, TweetSearch, UserSearch};
use befriend_social::twitter::{TwitterApi, User};

use crate::error::DiscoveryError;

/// One page of search results reduced to the users found on it.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub users: Vec<User>,
    /// False once the source is exhausted; the fetcher must not be polled again.
    pub more: bool,
}

#[async_trait]
pub trait PageFetcher: Send {
    /// Per-request page size this fetcher asks for.
    fn page_size(&self) -> u32;

    async fn next_page(&mut self) -> Result<Page, DiscoveryError>;
}

/// `users/search` paged by 0-based index. A full page means there may be more.
pub struct ProfilePages<'a, A: ?Sized> {
    api: &'a A,
    term: &'a str,
    page: u32,
    page_size: u32,
}

impl<'a, A: TwitterApi + ?Sized> ProfilePages<'a, A> {
    pub fn new(api: &'a A, term: &'a str, page_size: u32) -> Self {
        Self {
            api,
            term,
            page: 0,
            page_size,
        }
    }
}

#[async_trait]
impl<'a, A: TwitterApi + ?Sized> PageFetcher for ProfilePages<'a, A> {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn next_page(&mut self) -> Result<Page, DiscoveryError> {
        let users = self
            .api
            .search_users(&UserSearch {
                term: self.term,
                page: self.page,
                count: self.page_size,
            })
            .await
            .map_err(DiscoveryError::ProfileSearch)?;

        self.page += 1;
        let more = users.len() == self.page_size as usize;
        Ok(Page { users, more })
    }
}

enum TweetCursor {
    Start,
    Next(String),
    Done,
}

/// `search/tweets` chained through `next_results`. A page continues only when it is
/// full and the API handed back a continuation.
pub struct TweetPages<'a, A: ?Sized> {
    api: &'a A,
    term: &'a str,
    lang: &'a str,
    result_type: ResultType,
    page_size: u32,
    cursor: TweetCursor,
}

impl<'a, A: TwitterApi + ?Sized> TweetPages<'a, A> {
    pub fn new(api: &'a A, term: &'a str, lang: &'a str, page_size: u32) -> Self {
        Self {
            api,
            term,
            lang,
            result_type: ResultType::Mixed,
            page_size,
            cursor: TweetCursor::Start,
        }
    }
}

#[async_trait]
impl<'a, A: TwitterApi + ?Sized> PageFetcher for TweetPages<'a, A> {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn next_page(&mut self) -> Result<Page, DiscoveryError> {
        let resp = match &self.cursor {
            TweetCursor::Start => {
                self.api
                    .search_tweets(&TweetSearch {
                        term: self.term,
                        count: self.page_size,
                        lang: self.lang,
                        result_type: self.result_type,
                    })
                    .await
            }
            TweetCursor::Next(handle) => self.api.search_tweets_next(self.term, handle).await,
            TweetCursor::Done => return Ok(Page::default()),
        }
        .map_err(DiscoveryError::TweetSearch)?;

        let full = resp.statuses.len() == self.page_size as usize;
        self.cursor = match resp.next_page() {
            Some(handle) if full => TweetCursor::Next(handle.to_string()),
            _ => TweetCursor::Done,
        };

        let more = matches!(self.cursor, TweetCursor::Next(_));
        let users = resp.statuses.into_iter().map(|t| t.user).collect();
        Ok(Page { users, more })
    }
}
