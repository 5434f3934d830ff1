//! Friend snapshot: every ID the account follows, across all cursor pages.
use std::collections::HashSet;

use async_stream::try_stream;
use befriend_social::twitter::{TwitterApi, TwitterError, UserId};
use futures::{pin_mut, Stream, TryStreamExt};

use crate::context::ExclusionSet;
use crate::error::DiscoveryError;

/// Cursor value that asks for the first page.
pub const FIRST_CURSOR: i64 = -1;

/// Stream of friend ID pages. Ends after the page whose `next_cursor` is 0.
///
/// A cursor the API already handed out ends the stream with a pagination error.
pub fn friend_id_pages<'a, A>(api: &'a A) -> impl Stream<Item = Result<Vec<UserId>, TwitterError>> + Send + 'a
where
    A: TwitterApi + ?Sized,
{
    try_stream! {
        let mut cursor = FIRST_CURSOR;
        let mut seen = HashSet::from([cursor]);
        loop {
            let page = api.friend_ids(cursor).await?;
            let next = page.next_cursor;
            yield page.ids;

            if next == 0 {
                break;
            }
            if !seen.insert(next) {
                Err::<(), _>(TwitterError::Pagination(format!("friend cursor {next} repeated")))?;
            }
            cursor = next;
        }
    }
}

/// Drain [`friend_id_pages`] into an [`ExclusionSet`].
pub async fn load_exclusion_set<A>(api: &A) -> Result<ExclusionSet, DiscoveryError>
where
    A: TwitterApi + ?Sized,
{
    let pages = friend_id_pages(api);
    pin_mut!(pages);

    let mut set = ExclusionSet::default();
    let mut page_count = 0usize;
    while let Some(ids) = pages.try_next().await.map_err(DiscoveryError::Snapshot)? {
        page_count += 1;
        set.extend(ids);
    }
    tracing::info!(friends = set.len(), pages = page_count, "discovery.friends.loaded");
    Ok(set)
}
