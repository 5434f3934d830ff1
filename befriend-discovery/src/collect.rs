//! Bounded candidate collection from the two search sources.
use befriend_social::twitter::{TwitterApi, User};

use crate::context::{CandidateList, DiscoveryContext, ExclusionSet, MaxFollow, Offer};
use crate::error::DiscoveryError;
use crate::pages::{PageFetcher, ProfilePages, TweetPages};

/// `users/search` never returns more than 20 per page.
pub const PROFILE_PAGE_LIMIT: usize = 20;
/// `search/tweets` never returns more than 100 per page.
pub const TWEET_PAGE_LIMIT: usize = 100;

/// What to search for and how many users to collect.
#[derive(Debug, Clone)]
pub struct DiscoveryPlan {
    pub term: String,
    pub max_follow: MaxFollow,
    /// Language filter for tweet search.
    pub lang: String,
}

impl DiscoveryPlan {
    pub fn new(term: impl Into<String>, max_follow: MaxFollow) -> Self {
        Self {
            term: term.into(),
            max_follow,
            lang: "en".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub candidates: CandidateList,
    pub by_profile: usize,
    pub by_tweet: usize,
}

impl DiscoveryOutcome {
    pub fn found(&self) -> usize {
        self.by_profile + self.by_tweet
    }

    pub fn users(&self) -> &[User] {
        self.candidates.users()
    }
}

/// Offer every user of every page to `ctx` until the source runs dry or the list is
/// full. Returns how many users this call added.
///
/// Hitting capacity mid-page returns straight away; the rest of that page is dropped.
/// On error, users added from earlier pages stay in `ctx`.
pub async fn collect<F>(ctx: &mut DiscoveryContext, fetcher: &mut F) -> Result<usize, DiscoveryError>
where
    F: PageFetcher + ?Sized,
{
    let mut added = 0;
    loop {
        let page = fetcher.next_page().await?;
        for user in page.users {
            match ctx.offer(user) {
                Offer::Added => added += 1,
                Offer::Known => {}
                Offer::Full => return Ok(added),
            }
        }
        if !page.more || ctx.candidates().is_full() {
            break;
        }
    }
    Ok(added)
}

/// Collect from profile search. No request is made when the list is already full.
pub async fn collect_by_profile<A>(
    api: &A,
    ctx: &mut DiscoveryContext,
    term: &str,
) -> Result<usize, DiscoveryError>
where
    A: TwitterApi + ?Sized,
{
    let page_size = PROFILE_PAGE_LIMIT.min(ctx.candidates().remaining());
    if page_size == 0 {
        return Ok(0);
    }
    let mut pages = ProfilePages::new(api, term, page_size as u32);
    let added = collect(ctx, &mut pages).await?;
    tracing::info!(term, page_size, added, total = ctx.candidates().len(), "discovery.by_profile.done");
    Ok(added)
}

/// Collect from tweet authors. No request is made when the list is already full.
pub async fn collect_by_tweet<A>(
    api: &A,
    ctx: &mut DiscoveryContext,
    term: &str,
    lang: &str,
) -> Result<usize, DiscoveryError>
where
    A: TwitterApi + ?Sized,
{
    let page_size = TWEET_PAGE_LIMIT.min(ctx.candidates().remaining());
    if page_size == 0 {
        return Ok(0);
    }
    let mut pages = TweetPages::new(api, term, lang, page_size as u32);
    let added = collect(ctx, &mut pages).await?;
    tracing::info!(term, lang, page_size, added, total = ctx.candidates().len(), "discovery.by_tweet.done");
    Ok(added)
}

/// Run profile search, then tweet search, against a fresh context.
pub async fn discover<A>(
    api: &A,
    exclusion: ExclusionSet,
    plan: &DiscoveryPlan,
) -> Result<DiscoveryOutcome, DiscoveryError>
where
    A: TwitterApi + ?Sized,
{
    tracing::info!(
        term = %plan.term,
        max_follow = plan.max_follow.get(),
        friends = exclusion.len(),
        "discovery.start"
    );
    let mut ctx = DiscoveryContext::new(exclusion, plan.max_follow);
    let by_profile = collect_by_profile(api, &mut ctx, &plan.term).await?;
    let by_tweet = collect_by_tweet(api, &mut ctx, &plan.term, &plan.lang).await?;
    Ok(DiscoveryOutcome {
        candidates: ctx.into_candidates(),
        by_profile,
        by_tweet,
    })
}
