//! Discovery and follow engine.
//!
//! The engine runs in three steps, each driven by the caller:
//!
//! 1. [`snapshot::load_exclusion_set`] drains every page of the account's friend IDs.
//! 2. [`collect::discover`] searches profiles, then tweet authors, and fills a bounded
//!    [`CandidateList`] with users that are neither friends nor already queued.
//! 3. [`follow::follow_all`] follows the candidates in order and stops at the first
//!    failure.
//!
//! All state lives in a [`DiscoveryContext`] owned by the caller and lent to each
//! discovery call, so nothing here is global.
pub mod collect;
pub mod context;
pub mod error;
pub mod follow;
pub mod pages;
pub mod snapshot;

pub use collect::{collect, collect_by_profile, collect_by_tweet, discover, DiscoveryOutcome, DiscoveryPlan};
pub use context::{CandidateList, DiscoveryContext, ExclusionSet, MaxFollow, Offer};
pub use error::DiscoveryError;
pub use follow::{follow_all, FollowFailure, FollowReport};
pub use pages::{Page, PageFetcher, ProfilePages, TweetPages};
pub use snapshot::{friend_id_pages, load_exclusion_set};
