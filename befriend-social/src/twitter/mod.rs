//! Twitter API integration surface used by the discovery engine.
//!
//! [`TwitterApi`] is the capability boundary; [`TwitterClient`] is the HTTP
//! implementation. Pagination state (page index, cursor, `next_results`) always flows
//! back to the caller, the client never loops on its own.
pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::TwitterApi;
pub use client::{DEFAULT_API_URL, TwitterClient};
pub use error::{FailureKind, TwitterError};
pub use types::{User, UserId};
