//! Social network clients used by befriend.
//!
//! Only the Twitter v1.1 surface needed for discovering and following users is
//! implemented: credential check, friend IDs, user search, tweet search and follow.
pub mod twitter;
