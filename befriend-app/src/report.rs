//! Console lines printed by the CLI.
use befriend_social::twitter::User;
use befriend_social::twitter::types::PROFILE_BASE_URL;

pub const FINDING: &str = "Finding users...";
pub const NOTHING_FOUND: &str = "Try a broader search term next time!";
pub const FOLLOWING: &str = "Following...";
pub const SEPARATOR: &str =
    "-------------------------------------------------------------------------------";

const NAME_WIDTH: usize = 40;

/// Leading `\r` overwrites the last spinner frame.
pub fn found_line(found: usize) -> String {
    format!("\rFound {found} unique users")
}

pub fn followed_line(user: &User) -> String {
    let url = user
        .profile_url()
        .map(String::from)
        .unwrap_or_else(|_| format!("{PROFILE_BASE_URL}{}", user.screen_name));
    format!("{:<width$}{url}", user.name, width = NAME_WIDTH)
}

pub fn summary_line(followed: usize) -> String {
    format!("You are now following {followed} new users!")
}
