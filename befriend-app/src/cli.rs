use std::path::PathBuf;

use befriend_discovery::MaxFollow;
use clap::Parser;

/// Follow new Twitter users found by searching profiles and tweets.
#[derive(Debug, Parser)]
#[command(name = "befriend", version, about, long_about = None)]
pub struct Cli {
    /// Search term to find users by (e.g. gopher).
    #[arg(short, long = "search", value_name = "TERM")]
    pub search: String,

    /// Maximum number of users to follow. Values above 100 are lowered to 100.
    #[arg(short, long = "max", value_name = "N", default_value_t = MaxFollow::DEFAULT)]
    pub max: usize,

    /// Optional YAML configuration file.
    #[arg(short, long = "config", value_name = "FILE", env = "BEFRIEND_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn max_follow(&self) -> MaxFollow {
        MaxFollow::clamped(self.max)
    }
}
