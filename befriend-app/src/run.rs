use std::io::Write;

use anyhow::{Context, Result};
use befriend_common::observability::init_logging;
use befriend_config::{BefriendConfig, BefriendConfigLoader};
use befriend_discovery::{discover, follow_all, load_exclusion_set, DiscoveryPlan, FollowReport};
use befriend_social::twitter::{TwitterApi, TwitterClient};

use crate::cli::Cli;
use crate::report;
use crate::spinner::Spinner;

/// What a run did, for the exit log line.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub found: usize,
    pub followed: usize,
    pub halted: bool,
}

pub fn load_config(cli: &Cli) -> Result<BefriendConfig> {
    let mut loader = BefriendConfigLoader::new();
    if let Some(path) = &cli.config {
        anyhow::ensure!(path.is_file(), "config file not found: {}", path.display());
        loader = loader.with_file(path);
    }
    Ok(loader.load()?)
}

/// Wire config, logging and the HTTP client, then run the pipeline on stdout.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let cfg = load_config(&cli)?;
    let log_path = init_logging(cfg.logging.to_log_config())?;
    tracing::info!(log = %log_path.display(), term = %cli.search, max = cli.max, "befriend.start");

    let client = TwitterClient::new(
        &cfg.twitter.api_url,
        cfg.twitter.credentials(),
        cfg.twitter.timeout(),
    )?;

    let plan = DiscoveryPlan::new(cli.search.clone(), cli.max_follow()).with_lang(cfg.search.lang.clone());
    let mut stdout = std::io::stdout();
    let summary = execute(&client, &plan, &mut stdout, true).await?;
    tracing::info!(
        found = summary.found,
        followed = summary.followed,
        halted = summary.halted,
        "befriend.done"
    );
    Ok(summary)
}

/// Authenticate, snapshot friends, discover and follow.
///
/// Every step before following is fatal on error. A follow failure stops the batch
/// but still prints the summary and returns `Ok`.
pub async fn execute<A, W>(api: &A, plan: &DiscoveryPlan, out: &mut W, spinner: bool) -> Result<RunSummary>
where
    A: TwitterApi + ?Sized,
    W: Write,
{
    let me = api
        .verify_credentials()
        .await
        .context("verifying Twitter credentials")?;
    tracing::info!(user_id = %me.id, screen_name = %me.screen_name, "auth.verified");

    let exclusion = load_exclusion_set(api).await?;

    writeln!(out, "{}", report::FINDING)?;
    out.flush()?;
    let spinner = spinner.then(Spinner::start);
    let outcome = discover(api, exclusion, plan).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let outcome = outcome?;

    let found = outcome.found();
    writeln!(out, "{}", report::found_line(found))?;
    if found == 0 {
        writeln!(out, "{}", report::NOTHING_FOUND)?;
        return Ok(RunSummary::default());
    }

    writeln!(out, "{}", report::FOLLOWING)?;
    let mut write_err = None;
    let FollowReport { followed, halted } = follow_all(api, outcome.users(), |user| {
        if write_err.is_none() {
            write_err = writeln!(out, "{}", report::followed_line(user)).err();
        }
    })
    .await;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    if let Some(failure) = &halted {
        eprintln!(
            "could not follow {} ({}): {}",
            failure.user.screen_name, failure.kind, failure.error
        );
    }
    writeln!(out, "{}", report::SEPARATOR)?;
    writeln!(out, "{}", report::summary_line(followed.len()))?;

    Ok(RunSummary {
        found,
        followed: followed.len(),
        halted: halted.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use befriend_discovery::MaxFollow;
    use befriend_http::{HttpError, StatusCode};
    use befriend_social::twitter::types::{
        FriendIdsPage, SearchMetadata, SearchResponse, Tweet, TweetSearch, UserSearch,
    };
    use befriend_social::twitter::{TwitterError, User, UserId};
    use std::sync::Mutex;

    fn user(id: u64, name: &str) -> User {
        User {
            id: UserId(id),
            name: name.into(),
            screen_name: name.to_lowercase(),
        }
    }

    fn refused() -> TwitterError {
        TwitterError::Http(HttpError::Api {
            status: StatusCode::FORBIDDEN,
            code: Some(161),
            message: "You are unable to follow more people at this time.".into(),
            request_id: "t".into(),
        })
    }

    /// Friends: {1}. Profile search returns one page; tweet search returns one page.
    struct Scripted {
        profiles: Vec<User>,
        tweet_authors: Vec<User>,
        fail_follow: Option<u64>,
        bad_credentials: bool,
        follows: Mutex<Vec<u64>>,
    }

    impl Scripted {
        fn new(profiles: Vec<User>, tweet_authors: Vec<User>) -> Self {
            Self {
                profiles,
                tweet_authors,
                fail_follow: None,
                bad_credentials: false,
                follows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TwitterApi for Scripted {
        async fn verify_credentials(&self) -> Result<User, TwitterError> {
            if self.bad_credentials {
                return Err(TwitterError::Http(HttpError::Api {
                    status: StatusCode::UNAUTHORIZED,
                    code: Some(32),
                    message: "Could not authenticate you.".into(),
                    request_id: "t".into(),
                }));
            }
            Ok(user(99, "Me"))
        }

        async fn friend_ids(&self, _cursor: i64) -> Result<FriendIdsPage, TwitterError> {
            Ok(FriendIdsPage {
                ids: vec![UserId(1)],
                next_cursor: 0,
            })
        }

        async fn search_users(&self, query: &UserSearch<'_>) -> Result<Vec<User>, TwitterError> {
            Ok(if query.page == 0 { self.profiles.clone() } else { Vec::new() })
        }

        async fn search_tweets(&self, _query: &TweetSearch<'_>) -> Result<SearchResponse, TwitterError> {
            let statuses = self
                .tweet_authors
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, user)| Tweet {
                    id: i as u64,
                    text: String::new(),
                    user,
                    lang: None,
                })
                .collect();
            Ok(SearchResponse {
                statuses,
                search_metadata: SearchMetadata::default(),
            })
        }

        async fn search_tweets_next(&self, _term: &str, next: &str) -> Result<SearchResponse, TwitterError> {
            Err(TwitterError::Pagination(next.to_string()))
        }

        async fn follow(&self, user_id: UserId) -> Result<User, TwitterError> {
            self.follows.lock().unwrap().push(user_id.0);
            if self.fail_follow == Some(user_id.0) {
                return Err(refused());
            }
            Ok(user(user_id.0, "followed"))
        }
    }

    fn plan(max: usize) -> DiscoveryPlan {
        DiscoveryPlan::new("gopher", MaxFollow::clamped(max))
    }

    async fn execute_to_string(api: &Scripted, plan: &DiscoveryPlan) -> (Result<RunSummary>, String) {
        let mut out = Vec::new();
        let res = execute(api, plan, &mut out, false).await;
        (res, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_each_follow_and_the_summary() {
        let api = Scripted::new(vec![user(1, "Friend"), user(2, "Ann")], vec![user(3, "Bob")]);

        let (res, out) = execute_to_string(&api, &plan(50)).await;
        let summary = res.unwrap();

        assert_eq!(summary.found, 2);
        assert_eq!(summary.followed, 2);
        assert!(!summary.halted);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Finding users...");
        assert_eq!(lines[1], "\rFound 2 unique users");
        assert_eq!(lines[2], "Following...");
        assert!(lines[3].starts_with("Ann ") && lines[3].ends_with("https://twitter.com/ann"));
        assert!(lines[4].starts_with("Bob ") && lines[4].ends_with("https://twitter.com/bob"));
        assert_eq!(lines[5], report::SEPARATOR);
        assert_eq!(lines[6], "You are now following 2 new users!");
        assert_eq!(*api.follows.lock().unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn nothing_found_skips_following() {
        let api = Scripted::new(vec![user(1, "Friend")], Vec::new());

        let (res, out) = execute_to_string(&api, &plan(50)).await;

        assert_eq!(res.unwrap().found, 0);
        assert!(out.ends_with("\rFound 0 unique users\nTry a broader search term next time!\n"));
        assert!(api.follows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn follow_failure_still_prints_summary() {
        let mut api = Scripted::new(vec![user(2, "Ann"), user(3, "Bob"), user(4, "Cat")], Vec::new());
        api.fail_follow = Some(3);

        let (res, out) = execute_to_string(&api, &plan(50)).await;
        let summary = res.unwrap();

        assert_eq!(summary.followed, 1);
        assert!(summary.halted);
        assert!(out.ends_with("You are now following 1 new users!\n"));
        assert_eq!(*api.follows.lock().unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn bad_credentials_are_fatal() {
        let mut api = Scripted::new(vec![user(2, "Ann")], Vec::new());
        api.bad_credentials = true;

        let (res, out) = execute_to_string(&api, &plan(50)).await;

        assert!(res.is_err());
        assert!(out.is_empty());
    }
}
