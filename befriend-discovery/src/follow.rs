//! Sequential follower.
use befriend_social::twitter::{FailureKind, TwitterApi, TwitterError, User};

/// The follow call that stopped the batch.
#[derive(Debug)]
pub struct FollowFailure {
    pub user: User,
    pub kind: FailureKind,
    pub error: TwitterError,
}

#[derive(Debug, Default)]
pub struct FollowReport {
    /// Users followed, in order.
    pub followed: Vec<User>,
    /// Set when the batch stopped early; later candidates were never tried.
    pub halted: Option<FollowFailure>,
}

impl FollowReport {
    pub fn followed_count(&self) -> usize {
        self.followed.len()
    }
}

/// Follow `candidates` in order, calling `on_followed` after each success.
///
/// The first failure of any kind ends the batch. Follow errors never propagate: they
/// are logged and returned in the report.
pub async fn follow_all<A, F>(api: &A, candidates: &[User], mut on_followed: F) -> FollowReport
where
    A: TwitterApi + ?Sized,
    F: FnMut(&User),
{
    let mut report = FollowReport::default();
    for user in candidates {
        match api.follow(user.id).await {
            Ok(_) => {
                tracing::debug!(user_id = %user.id, screen_name = %user.screen_name, "follow.ok");
                on_followed(user);
                report.followed.push(user.clone());
            }
            Err(error) => {
                let kind = error.kind();
                tracing::warn!(
                    user_id = %user.id,
                    screen_name = %user.screen_name,
                    %kind,
                    error = %error,
                    skipped = candidates.len() - report.followed.len() - 1,
                    "follow.failed.halting"
                );
                report.halted = Some(FollowFailure {
                    user: user.clone(),
                    kind,
                    error,
                });
                break;
            }
        }
    }
    report
}
