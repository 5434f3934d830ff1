use std::collections::HashSet;

use befriend_social::twitter::{User, UserId};

/// Upper bound on users followed per run, clamped to [`MaxFollow::HARD_CEILING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxFollow(usize);

impl MaxFollow {
    pub const DEFAULT: usize = 50;
    /// Following more than this in one go gets the account limited by Twitter.
    pub const HARD_CEILING: usize = 100;

    /// Values above the ceiling are silently lowered to it.
    pub fn clamped(requested: usize) -> Self {
        Self(requested.min(Self::HARD_CEILING))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxFollow {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// IDs of accounts already followed. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    ids: HashSet<UserId>,
}

impl ExclusionSet {
    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn extend(&mut self, ids: impl IntoIterator<Item = UserId>) {
        self.ids.extend(ids);
    }
}

impl FromIterator<UserId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Users queued for following, in follow order, distinct by ID and never longer than
/// its capacity.
#[derive(Debug, Clone)]
pub struct CandidateList {
    users: Vec<User>,
    capacity: usize,
}

impl CandidateList {
    pub fn new(max: MaxFollow) -> Self {
        Self {
            users: Vec::with_capacity(max.get()),
            capacity: max.get(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.users.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Linear scan; the list never holds more than [`MaxFollow::HARD_CEILING`] users.
    pub fn contains(&self, id: UserId) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn ids(&self) -> Vec<UserId> {
        self.users.iter().map(|u| u.id).collect()
    }

    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    fn push(&mut self, user: User) {
        debug_assert!(!self.is_full());
        self.users.push(user);
    }
}

/// Outcome of offering a search result to the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Added,
    /// Already a friend or already queued.
    Known,
    /// New user, but the candidate list is at capacity.
    Full,
}

/// Discovery state owned by the driver and lent to each search phase.
#[derive(Debug, Clone)]
pub struct DiscoveryContext {
    exclusion: ExclusionSet,
    candidates: CandidateList,
}

impl DiscoveryContext {
    pub fn new(exclusion: ExclusionSet, max: MaxFollow) -> Self {
        Self {
            exclusion,
            candidates: CandidateList::new(max),
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn into_candidates(self) -> CandidateList {
        self.candidates
    }

    pub fn is_known(&self, user: &User) -> bool {
        self.exclusion.contains(user.id) || self.candidates.contains(user.id)
    }

    /// Queue `user` unless it is known or the list is full. Known users are reported as
    /// such even when the list is full.
    pub fn offer(&mut self, user: User) -> Offer {
        if self.is_known(&user) {
            return Offer::Known;
        }
        if self.candidates.is_full() {
            return Offer::Full;
        }
        self.candidates.push(user);
        Offer::Added
    }
}
