//! Identity records and the in-memory crawl result.
//!
//! API-facing records declare exactly the fields they consume; unknown
//! payload keys are dropped by serde's default contract, which keeps the
//! decode forward-compatible with API schema additions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── API Records ───────────────────────────────────────────────────

/// A user identity record from the `users.get` API method.
///
/// Immutable once decoded. Adjacency discovered during a crawl lives in
/// [`CrawlGraph`], not on the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub can_access_closed: bool,
    #[serde(default)]
    pub is_closed: bool,
    /// Sex code as reported by the API: 1 female, 2 male, 0 unspecified.
    #[serde(default)]
    pub sex: Option<u8>,
    #[serde(default)]
    pub city: Option<City>,
}

impl User {
    /// Derived handle persisted on node creation: `{first_name}_{last_name}`.
    pub fn handle(&self) -> String {
        format!("{}_{}", self.first_name, self.last_name)
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sex label persisted on node creation: code 2 maps to "Male",
    /// everything else to "Female".
    pub fn sex_label(&self) -> &'static str {
        match self.sex {
            Some(2) => "Male",
            _ => "Female",
        }
    }

    /// Home town from the optional city descriptor, empty when absent.
    pub fn home_town(&self) -> String {
        self.city
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_default()
    }
}

/// City descriptor attached to a user when the `city` field is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

/// A group identity record from the `groups.get` API method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

// ── Crawl Result ──────────────────────────────────────────────────

/// The in-memory result of a crawl run.
///
/// Identity records are arena-stored by id; adjacency is kept in separately
/// owned, append-only edge lists. The same edge may be appended more than
/// once when a user is rediscovered along a different path — the store's
/// MERGE keys collapse duplicates at persist time.
#[derive(Debug, Clone, Default)]
pub struct CrawlGraph {
    pub users: HashMap<i64, User>,
    pub groups: HashMap<i64, Group>,
    /// Directed follow edges as (follower_id, followed_id).
    pub follows: Vec<(i64, i64)>,
    /// Directed subscription edges as (user_id, group_id).
    pub subscriptions: Vec<(i64, i64)>,
}

impl CrawlGraph {
    /// Insert a user record, keeping the first-seen record for an id.
    pub fn insert_user(&mut self, user: User) {
        self.users.entry(user.id).or_insert(user);
    }

    pub fn insert_group(&mut self, group: Group) {
        self.groups.entry(group.id).or_insert(group);
    }

    pub fn add_follow(&mut self, follower_id: i64, followed_id: i64) {
        self.follows.push((follower_id, followed_id));
    }

    pub fn add_subscription(&mut self, user_id: i64, group_id: i64) {
        self.subscriptions.push((user_id, group_id));
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}
