//! Bounded depth-first expansion of the social graph.
//!
//! The traversal is an explicit work-list: a stack of `(user_id, depth)`
//! entries, followers pushed in reverse so pop order matches depth-first,
//! left-to-right over the API's follower ordering. Termination comes from
//! the depth bound alone — there is deliberately no visited set, so a user
//! reached along a second path is expanded again, re-issuing its API
//! calls. Worst-case work is O(branching_factor ^ max_depth), accepted
//! for the small default depth.

use uuid::Uuid;

use vkgraph_api::{ApiError, VkClient};
use vkgraph_core::{CrawlGraph, Group, User};

use crate::error::{CrawlError, Result};

/// Read surface of the social graph API consumed by the crawler.
///
/// `None` results mean "fetched successfully, zero items".
#[allow(async_fn_in_trait)]
pub trait SocialGraph {
    async fn get_users(&self, ids: Option<&[i64]>) -> std::result::Result<Option<Vec<User>>, ApiError>;
    async fn get_followers(&self, user_id: Option<i64>) -> std::result::Result<Option<Vec<i64>>, ApiError>;
    async fn get_groups(&self, user_id: Option<i64>) -> std::result::Result<Option<Vec<Group>>, ApiError>;
}

impl SocialGraph for VkClient {
    async fn get_users(&self, ids: Option<&[i64]>) -> std::result::Result<Option<Vec<User>>, ApiError> {
        VkClient::get_users(self, ids).await
    }

    async fn get_followers(&self, user_id: Option<i64>) -> std::result::Result<Option<Vec<i64>>, ApiError> {
        VkClient::get_followers(self, user_id).await
    }

    async fn get_groups(&self, user_id: Option<i64>) -> std::result::Result<Option<Vec<Group>>, ApiError> {
        VkClient::get_groups(self, user_id).await
    }
}

/// The fully fetched expansion of one node, applied to the crawl result
/// only when all three calls succeeded.
struct Expansion {
    followers: Vec<User>,
    groups: Vec<Group>,
}

/// Depth-bounded crawler over a [`SocialGraph`] gateway.
pub struct Crawler<'a, A> {
    api: &'a A,
    max_depth: u32,
}

impl<'a, A: SocialGraph> Crawler<'a, A> {
    pub fn new(api: &'a A, max_depth: u32) -> Self {
        Self { api, max_depth }
    }

    /// Resolve the seed user (by id, or the token owner when absent) and
    /// expand the graph out to the depth bound.
    ///
    /// Per-node API failures are contained: the node stays unexpanded and
    /// the rest of the frontier proceeds. Only a failure resolving the
    /// seed itself aborts the crawl.
    pub async fn run(&self, seed_id: Option<i64>) -> Result<CrawlGraph> {
        let crawl_id = Uuid::new_v4();

        let ids = seed_id.map(|id| vec![id]);
        let seed = self
            .api
            .get_users(ids.as_deref())
            .await?
            .and_then(|mut users| {
                if users.is_empty() {
                    None
                } else {
                    Some(users.remove(0))
                }
            })
            .ok_or(CrawlError::SeedNotFound(seed_id))?;

        tracing::info!(
            crawl_id = %crawl_id,
            seed = seed.id,
            max_depth = self.max_depth,
            "Starting crawl"
        );

        let mut graph = CrawlGraph::default();
        let seed_user_id = seed.id;
        graph.insert_user(seed);

        let mut frontier: Vec<(i64, u32)> = vec![(seed_user_id, 0)];

        while let Some((user_id, depth)) = frontier.pop() {
            match self.fetch_expansion(user_id).await {
                Ok(expansion) => {
                    if depth < self.max_depth {
                        for follower in expansion.followers.iter().rev() {
                            frontier.push((follower.id, depth + 1));
                        }
                    }
                    for follower in expansion.followers {
                        graph.add_follow(follower.id, user_id);
                        graph.insert_user(follower);
                    }
                    for group in expansion.groups {
                        graph.add_subscription(user_id, group.id);
                        graph.insert_group(group);
                    }
                }
                Err(e) => {
                    // Contained: this node stays unexpanded, siblings and
                    // the rest of the frontier continue.
                    tracing::warn!(
                        crawl_id = %crawl_id,
                        user_id,
                        depth,
                        error = %e,
                        "Node expansion failed, leaving unexpanded"
                    );
                }
            }
        }

        tracing::info!(
            crawl_id = %crawl_id,
            users = graph.users.len(),
            groups = graph.groups.len(),
            follows = graph.follows.len(),
            subscriptions = graph.subscriptions.len(),
            "Crawl complete"
        );

        Ok(graph)
    }

    /// The three-call expansion sequence for one node: follower ids, then
    /// follower records, then groups. Nothing is applied on failure.
    async fn fetch_expansion(&self, user_id: i64) -> std::result::Result<Expansion, ApiError> {
        let follower_ids = self.api.get_followers(Some(user_id)).await?;

        let followers = match follower_ids {
            Some(ids) if !ids.is_empty() => self
                .api
                .get_users(Some(&ids))
                .await?
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let groups = self.api.get_groups(Some(user_id)).await?.unwrap_or_default();

        Ok(Expansion { followers, groups })
    }
}
