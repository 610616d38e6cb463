//! Write operations for the social graph.
//!
//! All node and edge writes use MERGE with create-only attribute sets:
//! re-merging an existing id is a no-op for its data, which is what makes
//! re-running a crawl safe. Nodes are keyed by their API id, edges by the
//! ordered endpoint pair.

use chrono::Utc;
use neo4rs::{query, Query};
use serde::Serialize;

use vkgraph_core::{CrawlGraph, Group, User};

use crate::client::{GraphClient, GraphError};

/// Entity counts written by a persist run (in-memory counts; duplicates
/// collapsed by the store are still counted here).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PersistSummary {
    pub users: usize,
    pub groups: usize,
    pub follows: usize,
    pub subscriptions: usize,
}

impl GraphClient {
    // ── Single-Entity Upserts ────────────────────────────────────

    /// Upsert one User node, keyed by id.
    pub async fn upsert_user(&self, user: &User) -> Result<(), GraphError> {
        self.run(user_merge(user, &Utc::now().to_rfc3339())).await
    }

    /// Upsert one Group node, keyed by id.
    pub async fn upsert_group(&self, group: &Group) -> Result<(), GraphError> {
        self.run(group_merge(group, &Utc::now().to_rfc3339())).await
    }

    /// Merge a FOLLOWS edge between two already-persisted users.
    pub async fn connect_follow(
        &self,
        follower_id: i64,
        followed_id: i64,
    ) -> Result<(), GraphError> {
        self.run(follow_merge(
            follower_id,
            followed_id,
            &Utc::now().to_rfc3339(),
        ))
        .await
    }

    /// Merge a SUBSCRIBES edge between a persisted user and group.
    pub async fn connect_subscribe(
        &self,
        user_id: i64,
        group_id: i64,
    ) -> Result<(), GraphError> {
        self.run(subscribe_merge(user_id, group_id, &Utc::now().to_rfc3339()))
            .await
    }

    // ── Batch Ingestion ──────────────────────────────────────────

    /// Persist a whole crawl result in one transaction.
    ///
    /// Every node statement runs before any edge statement, so an edge
    /// MERGE never references a node absent from the store. A failure
    /// anywhere aborts the transaction; nothing is partially committed.
    pub async fn persist_crawl(&self, crawl: &CrawlGraph) -> Result<PersistSummary, GraphError> {
        let now = Utc::now().to_rfc3339();
        let mut txn = self.start_txn().await?;

        for user in crawl.users.values() {
            txn.run(user_merge(user, &now)).await?;
        }
        for group in crawl.groups.values() {
            txn.run(group_merge(group, &now)).await?;
        }
        for &(follower_id, followed_id) in &crawl.follows {
            txn.run(follow_merge(follower_id, followed_id, &now)).await?;
        }
        for &(user_id, group_id) in &crawl.subscriptions {
            txn.run(subscribe_merge(user_id, group_id, &now)).await?;
        }

        txn.commit().await?;

        Ok(PersistSummary {
            users: crawl.users.len(),
            groups: crawl.groups.len(),
            follows: crawl.follows.len(),
            subscriptions: crawl.subscriptions.len(),
        })
    }
}

// ── Statement Builders ───────────────────────────────────────────

fn user_merge(user: &User, now: &str) -> Query {
    query(
        "MERGE (u:User {id: $id})
         ON CREATE SET
           u.handle = $handle, u.name = $name, u.sex = $sex,
           u.home_town = $home_town, u.is_closed = $is_closed,
           u.can_access_closed = $can_access_closed,
           u.first_seen = $now",
    )
    .param("id", user.id)
    .param("handle", user.handle())
    .param("name", user.full_name())
    .param("sex", user.sex_label().to_string())
    .param("home_town", user.home_town())
    .param("is_closed", user.is_closed)
    .param("can_access_closed", user.can_access_closed)
    .param("now", now.to_string())
}

fn group_merge(group: &Group, now: &str) -> Query {
    query(
        "MERGE (g:Group {id: $id})
         ON CREATE SET g.name = $name, g.first_seen = $now",
    )
    .param("id", group.id)
    .param("name", group.name.clone())
    .param("now", now.to_string())
}

fn follow_merge(follower_id: i64, followed_id: i64, now: &str) -> Query {
    query(
        "MATCH (a:User {id: $follower_id})
         MATCH (b:User {id: $followed_id})
         MERGE (a)-[r:FOLLOWS]->(b)
         ON CREATE SET r.first_seen = $now",
    )
    .param("follower_id", follower_id)
    .param("followed_id", followed_id)
    .param("now", now.to_string())
}

fn subscribe_merge(user_id: i64, group_id: i64, now: &str) -> Query {
    query(
        "MATCH (u:User {id: $user_id})
         MATCH (g:Group {id: $group_id})
         MERGE (u)-[r:SUBSCRIBES]->(g)
         ON CREATE SET r.first_seen = $now",
    )
    .param("user_id", user_id)
    .param("group_id", group_id)
    .param("now", now.to_string())
}
