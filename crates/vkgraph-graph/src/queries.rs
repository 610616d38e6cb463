//! Read-only analytics over the persisted social graph.

use neo4rs::query;
use serde::{Deserialize, Serialize};

use crate::client::{GraphClient, GraphError};

/// A persisted User node as returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub sex: String,
    pub home_town: String,
    pub is_closed: bool,
}

/// A persisted Group node as returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
}

/// A user ranked by incoming FOLLOWS edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRank {
    pub id: i64,
    pub name: String,
    pub followers: i64,
}

/// A group ranked by incoming SUBSCRIBES edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRank {
    pub id: i64,
    pub name: String,
    pub subscribers: i64,
}

/// One direction of a mutual follow. Each mutual pair is reported twice,
/// once per direction; deduplication is intentionally not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualPair {
    pub user_id: i64,
    pub other_id: i64,
}

impl GraphClient {
    /// List every persisted User node, ordered by id.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, GraphError> {
        let q = query("MATCH (u:User) RETURN u ORDER BY u.id");
        let rows = self.query_rows(q).await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row
                .get("u")
                .map_err(|e| GraphError::Malformed(format!("user node: {e}")))?;
            users.push(UserRecord {
                id: node.get::<i64>("id").unwrap_or_default(),
                handle: node.get::<String>("handle").unwrap_or_default(),
                name: node.get::<String>("name").unwrap_or_default(),
                sex: node.get::<String>("sex").unwrap_or_default(),
                home_town: node.get::<String>("home_town").unwrap_or_default(),
                is_closed: node.get::<bool>("is_closed").unwrap_or_default(),
            });
        }
        Ok(users)
    }

    /// List every persisted Group node, ordered by id.
    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>, GraphError> {
        let q = query("MATCH (g:Group) RETURN g ORDER BY g.id");
        let rows = self.query_rows(q).await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row
                .get("g")
                .map_err(|e| GraphError::Malformed(format!("group node: {e}")))?;
            groups.push(GroupRecord {
                id: node.get::<i64>("id").unwrap_or_default(),
                name: node.get::<String>("name").unwrap_or_default(),
            });
        }
        Ok(groups)
    }

    /// Top users by incoming FOLLOWS count, descending, ties stable by id.
    pub async fn top_users_by_followers(
        &self,
        limit: i64,
    ) -> Result<Vec<UserRank>, GraphError> {
        let q = query(
            "MATCH (f:User)-[:FOLLOWS]->(u:User)
             RETURN u.id AS id, u.name AS name, count(f) AS followers
             ORDER BY followers DESC, id ASC
             LIMIT $limit",
        )
        .param("limit", limit);

        let rows = self.query_rows(q).await?;
        let mut ranks = Vec::with_capacity(rows.len());
        for row in rows {
            ranks.push(UserRank {
                id: row.get::<i64>("id").unwrap_or_default(),
                name: row.get::<String>("name").unwrap_or_default(),
                followers: row.get::<i64>("followers").unwrap_or_default(),
            });
        }
        Ok(ranks)
    }

    /// Top groups by incoming SUBSCRIBES count, descending, ties stable by id.
    pub async fn top_groups_by_subscribers(
        &self,
        limit: i64,
    ) -> Result<Vec<GroupRank>, GraphError> {
        let q = query(
            "MATCH (u:User)-[:SUBSCRIBES]->(g:Group)
             RETURN g.id AS id, g.name AS name, count(u) AS subscribers
             ORDER BY subscribers DESC, id ASC
             LIMIT $limit",
        )
        .param("limit", limit);

        let rows = self.query_rows(q).await?;
        let mut ranks = Vec::with_capacity(rows.len());
        for row in rows {
            ranks.push(GroupRank {
                id: row.get::<i64>("id").unwrap_or_default(),
                name: row.get::<String>("name").unwrap_or_default(),
                subscribers: row.get::<i64>("subscribers").unwrap_or_default(),
            });
        }
        Ok(ranks)
    }

    /// All ordered pairs (a, b) where FOLLOWS edges exist both ways.
    ///
    /// Each mutual pair comes back twice, once per direction. Callers that
    /// want one row per pair must dedup themselves.
    pub async fn mutual_follow_pairs(&self) -> Result<Vec<MutualPair>, GraphError> {
        let q = query(
            "MATCH (a:User)-[:FOLLOWS]->(b:User)
             MATCH (b)-[:FOLLOWS]->(a)
             RETURN a.id AS user_id, b.id AS other_id
             ORDER BY user_id, other_id",
        );

        let rows = self.query_rows(q).await?;
        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            pairs.push(MutualPair {
                user_id: row.get::<i64>("user_id").unwrap_or_default(),
                other_id: row.get::<i64>("other_id").unwrap_or_default(),
            });
        }
        Ok(pairs)
    }
}
