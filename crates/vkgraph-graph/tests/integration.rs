//! Integration tests for vkgraph-graph against a live Neo4j instance.
//!
//! Run with: cargo test --package vkgraph-graph --test integration -- --ignored
//!
//! Skipped automatically if Neo4j is not available. Each test works in its
//! own id range and deletes those ids before and after, so tests stay
//! independent of whatever else the database holds.

use vkgraph_core::{City, CrawlGraph, Group, User};
use vkgraph_graph::{GraphClient, GraphConfig};

async fn connect_or_skip() -> Option<GraphClient> {
    let config = GraphConfig::default();
    match GraphClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

async fn cleanup(client: &GraphClient, user_ids: &[i64], group_ids: &[i64]) {
    let q = neo4rs::query("MATCH (u:User) WHERE u.id IN $ids DETACH DELETE u")
        .param("ids", user_ids.to_vec());
    let _ = client.run(q).await;
    let q = neo4rs::query("MATCH (g:Group) WHERE g.id IN $ids DETACH DELETE g")
        .param("ids", group_ids.to_vec());
    let _ = client.run(q).await;
}

async fn count_users_in(client: &GraphClient, ids: &[i64]) -> i64 {
    let q = neo4rs::query("MATCH (u:User) WHERE u.id IN $ids RETURN count(u) AS cnt")
        .param("ids", ids.to_vec());
    client
        .query_one(q)
        .await
        .unwrap()
        .and_then(|row| row.get::<i64>("cnt").ok())
        .unwrap_or(0)
}

async fn count_follows_in(client: &GraphClient, ids: &[i64]) -> i64 {
    let q = neo4rs::query(
        "MATCH (a:User)-[r:FOLLOWS]->(b:User)
         WHERE a.id IN $ids AND b.id IN $ids
         RETURN count(r) AS cnt",
    )
    .param("ids", ids.to_vec());
    client
        .query_one(q)
        .await
        .unwrap()
        .and_then(|row| row.get::<i64>("cnt").ok())
        .unwrap_or(0)
}

fn make_user(id: i64, first_name: &str, is_closed: bool) -> User {
    User {
        id,
        first_name: first_name.to_string(),
        last_name: "Test".to_string(),
        can_access_closed: !is_closed,
        is_closed,
        sex: Some(2),
        city: Some(City {
            id: 1,
            title: "Moscow".to_string(),
        }),
    }
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn persist_crawl_is_idempotent() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_000_001, 9_000_002];
    let group_ids = [9_100_001];
    cleanup(&client, &user_ids, &group_ids).await;

    let mut crawl = CrawlGraph::default();
    crawl.insert_user(make_user(9_000_001, "Root", false));
    crawl.insert_user(make_user(9_000_002, "Follower", true));
    crawl.insert_group(Group {
        id: 9_100_001,
        name: "Idempotence Club".to_string(),
    });
    crawl.add_follow(9_000_002, 9_000_001);
    crawl.add_subscription(9_000_001, 9_100_001);

    // Persist twice; counts must match a single persist.
    client.persist_crawl(&crawl).await.unwrap();
    client.persist_crawl(&crawl).await.unwrap();

    assert_eq!(count_users_in(&client, &user_ids).await, 2);
    assert_eq!(count_follows_in(&client, &user_ids).await, 1);

    let q = neo4rs::query(
        "MATCH (u:User {id: $uid})-[r:SUBSCRIBES]->(g:Group {id: $gid})
         RETURN count(r) AS cnt",
    )
    .param("uid", 9_000_001_i64)
    .param("gid", 9_100_001_i64);
    let cnt = client
        .query_one(q)
        .await
        .unwrap()
        .and_then(|row| row.get::<i64>("cnt").ok())
        .unwrap_or(0);
    assert_eq!(cnt, 1);

    cleanup(&client, &user_ids, &group_ids).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn seed_with_one_follower_scenario() {
    // Seed {id, "A", public} with one follower {id, "B", private}, zero
    // groups: expect two User nodes, one FOLLOWS edge B -> A, no groups.
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_010_001, 9_010_002];
    cleanup(&client, &user_ids, &[]).await;

    let mut crawl = CrawlGraph::default();
    crawl.insert_user(make_user(9_010_001, "A", false));
    crawl.insert_user(make_user(9_010_002, "B", true));
    crawl.add_follow(9_010_002, 9_010_001);

    let summary = client.persist_crawl(&crawl).await.unwrap();
    assert_eq!(summary.users, 2);
    assert_eq!(summary.groups, 0);

    assert_eq!(count_users_in(&client, &user_ids).await, 2);
    assert_eq!(count_follows_in(&client, &user_ids).await, 1);

    // The edge points follower -> followed.
    let q = neo4rs::query(
        "MATCH (a:User {id: $follower})-[:FOLLOWS]->(b:User {id: $followed})
         RETURN b.is_closed AS followed_closed, a.is_closed AS follower_closed",
    )
    .param("follower", 9_010_002_i64)
    .param("followed", 9_010_001_i64);
    let row = client.query_one(q).await.unwrap().expect("edge must exist");
    assert!(!row.get::<bool>("followed_closed").unwrap());
    assert!(row.get::<bool>("follower_closed").unwrap());

    cleanup(&client, &user_ids, &[]).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn merge_on_create_does_not_overwrite() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_020_001];
    cleanup(&client, &user_ids, &[]).await;

    client
        .upsert_user(&make_user(9_020_001, "Original", false))
        .await
        .unwrap();
    client
        .upsert_user(&make_user(9_020_001, "Changed", false))
        .await
        .unwrap();

    let users = client.list_users().await.unwrap();
    let user = users.iter().find(|u| u.id == 9_020_001).unwrap();
    assert_eq!(user.name, "Original Test");
    assert_eq!(user.handle, "Original_Test");
    assert_eq!(user.sex, "Male");
    assert_eq!(user.home_town, "Moscow");

    cleanup(&client, &user_ids, &[]).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn mutual_pairs_reported_in_both_directions() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_030_001, 9_030_002, 9_030_003];
    cleanup(&client, &user_ids, &[]).await;

    let mut crawl = CrawlGraph::default();
    for (i, &id) in user_ids.iter().enumerate() {
        crawl.insert_user(make_user(id, &format!("U{i}"), false));
    }
    // 1 <-> 2 mutual; 3 -> 1 one-way.
    crawl.add_follow(9_030_001, 9_030_002);
    crawl.add_follow(9_030_002, 9_030_001);
    crawl.add_follow(9_030_003, 9_030_001);

    client.persist_crawl(&crawl).await.unwrap();

    let pairs = client.mutual_follow_pairs().await.unwrap();
    let ours: Vec<_> = pairs
        .iter()
        .filter(|p| user_ids.contains(&p.user_id))
        .collect();

    // Both directions present, no dedup; the one-way follow is absent.
    assert!(ours
        .iter()
        .any(|p| p.user_id == 9_030_001 && p.other_id == 9_030_002));
    assert!(ours
        .iter()
        .any(|p| p.user_id == 9_030_002 && p.other_id == 9_030_001));
    assert_eq!(ours.len(), 2);

    cleanup(&client, &user_ids, &[]).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn top_users_ranked_by_incoming_follows() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_040_001, 9_040_002, 9_040_003, 9_040_004];
    cleanup(&client, &user_ids, &[]).await;

    let mut crawl = CrawlGraph::default();
    for (i, &id) in user_ids.iter().enumerate() {
        crawl.insert_user(make_user(id, &format!("U{i}"), false));
    }
    // Two followers for 9_040_001, one for 9_040_002.
    crawl.add_follow(9_040_003, 9_040_001);
    crawl.add_follow(9_040_004, 9_040_001);
    crawl.add_follow(9_040_003, 9_040_002);

    client.persist_crawl(&crawl).await.unwrap();

    // A large limit keeps the assertion stable in a shared database.
    let ranks = client.top_users_by_followers(10_000).await.unwrap();
    let ours: Vec<_> = ranks
        .into_iter()
        .filter(|r| user_ids.contains(&r.id))
        .collect();

    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].id, 9_040_001);
    assert_eq!(ours[0].followers, 2);
    assert_eq!(ours[1].id, 9_040_002);
    assert_eq!(ours[1].followers, 1);

    cleanup(&client, &user_ids, &[]).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn top_groups_ranked_by_subscribers() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let user_ids = [9_050_001, 9_050_002];
    let group_ids = [9_150_001, 9_150_002];
    cleanup(&client, &user_ids, &group_ids).await;

    let mut crawl = CrawlGraph::default();
    for (i, &id) in user_ids.iter().enumerate() {
        crawl.insert_user(make_user(id, &format!("U{i}"), false));
    }
    for &id in &group_ids {
        crawl.insert_group(Group {
            id,
            name: format!("Group {id}"),
        });
    }
    crawl.add_subscription(9_050_001, 9_150_001);
    crawl.add_subscription(9_050_002, 9_150_001);
    crawl.add_subscription(9_050_001, 9_150_002);

    client.persist_crawl(&crawl).await.unwrap();

    let ranks = client.top_groups_by_subscribers(10_000).await.unwrap();
    let ours: Vec<_> = ranks
        .into_iter()
        .filter(|r| group_ids.contains(&r.id))
        .collect();

    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].id, 9_150_001);
    assert_eq!(ours[0].subscribers, 2);
    assert_eq!(ours[1].subscribers, 1);

    cleanup(&client, &user_ids, &group_ids).await;
}
