//! Ingestion of a crawl result into Neo4j.

use vkgraph_core::CrawlGraph;
use vkgraph_graph::{GraphClient, PersistSummary};

use crate::error::Result;

/// Write a crawl result to the graph store in one transaction.
///
/// The whole write commits or rolls back together; a mid-write failure
/// surfaces to the caller and nothing is retried here. Re-running with
/// the same or an overlapping crawl is safe: every statement merges on
/// its identity key.
pub async fn persist_crawl(
    graph: &GraphClient,
    crawl: &CrawlGraph,
) -> Result<PersistSummary> {
    if crawl.is_empty() {
        tracing::warn!("Crawl result is empty, nothing to persist");
        return Ok(PersistSummary::default());
    }

    let summary = graph.persist_crawl(crawl).await?;

    tracing::info!(
        users = summary.users,
        groups = summary.groups,
        follows = summary.follows,
        subscriptions = summary.subscriptions,
        "Persisted crawl result"
    );

    Ok(summary)
}
