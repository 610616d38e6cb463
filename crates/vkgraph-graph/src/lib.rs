//! vkgraph-graph: Neo4j client for the persisted social graph.
//!
//! All graph reads and writes flow through this crate. Writes use MERGE
//! upserts keyed by entity id so re-running a crawl never duplicates
//! nodes or edges; reads are the fixed analytics query set.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use mutations::PersistSummary;
