//! vkgraph-core: Shared domain types for the vkgraph crawler.
//!
//! This crate defines the identity records decoded from the social graph
//! API (User, Group, City) and the in-memory crawl result (CrawlGraph)
//! shared between the crawler and the Neo4j ingestion layer.

pub mod types;

pub use types::{City, CrawlGraph, Group, User};
