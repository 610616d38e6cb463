//! vkgraph-crawl: bounded expansion of a social graph from a seed user,
//! ingestion into Neo4j, and the read-only analytics CLI.

pub mod config;
pub mod crawler;
pub mod error;
pub mod persist;
pub mod report;
