//! Configuration loading for the vkgraph CLI.
//!
//! Neo4j connection settings come from an optional `vkgraph.toml` (or the
//! prefix given with `--config`) overlaid with `VKGRAPH__`-prefixed
//! environment variables. The API access token comes from `ACCESS_TOKEN`
//! and has no file fallback: a missing token is startup-fatal for any
//! command that talks to the API.

use vkgraph_graph::GraphConfig;

use crate::error::{CrawlError, Result};

/// Read the API access credential from the process environment.
pub fn access_token() -> Result<String> {
    match std::env::var("ACCESS_TOKEN") {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(CrawlError::MissingToken),
    }
}

/// Load Neo4j connection settings, falling back to defaults per key.
pub fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("VKGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => GraphConfig {
            uri: c
                .get_string("neo4j.uri")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: c
                .get_string("neo4j.user")
                .unwrap_or_else(|_| "neo4j".to_string()),
            password: c
                .get_string("neo4j.password")
                .unwrap_or_else(|_| "vkgraph-dev".to_string()),
            ..Default::default()
        },
        Err(_) => GraphConfig::default(),
    }
}
