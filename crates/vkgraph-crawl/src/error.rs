//! Error types for the vkgraph-crawl crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("ACCESS_TOKEN is not set in the environment")]
    MissingToken,

    #[error("seed user {0:?} was not found")]
    SeedNotFound(Option<i64>),

    #[error("API error: {0}")]
    Api(#[from] vkgraph_api::ApiError),

    #[error("graph error: {0}")]
    Graph(#[from] vkgraph_graph::GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
