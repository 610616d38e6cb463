//! CLI entry point for the vkgraph crawler and analytics queries.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use vkgraph_api::{ApiConfig, VkClient};
use vkgraph_graph::GraphClient;

use vkgraph_crawl::crawler::Crawler;
use vkgraph_crawl::{config, persist, report};

#[derive(Parser)]
#[command(name = "vkgraph-crawl")]
#[command(about = "Bounded social graph crawler with Neo4j ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: vkgraph).
    #[arg(short, long, default_value = "vkgraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the social graph from a seed user and persist it.
    Crawl {
        /// Seed user id (defaults to the token owner's profile).
        #[arg(long)]
        user_id: Option<i64>,

        /// Maximum expansion depth from the seed.
        #[arg(long, default_value_t = 2)]
        depth: u32,
    },

    /// Run a read-only analytics query against the persisted graph.
    Query {
        #[arg(value_enum)]
        kind: QueryKind,
    },

    /// Render a one-level report for a single user (no graph store).
    Report {
        /// User id (defaults to the token owner's profile).
        #[arg(long)]
        user_id: Option<i64>,

        /// Output file path; "-" writes to stdout.
        #[arg(long, default_value = "report.txt")]
        output: String,

        /// Render JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QueryKind {
    /// All persisted users.
    Users,
    /// All persisted groups.
    Groups,
    /// Top 5 users by incoming follow count.
    TopUsers,
    /// Top 5 groups by subscriber count.
    TopGroups,
    /// Mutual follow pairs (both directions reported).
    Mutual,
    /// Every query above, in one document.
    All,
}

const TOP_LIMIT: i64 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Crawl { user_id, depth } => {
            let token = config::access_token()?;
            let api = VkClient::new(ApiConfig::new(token));
            let graph = GraphClient::connect(&config::load_graph_config(&cli.config)).await?;

            let crawl = Crawler::new(&api, depth).run(user_id).await?;
            let summary = persist::persist_crawl(&graph, &crawl).await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::Query { kind } => {
            let graph = GraphClient::connect(&config::load_graph_config(&cli.config)).await?;
            let result = run_query(&graph, kind).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Report {
            user_id,
            output,
            json,
        } => {
            let token = config::access_token()?;
            let api = VkClient::new(ApiConfig::new(token));

            let data = report::build_report(&api, user_id).await?;
            let rendered = if json {
                report::render_json(&data)
            } else {
                report::render_text(&data)
            };
            report::save(&rendered, &output)?;
        }
    }

    Ok(())
}

async fn run_query(
    graph: &GraphClient,
    kind: QueryKind,
) -> anyhow::Result<serde_json::Value> {
    let result = match kind {
        QueryKind::Users => {
            let users = graph.list_users().await?;
            json!({"count": users.len(), "users": users})
        }
        QueryKind::Groups => {
            let groups = graph.list_groups().await?;
            json!({"count": groups.len(), "groups": groups})
        }
        QueryKind::TopUsers => {
            let ranks = graph.top_users_by_followers(TOP_LIMIT).await?;
            json!({"top_users": ranks})
        }
        QueryKind::TopGroups => {
            let ranks = graph.top_groups_by_subscribers(TOP_LIMIT).await?;
            json!({"top_groups": ranks})
        }
        QueryKind::Mutual => {
            let pairs = graph.mutual_follow_pairs().await?;
            json!({"mutual_pairs": pairs})
        }
        QueryKind::All => {
            let users = graph.list_users().await?;
            let groups = graph.list_groups().await?;
            let top_users = graph.top_users_by_followers(TOP_LIMIT).await?;
            let top_groups = graph.top_groups_by_subscribers(TOP_LIMIT).await?;
            let mutual = graph.mutual_follow_pairs().await?;
            json!({
                "users": {"count": users.len(), "users": users},
                "groups": {"count": groups.len(), "groups": groups},
                "top_users": top_users,
                "top_groups": top_groups,
                "mutual_pairs": mutual,
            })
        }
    };
    Ok(result)
}
