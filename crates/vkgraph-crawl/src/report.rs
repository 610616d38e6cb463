//! Single-user report: one level of followers and groups, rendered as
//! plain text or JSON without touching the graph store.

use serde::Serialize;

use vkgraph_core::{Group, User};

use crate::crawler::SocialGraph;
use crate::error::{CrawlError, Result};

/// Everything the report renders, fetched in one pass.
#[derive(Debug, Serialize)]
pub struct Report {
    pub user: User,
    pub followers: Vec<User>,
    pub groups: Vec<Group>,
}

/// Fetch the report data for a user (or the token owner when absent).
pub async fn build_report<A: SocialGraph>(api: &A, user_id: Option<i64>) -> Result<Report> {
    let ids = user_id.map(|id| vec![id]);
    let user = api
        .get_users(ids.as_deref())
        .await?
        .and_then(|mut users| {
            if users.is_empty() {
                None
            } else {
                Some(users.remove(0))
            }
        })
        .ok_or(CrawlError::SeedNotFound(user_id))?;

    let followers = match api.get_followers(user_id.or(Some(user.id))).await? {
        Some(ids) if !ids.is_empty() => api
            .get_users(Some(&ids))
            .await?
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let groups = api
        .get_groups(user_id.or(Some(user.id)))
        .await?
        .unwrap_or_default();

    Ok(Report {
        user,
        followers,
        groups,
    })
}

/// Render the report as plain text.
pub fn render_text(report: &Report) -> String {
    let mut lines = Vec::new();

    lines.push("User Info:".to_string());
    lines.push(format!("  ID: {}", report.user.id));
    lines.push(format!("  Name: {}", report.user.full_name()));
    lines.push(format!(
        "  Account status: {}",
        visibility(report.user.is_closed)
    ));
    lines.push(String::new());

    if report.followers.is_empty() {
        lines.push("Followers: none".to_string());
    } else {
        lines.push(format!("Followers ({}):", report.followers.len()));
        for follower in &report.followers {
            lines.push(format!(
                "  - {} (ID: {}, Status: {})",
                follower.full_name(),
                follower.id,
                visibility(follower.is_closed)
            ));
        }
    }
    lines.push(String::new());

    if report.groups.is_empty() {
        lines.push("Groups: none".to_string());
    } else {
        lines.push(format!("Groups ({}):", report.groups.len()));
        for group in &report.groups {
            lines.push(format!("  - {} (ID: {})", group.name, group.id));
        }
    }

    lines.join("\n")
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &Report) -> String {
    // Report is plain data; serialization cannot fail.
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Write rendered output to a file path, or stdout when the path is "-".
pub fn save(rendered: &str, output: &str) -> Result<()> {
    if output == "-" {
        println!("{rendered}");
    } else {
        std::fs::write(output, rendered)?;
        tracing::info!(output, "Report saved");
    }
    Ok(())
}

fn visibility(is_closed: bool) -> &'static str {
    if is_closed {
        "Private"
    } else {
        "Public"
    }
}
