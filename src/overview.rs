// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overview badge renderer.
//!
//! Combines six scalar statistics plus the display name into a flat JSON
//! payload and the overview SVG template. Numbers keep their native type in
//! JSON; in the SVG they are formatted with thousands-group separators.

use std::collections::HashMap;

use serde_json::json;

use crate::{
    artifact::RenderedArtifact,
    error::Error,
    stats::StatisticsSource,
    template::render_template
};

/// Formats a non-negative integer with comma group separators.
///
/// Values below 1000 are returned without separators.
///
/// # Examples
///
/// ```
/// use gh_stats_badges::format_grouped;
///
/// assert_eq!(format_grouped(56), "56");
/// assert_eq!(format_grouped(1234), "1,234");
/// assert_eq!(format_grouped(1_000_000), "1,000,000");
/// ```
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Renders the overview artifact from the shared statistics source.
///
/// Accessor failures propagate as a generation failure for the whole
/// artifact; no partial overview is ever produced.
///
/// # Errors
///
/// Returns [`Error::Provider`] when any statistic cannot be resolved.
pub async fn render_overview<S>(stats: &S, template: &str) -> Result<RenderedArtifact, Error>
where
    S: StatisticsSource
{
    let name = stats.name().await?;
    let stars = stats.stargazers().await?;
    let forks = stats.forks().await?;
    let contributions = stats.total_contributions().await?;
    let (added, deleted) = stats.lines_changed().await?;
    let lines_changed = added + deleted;
    let views = stats.views().await?;
    let repos = stats.repos().await?.len() as u64;

    let payload = json!({
        "name": name,
        "stars": stars,
        "forks": forks,
        "contributions": contributions,
        "lines_changed": lines_changed,
        "views": views,
        "repos": repos
    });

    let substitutions = HashMap::from([
        ("name", name),
        ("stars", format_grouped(stars)),
        ("forks", format_grouped(forks)),
        ("contributions", format_grouped(contributions)),
        ("lines_changed", format_grouped(lines_changed)),
        ("views", format_grouped(views)),
        ("repos", format_grouped(repos))
    ]);

    Ok(RenderedArtifact {
        json: payload,
        svg:  render_template(template, &substitutions)
    })
}
