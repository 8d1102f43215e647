// SPDX-License-Identifier: MIT OR Apache-2.0

//! GitHub-backed statistics provider.
//!
//! Aggregates the authenticated user's statistics through one paginated
//! GraphQL query over their owned repositories plus a handful of follow-up
//! GraphQL and REST calls. Every aggregate is memoized behind a
//! [`tokio::sync::OnceCell`], so the two renderers issuing overlapping
//! accessor calls against a shared instance trigger each fetch at most once
//! per run. Nothing is cached across runs and no call is retried.

use std::collections::{HashMap, HashSet};

use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{
    config::Configuration,
    error::Error,
    stats::{LanguageStats, StatisticsSource}
};

const PROFILE_QUERY: &str = r"
query($login: String!, $cursor: String) {
  user(login: $login) {
    name
    login
    repositories(first: 100, after: $cursor, ownerAffiliations: OWNER) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        nameWithOwner
        isFork
        forkCount
        stargazers { totalCount }
        languages(first: 25, orderBy: {field: SIZE, direction: DESC}) {
          edges { size node { name color } }
        }
      }
    }
  }
}";

const CONTRIBUTION_YEARS_QUERY: &str = r"
query($login: String!) {
  user(login: $login) {
    contributionsCollection { contributionYears }
  }
}";

const CONTRIBUTIONS_BY_YEAR_QUERY: &str = r"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar { totalContributions }
    }
  }
}";

/// Memoizing statistics provider backed by the GitHub API.
pub struct GitHubStats {
    octocrab:      Octocrab,
    config:        Configuration,
    profile:       OnceCell<Profile>,
    contributions: OnceCell<u64>,
    lines:         OnceCell<(u64, u64)>,
    views:         OnceCell<u64>
}

/// Snapshot of the user plus their counted repositories.
#[derive(Debug, Clone)]
struct Profile {
    name:  String,
    repos: Vec<RepoSummary>
}

/// Per-repository figures consumed by the aggregate accessors.
#[derive(Debug, Clone)]
pub(crate) struct RepoSummary {
    pub(crate) name:       String,
    pub(crate) full_name:  String,
    pub(crate) is_fork:    bool,
    pub(crate) stargazers: u64,
    pub(crate) forks:      u64,
    /// (language name, byte size, display color) in platform emission order.
    pub(crate) languages:  Vec<(String, u64, Option<String>)>
}

impl GitHubStats {
    /// Builds an authenticated provider for the configured user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provider`] when the API client cannot be constructed
    /// from the configured token.
    pub fn connect(config: Configuration) -> Result<Self, Error> {
        let octocrab = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .map_err(|e| Error::provider(format!("failed to build API client: {e}")))?;

        Ok(Self::new(octocrab, config))
    }

    /// Wraps an existing client, mainly useful for tests and embedding.
    pub fn new(octocrab: Octocrab, config: Configuration) -> Self {
        Self {
            octocrab,
            config,
            profile: OnceCell::new(),
            contributions: OnceCell::new(),
            lines: OnceCell::new(),
            views: OnceCell::new()
        }
    }

    async fn graphql(&self, query: &str, variables: serde_json::Value) -> Result<serde_json::Value, Error> {
        let response: serde_json::Value = self
            .octocrab
            .graphql(&json!({"query": query, "variables": variables}))
            .await?;

        if let Some(errors) = response.get("errors") {
            return Err(Error::provider(format!("GraphQL reported errors: {errors}")));
        }

        Ok(response)
    }

    async fn profile(&self) -> Result<&Profile, Error> {
        self.profile.get_or_try_init(|| self.fetch_profile()).await
    }

    async fn fetch_profile(&self) -> Result<Profile, Error> {
        let mut name = self.config.user.clone();
        let mut repos = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = self
                .graphql(
                    PROFILE_QUERY,
                    json!({"login": self.config.user, "cursor": cursor})
                )
                .await?;

            let page: ProfilePage = serde_json::from_value(response)?;
            let user = page
                .data
                .and_then(|data| data.user)
                .ok_or_else(|| Error::provider(format!("user '{}' not found", self.config.user)))?;

            if let Some(display_name) = user.name.filter(|value| !value.is_empty()) {
                name = display_name;
            }

            debug!(
                fetched = user.repositories.nodes.len(),
                "fetched repository page"
            );

            for node in user.repositories.nodes {
                let summary = RepoSummary::from(node);
                if keep_repo(&summary, &self.config) {
                    repos.push(summary);
                }
            }

            if !user.repositories.page_info.has_next_page {
                break;
            }
            cursor = user.repositories.page_info.end_cursor;
        }

        info!(repos = repos.len(), user = %self.config.user, "resolved repository collection");

        Ok(Profile {
            name,
            repos
        })
    }

    async fn fetch_contributions(&self) -> Result<u64, Error> {
        let response = self
            .graphql(CONTRIBUTION_YEARS_QUERY, json!({"login": self.config.user}))
            .await?;
        let years: ContributionYearsPage = serde_json::from_value(response)?;
        let years = years
            .data
            .and_then(|data| data.user)
            .map(|user| user.contributions_collection.contribution_years)
            .unwrap_or_default();

        let mut total = 0;
        for year in years {
            let response = self
                .graphql(
                    CONTRIBUTIONS_BY_YEAR_QUERY,
                    json!({
                        "login": self.config.user,
                        "from": format!("{year}-01-01T00:00:00Z"),
                        "to": format!("{year}-12-31T23:59:59Z")
                    })
                )
                .await?;
            let page: ContributionCalendarPage = serde_json::from_value(response)?;
            let contributions = page
                .data
                .and_then(|data| data.user)
                .map(|user| {
                    user.contributions_collection
                        .contribution_calendar
                        .total_contributions
                })
                .unwrap_or(0);
            debug!(year, contributions, "fetched contribution calendar");
            total += contributions;
        }

        Ok(total)
    }

    /// Sums the user's weekly additions and deletions across repositories.
    ///
    /// A repository whose contributor statistics are still being computed by
    /// the platform contributes zero rather than failing the run.
    async fn fetch_lines_changed(&self) -> Result<(u64, u64), Error> {
        let profile = self.profile().await?;
        let mut added = 0;
        let mut deleted = 0;

        for repo in &profile.repos {
            let route = format!("/repos/{}/stats/contributors", repo.full_name);
            let response: Result<serde_json::Value, octocrab::Error> =
                self.octocrab.get(&route, None::<&()>).await;

            let stats = match response {
                Ok(value) => value,
                Err(e) => {
                    warn!(repo = %repo.full_name, "skipping contributor stats: {e}");
                    continue;
                }
            };

            let Ok(contributors) = serde_json::from_value::<Vec<ContributorStats>>(stats) else {
                // 202: statistics not yet materialized for this repository.
                warn!(repo = %repo.full_name, "contributor stats not ready, counted as zero");
                continue;
            };

            for contributor in contributors {
                if contributor.author.is_some_and(|author| author.login == self.config.user) {
                    for week in contributor.weeks {
                        added += week.additions;
                        deleted += week.deletions;
                    }
                }
            }
        }

        Ok((added, deleted))
    }

    /// Sums recent view counts across repositories.
    ///
    /// Traffic data requires push access; repositories that refuse it are
    /// counted as zero.
    async fn fetch_views(&self) -> Result<u64, Error> {
        let profile = self.profile().await?;
        let mut total = 0;

        for repo in &profile.repos {
            let route = format!("/repos/{}/traffic/views", repo.full_name);
            let response: Result<TrafficViews, octocrab::Error> =
                self.octocrab.get(&route, None::<&()>).await;

            match response {
                Ok(traffic) => total += traffic.count,
                Err(e) => warn!(repo = %repo.full_name, "skipping traffic views: {e}")
            }
        }

        Ok(total)
    }
}

impl StatisticsSource for GitHubStats {
    async fn name(&self) -> Result<String, Error> {
        Ok(self.profile().await?.name.clone())
    }

    async fn stargazers(&self) -> Result<u64, Error> {
        let profile = self.profile().await?;
        Ok(profile.repos.iter().map(|repo| repo.stargazers).sum())
    }

    async fn forks(&self) -> Result<u64, Error> {
        let profile = self.profile().await?;
        Ok(profile.repos.iter().map(|repo| repo.forks).sum())
    }

    async fn total_contributions(&self) -> Result<u64, Error> {
        self.contributions
            .get_or_try_init(|| self.fetch_contributions())
            .await
            .copied()
    }

    async fn lines_changed(&self) -> Result<(u64, u64), Error> {
        self.lines
            .get_or_try_init(|| self.fetch_lines_changed())
            .await
            .copied()
    }

    async fn views(&self) -> Result<u64, Error> {
        self.views.get_or_try_init(|| self.fetch_views()).await.copied()
    }

    async fn repos(&self) -> Result<Vec<String>, Error> {
        let profile = self.profile().await?;
        Ok(profile.repos.iter().map(|repo| repo.full_name.clone()).collect())
    }

    async fn languages(&self) -> Result<Vec<(String, LanguageStats)>, Error> {
        let profile = self.profile().await?;
        Ok(aggregate_languages(&profile.repos, &self.config.excluded_langs))
    }
}

/// Decides whether a repository participates in the aggregates.
fn keep_repo(repo: &RepoSummary, config: &Configuration) -> bool {
    if config.ignore_forked_repos && repo.is_fork {
        return false;
    }
    !(config.excluded_repos.contains(&repo.name)
        || config.excluded_repos.contains(&repo.full_name))
}

/// Aggregates per-repository language sizes into one mapping.
///
/// Languages keep first-encounter order across the repository collection;
/// the first reported color wins; shares are computed against the total byte
/// count after exclusions.
fn aggregate_languages(
    repos: &[RepoSummary],
    excluded: &HashSet<String>
) -> Vec<(String, LanguageStats)> {
    let mut order: Vec<String> = Vec::new();
    let mut sizes: HashMap<String, u64> = HashMap::new();
    let mut colors: HashMap<String, Option<String>> = HashMap::new();

    for repo in repos {
        for (language, size, color) in &repo.languages {
            if excluded.contains(language) {
                continue;
            }
            if !sizes.contains_key(language) {
                order.push(language.clone());
                colors.insert(language.clone(), color.clone());
            } else if let Some(stored) = colors.get_mut(language)
                && stored.is_none()
            {
                *stored = color.clone();
            }
            *sizes.entry(language.clone()).or_insert(0) += size;
        }
    }

    let total: u64 = sizes.values().sum();

    order
        .into_iter()
        .map(|language| {
            let size = sizes[&language];
            let prop = if total > 0 {
                Some(100.0 * size as f64 / total as f64)
            } else {
                None
            };
            let color = colors.remove(&language).flatten();
            (
                language,
                LanguageStats {
                    size,
                    color,
                    prop
                }
            )
        })
        .collect()
}

impl From<RepoNode> for RepoSummary {
    fn from(node: RepoNode) -> Self {
        Self {
            name:       node.name,
            full_name:  node.name_with_owner,
            is_fork:    node.is_fork,
            stargazers: node.stargazers.total_count,
            forks:      node.fork_count,
            languages:  node
                .languages
                .edges
                .into_iter()
                .map(|edge| (edge.node.name, edge.size, edge.node.color))
                .collect()
        }
    }
}

#[derive(Deserialize)]
struct ProfilePage {
    data: Option<ProfileData>
}

#[derive(Deserialize)]
struct ProfileData {
    user: Option<ProfileUser>
}

#[derive(Deserialize)]
struct ProfileUser {
    name:         Option<String>,
    repositories: RepositoryConnection
}

#[derive(Deserialize)]
struct RepositoryConnection {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    #[serde(default)]
    nodes:     Vec<RepoNode>
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor:    Option<String>
}

#[derive(Deserialize)]
struct RepoNode {
    name:            String,
    #[serde(rename = "nameWithOwner")]
    name_with_owner: String,
    #[serde(rename = "isFork")]
    is_fork:         bool,
    #[serde(rename = "forkCount")]
    fork_count:      u64,
    stargazers:      CountNode,
    languages:       LanguageConnection
}

#[derive(Deserialize)]
struct CountNode {
    #[serde(rename = "totalCount")]
    total_count: u64
}

#[derive(Deserialize)]
struct LanguageConnection {
    #[serde(default)]
    edges: Vec<LanguageEdge>
}

#[derive(Deserialize)]
struct LanguageEdge {
    size: u64,
    node: LanguageNode
}

#[derive(Deserialize)]
struct LanguageNode {
    name:  String,
    color: Option<String>
}

#[derive(Deserialize)]
struct ContributionYearsPage {
    data: Option<ContributionYearsData>
}

#[derive(Deserialize)]
struct ContributionYearsData {
    user: Option<ContributionYearsUser>
}

#[derive(Deserialize)]
struct ContributionYearsUser {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: ContributionYears
}

#[derive(Deserialize)]
struct ContributionYears {
    #[serde(rename = "contributionYears")]
    contribution_years: Vec<i32>
}

#[derive(Deserialize)]
struct ContributionCalendarPage {
    data: Option<ContributionCalendarData>
}

#[derive(Deserialize)]
struct ContributionCalendarData {
    user: Option<ContributionCalendarUser>
}

#[derive(Deserialize)]
struct ContributionCalendarUser {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: ContributionCalendarCollection
}

#[derive(Deserialize)]
struct ContributionCalendarCollection {
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: ContributionCalendar
}

#[derive(Deserialize)]
struct ContributionCalendar {
    #[serde(rename = "totalContributions")]
    total_contributions: u64
}

#[derive(Deserialize)]
struct ContributorStats {
    author: Option<ContributorAuthor>,
    #[serde(default)]
    weeks:  Vec<ContributorWeek>
}

#[derive(Deserialize)]
struct ContributorAuthor {
    login: String
}

#[derive(Deserialize)]
struct ContributorWeek {
    #[serde(rename = "a", default)]
    additions: u64,
    #[serde(rename = "d", default)]
    deletions: u64
}

#[derive(Deserialize)]
struct TrafficViews {
    count: u64
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{RepoSummary, aggregate_languages, keep_repo};
    use crate::config::Configuration;

    fn repo(name: &str, is_fork: bool, languages: Vec<(&str, u64, Option<&str>)>) -> RepoSummary {
        RepoSummary {
            name:       name.to_owned(),
            full_name:  format!("octocat/{name}"),
            is_fork,
            stargazers: 0,
            forks:      0,
            languages:  languages
                .into_iter()
                .map(|(language, size, color)| {
                    (language.to_owned(), size, color.map(str::to_owned))
                })
                .collect()
        }
    }

    fn config(excluded_repos: &[&str], ignore_forks: bool) -> Configuration {
        let joined = excluded_repos.join(",");
        Configuration::from_inputs(
            Some("token".to_owned()),
            Some("octocat".to_owned()),
            Some(joined.as_str()),
            None,
            Some(if ignore_forks { "true" } else { "false" })
        )
        .expect("valid configuration")
    }

    #[test]
    fn forked_repos_are_skipped_when_configured() {
        let config = config(&[], true);
        assert!(!keep_repo(&repo("fork", true, vec![]), &config));
        assert!(keep_repo(&repo("own", false, vec![]), &config));
    }

    #[test]
    fn forked_repos_are_kept_when_fork_ignoring_is_disabled() {
        let config = config(&[], false);
        assert!(keep_repo(&repo("fork", true, vec![]), &config));
    }

    #[test]
    fn excluded_repos_match_bare_and_full_names() {
        let config = config(&["skipped", "octocat/also-skipped"], true);
        assert!(!keep_repo(&repo("skipped", false, vec![]), &config));
        assert!(!keep_repo(&repo("also-skipped", false, vec![]), &config));
        assert!(keep_repo(&repo("kept", false, vec![]), &config));
    }

    #[test]
    fn languages_aggregate_in_first_encounter_order() {
        let repos = vec![
            repo("a", false, vec![("Rust", 300, Some("#dea584")), ("Shell", 100, None)]),
            repo("b", false, vec![("Shell", 100, Some("#89e051")), ("Rust", 100, None)]),
        ];

        let languages = aggregate_languages(&repos, &HashSet::new());
        assert_eq!(languages.len(), 2);

        let (ref rust_name, ref rust) = languages[0];
        assert_eq!(rust_name, "Rust");
        assert_eq!(rust.size, 400);
        assert_eq!(rust.color.as_deref(), Some("#dea584"));
        assert_eq!(rust.prop, Some(100.0 * 400.0 / 600.0));

        let (ref shell_name, ref shell) = languages[1];
        assert_eq!(shell_name, "Shell");
        assert_eq!(shell.size, 200);
        // First reported color was absent; the later one fills it in.
        assert_eq!(shell.color.as_deref(), Some("#89e051"));
    }

    #[test]
    fn excluded_languages_do_not_participate_in_shares() {
        let repos = vec![repo(
            "a",
            false,
            vec![("Rust", 300, None), ("HTML", 700, None)]
        )];
        let excluded = HashSet::from(["HTML".to_owned()]);

        let languages = aggregate_languages(&repos, &excluded);
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].0, "Rust");
        assert_eq!(languages[0].1.prop, Some(100.0));
    }

    #[test]
    fn empty_repository_set_yields_no_languages() {
        assert!(aggregate_languages(&[], &HashSet::new()).is_empty());
    }
}
