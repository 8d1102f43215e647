// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run configuration resolved once at startup.
//!
//! The configuration is an immutable snapshot of the environment-style inputs
//! that drive a single generation run. It is constructed before any network
//! or filesystem activity and passed by reference into the statistics
//! provider; renderers never perform ambient lookups of their own.

use std::collections::HashSet;

use crate::error::Error;

/// Immutable configuration owned by the orchestrator for one run.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Personal access token used to authenticate against the API.
    pub token:               String,
    /// Login of the account whose statistics are aggregated.
    pub user:                String,
    /// Repository names excluded from every aggregate.
    pub excluded_repos:      HashSet<String>,
    /// Language names excluded from the language mapping.
    pub excluded_langs:      HashSet<String>,
    /// Whether forked repositories are skipped entirely.
    pub ignore_forked_repos: bool
}

impl Configuration {
    /// Builds a validated configuration from raw environment-style inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] with a distinct message when the
    /// access token or the user login is absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use gh_stats_badges::Configuration;
    ///
    /// let config = Configuration::from_inputs(
    ///     Some("ghp_example".to_owned()),
    ///     Some("octocat".to_owned()),
    ///     Some("octocat/spoon-knife, sandbox"),
    ///     None,
    ///     None,
    /// )
    /// .expect("valid configuration");
    /// assert!(config.excluded_repos.contains("sandbox"));
    /// assert!(config.ignore_forked_repos);
    /// ```
    pub fn from_inputs(
        token: Option<String>,
        user: Option<String>,
        excluded_repos: Option<&str>,
        excluded_langs: Option<&str>,
        ignore_forked_repos: Option<&str>
    ) -> Result<Self, Error> {
        let token = token
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::configuration("a personal access token is required to proceed"))?;
        let user = user
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::configuration("the GITHUB_ACTOR user login must be set"))?;

        Ok(Self {
            token,
            user,
            excluded_repos: parse_exclusions(excluded_repos),
            excluded_langs: parse_exclusions(excluded_langs),
            ignore_forked_repos: parse_truthy(ignore_forked_repos)
        })
    }
}

/// Parses a comma-separated exclusion list into a set of trimmed names.
///
/// Empty items produced by stray commas are dropped; an absent or blank input
/// yields an empty set, meaning no exclusion.
pub fn parse_exclusions(raw: Option<&str>) -> HashSet<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Parses a truthy string flag.
///
/// Any value textually equal to `"false"` after trimming and lowering
/// disables the flag; every other value, including absence, enables it.
pub fn parse_truthy(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => !value.trim().eq_ignore_ascii_case("false"),
        None => true
    }
}

#[cfg(test)]
mod tests {
    use super::{Configuration, parse_exclusions, parse_truthy};
    use crate::error::Error;

    #[test]
    fn missing_token_yields_distinct_message() {
        let error = Configuration::from_inputs(None, Some("octocat".to_owned()), None, None, None)
            .expect_err("expected configuration error");

        match error {
            Error::Configuration {
                message
            } => {
                assert!(message.contains("access token"));
            }
            other => panic!("unexpected error variant: {other:?}")
        }
    }

    #[test]
    fn empty_token_is_treated_as_missing() {
        let result = Configuration::from_inputs(
            Some("   ".to_owned()),
            Some("octocat".to_owned()),
            None,
            None,
            None
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_user_yields_distinct_message() {
        let error = Configuration::from_inputs(Some("token".to_owned()), None, None, None, None)
            .expect_err("expected configuration error");

        match error {
            Error::Configuration {
                message
            } => {
                assert!(message.contains("GITHUB_ACTOR"));
            }
            other => panic!("unexpected error variant: {other:?}")
        }
    }

    #[test]
    fn exclusion_lists_are_trimmed_sets() {
        let set = parse_exclusions(Some(" repo-one , repo-two,,repo-three "));
        assert_eq!(set.len(), 3);
        assert!(set.contains("repo-one"));
        assert!(set.contains("repo-two"));
        assert!(set.contains("repo-three"));
    }

    #[test]
    fn absent_exclusions_mean_no_exclusion() {
        assert!(parse_exclusions(None).is_empty());
        assert!(parse_exclusions(Some("")).is_empty());
        assert!(parse_exclusions(Some(" , ")).is_empty());
    }

    #[test]
    fn truthy_parse_only_false_disables() {
        assert!(!parse_truthy(Some("false")));
        assert!(!parse_truthy(Some("  FALSE ")));
        assert!(parse_truthy(Some("true")));
        assert!(parse_truthy(Some("0")));
        assert!(parse_truthy(Some("")));
        assert!(parse_truthy(None));
    }

    #[test]
    fn valid_inputs_produce_immutable_snapshot() {
        let config = Configuration::from_inputs(
            Some("token".to_owned()),
            Some("octocat".to_owned()),
            Some("a,b"),
            Some("HTML"),
            Some("false")
        )
        .expect("expected valid configuration");

        assert_eq!(config.user, "octocat");
        assert_eq!(config.excluded_repos.len(), 2);
        assert!(config.excluded_langs.contains("HTML"));
        assert!(!config.ignore_forked_repos);
    }
}
