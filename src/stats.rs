// SPDX-License-Identifier: MIT OR Apache-2.0

//! The statistics port consumed by the badge renderers.
//!
//! Renderers only ever read through [`StatisticsSource`]; the concrete
//! provider decides how the aggregates are produced and is expected to
//! memoize them, since both renderers issue overlapping accessor calls
//! concurrently against a single shared instance. All accessors are
//! idempotent and safe to call repeatedly within a run.

use crate::error::Error;

/// Aggregated byte size and presentation hints for a single language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageStats {
    /// Total bytes written in this language across all counted repositories.
    pub size:  u64,
    /// Display color reported by the platform, when one exists.
    pub color: Option<String>,
    /// Share of the total byte count, in percent, when known.
    pub prop:  Option<f64>
}

/// Asynchronous read accessors over a user's aggregated statistics.
///
/// `languages` yields entries in the provider's emission order; entries of
/// equal size keep that relative order after the renderers sort by size.
#[allow(async_fn_in_trait)]
pub trait StatisticsSource {
    /// Display name of the account, falling back to the login upstream.
    async fn name(&self) -> Result<String, Error>;

    /// Total stargazer count across counted repositories.
    async fn stargazers(&self) -> Result<u64, Error>;

    /// Total fork count across counted repositories.
    async fn forks(&self) -> Result<u64, Error>;

    /// All-time contribution count.
    async fn total_contributions(&self) -> Result<u64, Error>;

    /// Lines added and deleted by the user, in that order.
    async fn lines_changed(&self) -> Result<(u64, u64), Error>;

    /// Recent view count across counted repositories.
    async fn views(&self) -> Result<u64, Error>;

    /// Full names of the counted repositories. Callers use only the count.
    async fn repos(&self) -> Result<Vec<String>, Error>;

    /// Language name to aggregated statistics, in emission order.
    async fn languages(&self) -> Result<Vec<(String, LanguageStats)>, Error>;
}
