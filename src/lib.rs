// SPDX-License-Identifier: MIT OR Apache-2.0

//! Badge generation from aggregated GitHub statistics.
//!
//! The library fetches a user's aggregate statistics once per run and renders
//! them into a small set of artifacts: an overview badge and a languages
//! badge, each as an SVG image with a companion JSON summary. Rendering is a
//! placeholder substitution over static SVG templates; the two badges are
//! generated concurrently from one shared, memoizing statistics source.

mod artifact;
mod config;
mod error;
mod generate;
mod github;
mod languages;
mod overview;
mod stats;
mod template;

pub use artifact::{ArtifactKind, RenderedArtifact, WrittenArtifact, write_artifact};
pub use config::{Configuration, parse_exclusions, parse_truthy};
pub use error::{Error, artifact_io_error, template_io_error};
pub use generate::generate_all;
pub use github::GitHubStats;
pub use languages::{
    ANIMATION_DELAY_STEP_MS, DEFAULT_LANGUAGE_COLOR, language_list_fragment, progress_fragment,
    render_languages
};
pub use overview::{format_grouped, render_overview};
pub use stats::{LanguageStats, StatisticsSource};
pub use template::render_template;
