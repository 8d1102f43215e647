// SPDX-License-Identifier: MIT OR Apache-2.0

//! Languages badge renderer.
//!
//! Sorts the aggregated language mapping by byte size, emits an ordered JSON
//! payload, and synthesizes the two SVG fragments: a horizontal bar whose
//! segment widths encode each language's share, and a list whose items fade
//! in with a staggered per-position delay.
//!
//! Presentation defaults are resolved here, at render time: a missing color
//! falls back to [`DEFAULT_LANGUAGE_COLOR`] and a missing share renders as
//! zero. The bar widths are the raw shares; no normalization or clamping is
//! applied.

use std::{collections::HashMap, fmt::Write as _};

use serde_json::{Map, Value, json};

use crate::{
    artifact::RenderedArtifact,
    error::Error,
    stats::{LanguageStats, StatisticsSource},
    template::render_template
};

/// Color used for languages the platform reports without one.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#000000";

/// Delay step between consecutive list items, in milliseconds.
pub const ANIMATION_DELAY_STEP_MS: u64 = 150;

/// Renders the languages artifact from the shared statistics source.
///
/// # Errors
///
/// Returns [`Error::Provider`] when the language mapping cannot be resolved;
/// no partial artifact is produced.
pub async fn render_languages<S>(stats: &S, template: &str) -> Result<RenderedArtifact, Error>
where
    S: StatisticsSource
{
    let mut entries = stats.languages().await?;
    // Stable sort: equal sizes keep the provider's emission order.
    entries.sort_by(|left, right| right.1.size.cmp(&left.1.size));

    let substitutions = HashMap::from([
        ("progress", progress_fragment(&entries)),
        ("lang_list", language_list_fragment(&entries))
    ]);

    Ok(RenderedArtifact {
        json: json_payload(&entries),
        svg:  render_template(template, &substitutions)
    })
}

fn json_payload(entries: &[(String, LanguageStats)]) -> Value {
    let mut payload = Map::with_capacity(entries.len());
    for (language, entry) in entries {
        payload.insert(
            language.clone(),
            json!({
                "size": entry.size,
                "color": entry.color,
                "percentage": entry.prop.unwrap_or(0.0)
            })
        );
    }
    Value::Object(payload)
}

/// Builds the proportional bar: one segment per language, concatenated in
/// sorted order.
pub fn progress_fragment(entries: &[(String, LanguageStats)]) -> String {
    let mut fragment = String::new();
    for (_, entry) in entries {
        let color = entry.color.as_deref().unwrap_or(DEFAULT_LANGUAGE_COLOR);
        let _ = write!(
            fragment,
            "<span style=\"background-color: {color};width: {:.3}%;\" class=\"progress-item\"></span>",
            entry.prop.unwrap_or(0.0)
        );
    }
    fragment
}

/// Builds the ordered language list with staggered entrance delays.
pub fn language_list_fragment(entries: &[(String, LanguageStats)]) -> String {
    let mut fragment = String::new();
    for (index, (language, entry)) in entries.iter().enumerate() {
        let color = entry.color.as_deref().unwrap_or(DEFAULT_LANGUAGE_COLOR);
        let delay = index as u64 * ANIMATION_DELAY_STEP_MS;
        let _ = write!(
            fragment,
            "\n<li style=\"animation-delay: {delay}ms;\">\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" class=\"octicon\" style=\"fill:{color};\"\n\
             viewBox=\"0 0 16 16\" version=\"1.1\" width=\"16\" height=\"16\"><path\n\
             fill-rule=\"evenodd\" d=\"M8 4a4 4 0 100 8 4 4 0 000-8z\"></path></svg>\n\
             <span class=\"lang\">{language}</span>\n\
             <span class=\"percent\">{:.2}%</span>\n</li>\n",
            entry.prop.unwrap_or(0.0)
        );
    }
    fragment
}
