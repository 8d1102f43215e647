// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal placeholder substitution over trusted template assets.
//!
//! Templates embed `{{ name }}` style tokens. Rendering is a single textual
//! pass: every token whose name appears in the substitution map is replaced,
//! everything else is left verbatim. Replacement values are never rescanned,
//! so a value containing a placeholder-looking token survives untouched.
//! Templates are shipped static assets, so no error is raised for missing
//! placeholders or unused substitution keys, and no escaping is applied.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Substitutes placeholder tokens in `template` with values from
/// `substitutions`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use gh_stats_badges::render_template;
///
/// let mut substitutions = HashMap::new();
/// substitutions.insert("stars", "1,234".to_owned());
///
/// let rendered = render_template("<tspan>{{ stars }}</tspan>", &substitutions);
/// assert_eq!(rendered, "<tspan>1,234</tspan>");
/// ```
pub fn render_template(template: &str, substitutions: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            match substitutions.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_owned()
            }
        })
        .into_owned()
}
