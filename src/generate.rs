// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent fan-out over the badge renderers.
//!
//! Both artifacts are produced from one shared statistics source. The two
//! units of work run concurrently on the same task via [`tokio::try_join!`];
//! they share no mutable state and write to distinct files. The first
//! failure fails the run and drops the sibling future, but a sibling that
//! already finished keeps its fully written artifact on disk — a failing
//! renderer never writes anything.

use std::{fs, path::Path};

use tracing::info;

use crate::{
    artifact::{ArtifactKind, WrittenArtifact, write_artifact},
    error::{self, Error},
    languages::render_languages,
    overview::render_overview,
    stats::StatisticsSource
};

/// Generates and persists every badge artifact for one run.
///
/// # Errors
///
/// Propagates the first [`Error`] raised by template loading, statistic
/// resolution, or artifact writing.
pub async fn generate_all<S>(
    stats: &S,
    templates_dir: &Path,
    output_dir: &Path
) -> Result<(WrittenArtifact, WrittenArtifact), Error>
where
    S: StatisticsSource
{
    let overview = async {
        let template = load_template(templates_dir, ArtifactKind::Overview)?;
        let artifact = render_overview(stats, &template).await?;
        let written = write_artifact(output_dir, ArtifactKind::Overview, &artifact)?;
        info!(svg = %written.svg_path.display(), "generated overview badge");
        Ok::<_, Error>(written)
    };

    let languages = async {
        let template = load_template(templates_dir, ArtifactKind::Languages)?;
        let artifact = render_languages(stats, &template).await?;
        let written = write_artifact(output_dir, ArtifactKind::Languages, &artifact)?;
        info!(svg = %written.svg_path.display(), "generated languages badge");
        Ok::<_, Error>(written)
    };

    tokio::try_join!(overview, languages)
}

fn load_template(templates_dir: &Path, kind: ArtifactKind) -> Result<String, Error> {
    let path = templates_dir.join(format!("{}.svg", kind.file_stem()));
    fs::read_to_string(&path).map_err(|source| error::template_io_error(&path, source))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use serde_json::Value;
    use tempfile::tempdir;

    use super::generate_all;
    use crate::{error::Error, stats::fixtures::FixtureStats};

    fn seed_templates(dir: &Path) {
        fs::create_dir_all(dir).expect("failed to create templates dir");
        fs::write(
            dir.join("overview.svg"),
            "<svg>{{ name }} {{ stars }} {{ forks }} {{ contributions }} \
             {{ lines_changed }} {{ views }} {{ repos }}</svg>"
        )
        .expect("failed to seed overview template");
        fs::write(
            dir.join("languages.svg"),
            "<svg>{{ progress }}|{{ lang_list }}</svg>"
        )
        .expect("failed to seed languages template");
    }

    #[tokio::test]
    async fn successful_run_writes_exactly_four_files() {
        let temp = tempdir().expect("failed to create tempdir");
        let templates = temp.path().join("templates");
        let output = temp.path().join("generated");
        seed_templates(&templates);

        let stats = FixtureStats::default();
        generate_all(&stats, &templates, &output).await.expect("generation failed");

        let mut names: Vec<String> = fs::read_dir(&output)
            .expect("output dir should exist")
            .map(|entry| entry.expect("readable entry").file_name().into_string().expect("utf8"))
            .collect();
        names.sort();
        assert_eq!(
            names,
            ["languages.json", "languages.svg", "overview.json", "overview.svg"]
        );
    }

    #[tokio::test]
    async fn json_parses_back_to_the_values_rendered_into_svg() {
        let temp = tempdir().expect("failed to create tempdir");
        let templates = temp.path().join("templates");
        let output = temp.path().join("generated");
        seed_templates(&templates);

        let stats = FixtureStats::default();
        generate_all(&stats, &templates, &output).await.expect("generation failed");

        let overview: Value = serde_json::from_str(
            &fs::read_to_string(output.join("overview.json")).expect("readable json")
        )
        .expect("valid json");
        assert_eq!(overview["stars"], 1234);
        assert_eq!(overview["lines_changed"], 1500);
        assert_eq!(overview["repos"], 2);

        let svg = fs::read_to_string(output.join("overview.svg")).expect("readable svg");
        assert!(svg.contains("1,234"));
        assert!(svg.contains("1,500"));

        let languages: Value = serde_json::from_str(
            &fs::read_to_string(output.join("languages.json")).expect("readable json")
        )
        .expect("valid json");
        assert_eq!(languages["Rust"]["size"], 300);
        assert_eq!(languages["Shell"]["percentage"], 25.0);
    }

    #[tokio::test]
    async fn failing_renderer_leaves_no_artifact_of_its_own() {
        let temp = tempdir().expect("failed to create tempdir");
        let templates = temp.path().join("templates");
        let output = temp.path().join("generated");
        seed_templates(&templates);

        let stats = FixtureStats {
            fail_views: true,
            ..FixtureStats::default()
        };
        let error = generate_all(&stats, &templates, &output)
            .await
            .expect_err("expected provider error");
        assert!(matches!(error, Error::Provider { .. }));

        assert!(!output.join("overview.json").exists());
        assert!(!output.join("overview.svg").exists());
    }

    #[tokio::test]
    async fn missing_template_is_a_template_error() {
        let temp = tempdir().expect("failed to create tempdir");
        let templates = temp.path().join("missing-templates");
        let output = temp.path().join("generated");

        let stats = FixtureStats::default();
        let error = generate_all(&stats, &templates, &output)
            .await
            .expect_err("expected template error");
        assert!(matches!(error, Error::Template { .. }));
    }
}
