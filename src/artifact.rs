// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendered artifact container and filesystem persistence.
//!
//! Each badge kind produces a JSON payload and an SVG text body. Artifacts
//! are constructed fresh every run and unconditionally overwrite whatever a
//! previous run left behind; there is no merging and no backup.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use crate::error::{self, Error};

/// Badge kinds produced by a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Scalar summary statistics.
    Overview,
    /// Per-language byte sizes and shares.
    Languages
}

impl ArtifactKind {
    /// File stem shared by the JSON and SVG outputs of this kind.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Languages => "languages"
        }
    }
}

/// A fully rendered (JSON payload, SVG text) pair for one badge kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// Structured payload mirroring the values substituted into the SVG.
    pub json: serde_json::Value,
    /// Placeholder-substituted SVG markup.
    pub svg:  String
}

/// Paths produced by persisting one rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// Location of the JSON summary.
    pub json_path: PathBuf,
    /// Location of the SVG badge.
    pub svg_path:  PathBuf
}

/// Persists a rendered artifact under `output_dir`.
///
/// The directory hierarchy is created when missing. The JSON payload is
/// written pretty-printed with a trailing newline; the SVG body is written
/// verbatim. Existing files of the same name are overwritten.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the directory or files cannot be
/// created and [`Error::Serialize`] if the payload cannot be encoded.
pub fn write_artifact(
    output_dir: &Path,
    kind: ArtifactKind,
    artifact: &RenderedArtifact
) -> Result<WrittenArtifact, Error> {
    fs::create_dir_all(output_dir)
        .map_err(|source| error::artifact_io_error(output_dir, source))?;

    let json_path = output_dir.join(format!("{}.json", kind.file_stem()));
    let svg_path = output_dir.join(format!("{}.svg", kind.file_stem()));

    write_json(&json_path, &artifact.json)?;
    write_svg(&svg_path, &artifact.svg)?;

    Ok(WrittenArtifact {
        json_path,
        svg_path
    })
}

fn write_json(path: &Path, payload: &serde_json::Value) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| error::artifact_io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, payload)?;
    writer
        .write_all(b"\n")
        .map_err(|source| error::artifact_io_error(path, source))?;
    writer
        .flush()
        .map_err(|source| error::artifact_io_error(path, source))
}

fn write_svg(path: &Path, contents: &str) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| error::artifact_io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .map_err(|source| error::artifact_io_error(path, source))?;
    writer
        .flush()
        .map_err(|source| error::artifact_io_error(path, source))
}
