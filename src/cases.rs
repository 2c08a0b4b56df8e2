//! Traversal case files
//!
//! A case file is TOML with an optional `[render]` table and any number of
//! `[[case]]` entries, each holding one in-order/post-order pair.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::output::{RenderOptions, MAX_GAP};

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Path not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read case file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse case file {path:?}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No traversal cases found in {0:?}")]
    NoCases(PathBuf),

    #[error("Invalid render gap {gap} in {path:?}: must be within 0..={max}")]
    InvalidGap { path: PathBuf, gap: i32, max: i32 },
}

/// One in-order/post-order pair to reconstruct
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TraversalCase {
    pub name: String,
    pub inorder: Vec<i32>,
    pub postorder: Vec<i32>,
}

/// Contents of a single case file
#[derive(Debug, Deserialize, Default)]
pub struct CaseFile {
    #[serde(skip)]
    pub path: PathBuf,
    pub render: Option<RenderOptions>,
    #[serde(default, rename = "case")]
    pub cases: Vec<TraversalCase>,
}

impl CaseFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, CaseError> {
        let mut file: CaseFile =
            toml::from_str(content).map_err(|source| CaseError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(render) = &file.render {
            if !(0..=MAX_GAP).contains(&render.gap) {
                return Err(CaseError::InvalidGap {
                    path: path.to_path_buf(),
                    gap: render.gap,
                    max: MAX_GAP,
                });
            }
        }

        file.path = path.to_path_buf();
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, CaseError> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Render settings from this file layered under any command-line overrides
    pub fn render_options(&self, gap: Option<i32>, max_height: Option<usize>) -> RenderOptions {
        let base = self.render.unwrap_or_default();
        RenderOptions {
            gap: gap.unwrap_or(base.gap),
            max_height: max_height.unwrap_or(base.max_height),
        }
    }
}

/// Load a case file, or every `*.toml` file below a directory (sorted by path)
pub fn discover(path: &Path) -> Result<Vec<CaseFile>, CaseError> {
    if !path.exists() {
        return Err(CaseError::NotFound(path.to_path_buf()));
    }

    if path.is_file() {
        let file = CaseFile::load(path)?;
        if file.cases.is_empty() {
            return Err(CaseError::NoCases(path.to_path_buf()));
        }
        return Ok(vec![file]);
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "toml"))
        .map(|entry| entry.path().to_path_buf())
        .collect();
    paths.sort();

    debug!(count = paths.len(), dir = ?path, "found case files");

    let files = paths
        .iter()
        .map(|p| CaseFile::load(p))
        .collect::<Result<Vec<_>, _>>()?;

    if files.iter().all(|f| f.cases.is_empty()) {
        return Err(CaseError::NoCases(path.to_path_buf()));
    }

    Ok(files)
}
