//! Loading model documents from a local directory tree

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::model::ModelDocument;

/// UTF-8 byte order mark some editors prepend to JSON files
const BYTE_ORDER_MARK: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A validated directory that model files are uploaded from
pub struct ModelDirectory {
    path: PathBuf,
}

impl ModelDirectory {
    /// Validates that the path exists and is a directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)
            .with_context(|| format!("the specified path '{}' does not exist", path.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("the specified path '{}' is not a directory", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every model file found recursively under the directory.
    ///
    /// Only `.json` and `.dtdl` files are inspected. Files that cannot be
    /// read, do not parse as JSON, or do not hold a usable model definition
    /// are logged and skipped; they never fail the scan. Entries are walked
    /// in sorted order so the working set is deterministic.
    pub fn load_models(&self) -> Result<Vec<ModelDocument>> {
        let mut models = Vec::new();

        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("unable to scan directory '{}'", self.path.display()))?;
            if !entry.file_type().is_file() || !is_model_file(entry.path()) {
                continue;
            }

            match load_model_file(entry.path()) {
                Ok(model) => {
                    log::debug!("loaded model '{}' from '{}'", model.id, entry.path().display());
                    models.push(model);
                }
                Err(error) => {
                    log::warn!("ignoring file '{}': {:#}", entry.path().display(), error);
                }
            }
        }

        Ok(models)
    }
}

fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            let extension = extension.to_ascii_lowercase();
            extension == "json" || extension == "dtdl"
        })
        .unwrap_or(false)
}

fn load_model_file(path: &Path) -> Result<ModelDocument> {
    let bytes = fs::read(path).context("unable to read the file")?;
    let value: serde_json::Value =
        serde_json::from_slice(strip_bom(&bytes)).context("the file is not valid JSON")?;
    let model = ModelDocument::from_value(value)?;
    Ok(model)
}

/// Removes a single leading byte order mark, if present
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(BYTE_ORDER_MARK).unwrap_or(bytes)
}
