//! Upload command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::model::DependencyGraph;
use crate::storage::ModelDirectory;

/// Loads models from a directory and uploads them, dependencies first.
///
/// A cycle anywhere in the working set aborts the command before anything
/// is submitted; a partial order would trip the service's referential
/// integrity checks halfway through.
pub async fn handle_upload_command(connection: &ConnectionArgs, source: &Path) -> Result<()> {
    let client = connection.client()?;

    let directory = ModelDirectory::new(source)?;
    let models = directory
        .load_models()
        .with_context(|| format!("unable to retrieve models from {}", source.display()))?;

    if models.is_empty() {
        anyhow::bail!("no models found to upload in {}", source.display());
    }

    let graph = DependencyGraph::build(&models);
    let sorted = graph.sort()?;

    println!("Uploading {} model(s) to the twin instance", sorted.len());

    client
        .upload_models(&sorted)
        .await
        .context("unable to upload models")?;

    println!(
        "{}",
        format!("Successfully uploaded models from {}", source.display()).green()
    );

    Ok(())
}
