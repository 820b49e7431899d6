//! Download command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::storage::model_file_path;

/// Writes every deployed model definition into the output directory.
///
/// The output directory is cleared first; the path of each file is derived
/// from the model id, so `dtmi:rec33:architectural:building;1` ends up at
/// `dtmi/rec33/architectural/building_1.<ext>`.
pub async fn handle_download_command(
    connection: &ConnectionArgs,
    output: &Path,
    extension: &str,
) -> Result<()> {
    let extension = normalize_extension(extension)?;
    let client = connection.client()?;

    let models = client
        .list_models()
        .await
        .context("an error occurred listing models in the twin")?;

    if models.is_empty() {
        println!("No models to download");
        return Ok(());
    }

    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("unable to clear output directory {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("unable to create output directory {}", output.display()))?;

    for model in &models {
        let target = output.join(model_file_path(&model.id, &extension));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("unable to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(model.content())
            .with_context(|| format!("unable to serialize model {}", model.id))?;

        log::info!("Writing model {} to {}", model.id, target.display());
        fs::write(&target, content).with_context(|| {
            format!(
                "unable to write model {} to {}",
                model.id,
                target.display()
            )
        })?;
    }

    println!(
        "{}",
        format!(
            "Downloaded {} model(s) to {}",
            models.len(),
            output.display()
        )
        .green()
    );

    Ok(())
}

/// Validates and normalizes the download file extension.
fn normalize_extension(extension: &str) -> Result<String> {
    let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
    if normalized != "json" && normalized != "dtdl" {
        anyhow::bail!(
            "file extension '{}' is not valid, only 'json' or 'dtdl' may be used",
            extension
        );
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_two_known_extensions() {
        assert_eq!(normalize_extension("json").unwrap(), "json");
        assert_eq!(normalize_extension("dtdl").unwrap(), "dtdl");
    }

    #[test]
    fn tolerates_case_and_a_leading_dot() {
        assert_eq!(normalize_extension(".DTDL").unwrap(), "dtdl");
        assert_eq!(normalize_extension("Json").unwrap(), "json");
    }

    #[test]
    fn rejects_anything_else() {
        assert!(normalize_extension("yaml").is_err());
        assert!(normalize_extension("").is_err());
    }
}
