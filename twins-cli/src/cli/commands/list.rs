//! List command handler

use anyhow::{Context, Result};

use crate::cli::ConnectionArgs;

/// Prints the id of every model deployed to the twin instance.
pub async fn handle_list_command(connection: &ConnectionArgs) -> Result<()> {
    let client = connection.client()?;

    let models = client
        .list_models()
        .await
        .context("an error occurred listing models in the twin")?;

    for model in &models {
        println!("{}", model.id);
    }

    Ok(())
}
