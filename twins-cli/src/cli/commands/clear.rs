//! Clear command handler

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::model::DependencyGraph;

/// Removes every model from the twin instance, dependents first.
pub async fn handle_clear_command(connection: &ConnectionArgs) -> Result<()> {
    let client = connection.client()?;

    let models = client
        .list_models()
        .await
        .context("an error occurred retrieving models from the twin")?;

    if models.is_empty() {
        println!("No models to remove");
        return Ok(());
    }

    let graph = DependencyGraph::build(&models);
    let order = graph.delete_order()?;

    println!("Removing {} model(s) from the twin instance", order.len());

    client
        .delete_models(&order)
        .await
        .context("unable to clear models from the twin")?;

    println!(
        "{}",
        "Successfully cleared all models from the twin instance".green()
    );

    Ok(())
}
