//! Command-line surface of the twins CLI

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::api::{AuthManager, AuthMethod, TwinsClient};

pub mod commands;

#[derive(Parser)]
#[command(name = "twins-cli")]
#[command(author, version)]
#[command(about = "Work with the model catalog of a digital twin instance")]
#[command(
    long_about = "Provides commands for common model catalog activities against the \
management plane of a digital twin instance, in particular dependency-ordered \
upload and removal of models."
)]
pub struct Cli {
    /// Enable diagnostic logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the model ids currently deployed to the twin instance
    List {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Upload a set of models from local storage to the twin instance
    Upload {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Directory containing the model files to upload
        #[arg(long)]
        source: PathBuf,
    },

    /// Download all models, structured in the output location by model id
    Download {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Directory to write models to (cleared before writing)
        #[arg(long)]
        output: PathBuf,

        /// File extension for downloaded files ('dtdl' or 'json')
        #[arg(long, default_value = "dtdl")]
        ext: String,
    },

    /// Remove all models from the twin instance
    Clear {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Connection and credential flags shared by every command
#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    /// Endpoint of the twin instance (e.g. https://my-twin.api.weu.digitaltwins.azure.net)
    #[arg(long)]
    pub endpoint: String,

    /// Use the credentials of the locally logged-in Azure CLI
    #[arg(long)]
    pub use_cli: bool,

    /// Tenant to authenticate client credentials against [env: TWINS_TENANT_ID]
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// App registration id used for client-credential authentication [env: TWINS_CLIENT_ID]
    #[arg(long)]
    pub client_id: Option<String>,

    /// App registration secret used for client-credential authentication [env: TWINS_CLIENT_SECRET]
    #[arg(long)]
    pub client_secret: Option<String>,
}

impl ConnectionArgs {
    /// Validates the connection flags and resolves the authentication method.
    ///
    /// Runs before any network traffic so argument mistakes fail fast.
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if self.endpoint.is_empty() {
            anyhow::bail!("the twin endpoint must be set");
        }
        if !self.endpoint.starts_with("https://") {
            anyhow::bail!("the endpoint should start with https://");
        }

        if self.use_cli {
            return Ok(AuthMethod::AzureCli);
        }

        let tenant_id = self.resolve(&self.tenant_id, "TWINS_TENANT_ID");
        let client_id = self.resolve(&self.client_id, "TWINS_CLIENT_ID");
        let client_secret = self.resolve(&self.client_secret, "TWINS_CLIENT_SECRET");

        match (tenant_id, client_id, client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                Ok(AuthMethod::ClientCredentials {
                    tenant_id,
                    client_id,
                    client_secret,
                })
            }
            _ => anyhow::bail!(
                "when not using Azure CLI credentials the tenant, client id, and client secret must be specified"
            ),
        }
    }

    /// Builds the client for the configured twin instance.
    pub fn client(&self) -> Result<TwinsClient> {
        let method = self.auth_method()?;
        Ok(TwinsClient::new(&self.endpoint, AuthManager::new(method)))
    }

    fn resolve(&self, flag: &Option<String>, variable: &str) -> Option<String> {
        flag.clone()
            .or_else(|| env::var(variable).ok())
            .filter(|value| !value.is_empty())
    }
}

/// Dispatches the parsed command line to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { connection } => commands::list::handle_list_command(&connection).await,
        Commands::Upload { connection, source } => {
            commands::upload::handle_upload_command(&connection, &source).await
        }
        Commands::Download {
            connection,
            output,
            ext,
        } => commands::download::handle_download_command(&connection, &output, &ext).await,
        Commands::Clear { connection } => commands::clear::handle_clear_command(&connection).await,
    }
}
