//! Bearer token acquisition for the twin service
//!
//! Two credential sources are supported: the client-credentials flow
//! against the Microsoft identity platform, and the access token of a
//! locally logged-in Azure CLI.

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::process::Command;

use super::constants::{AUTHORITY_URL, RESOURCE_ID};

/// How the CLI authenticates against the twin instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Reuse the credentials of the locally logged-in Azure CLI
    AzureCli,
    /// Client-credentials flow for an app registration
    ClientCredentials {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

/// Successful token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Output of `az account get-access-token`
#[derive(Debug, Deserialize)]
struct CliTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Acquires bearer tokens for the configured credential source
pub struct AuthManager {
    method: AuthMethod,
    http_client: reqwest::Client,
}

impl AuthManager {
    pub fn new(method: AuthMethod) -> Self {
        Self {
            method,
            http_client: reqwest::Client::new(),
        }
    }

    /// Acquires a bearer token scoped to the twin service resource.
    pub async fn bearer_token(&self) -> Result<String> {
        log::info!("Acquiring bearer token");
        match &self.method {
            AuthMethod::AzureCli => self.token_from_azure_cli().await,
            AuthMethod::ClientCredentials {
                tenant_id,
                client_id,
                client_secret,
            } => {
                self.token_from_client_credentials(tenant_id, client_id, client_secret)
                    .await
            }
        }
    }

    async fn token_from_client_credentials(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let token_url = format!("{}/{}/oauth2/v2.0/token", AUTHORITY_URL, tenant_id);
        let scope = format!("{}/.default", RESOURCE_ID);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .context("unable to reach the token endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("token request failed with status {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("unable to parse the token response")?;
        Ok(token.access_token)
    }

    async fn token_from_azure_cli(&self) -> Result<String> {
        let output = Command::new("az")
            .args([
                "account",
                "get-access-token",
                "--resource",
                RESOURCE_ID,
                "--output",
                "json",
            ])
            .output()
            .await
            .context("unable to run the Azure CLI; is 'az' installed and logged in?")?;

        if !output.status.success() {
            anyhow::bail!(
                "the Azure CLI could not provide a token: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let token: CliTokenResponse = serde_json::from_slice(&output.stdout)
            .context("unable to parse the Azure CLI token output")?;
        Ok(token.access_token)
    }
}
