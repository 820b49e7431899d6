//! Client for the twin service model data plane
//!
//! All traffic is strictly sequential: pages are fetched one after another,
//! upload batches are submitted in order, deletes go out one at a time. A
//! failure aborts the run; batches already accepted by the service stay
//! submitted.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{Map, Value};

use super::auth::AuthManager;
use super::constants::API_VERSION;
use super::models::{PagedModelsResponse, ServiceErrorResponse};
use crate::model::{ModelDocument, plan_batches};

/// Client for one twin instance's model catalog
pub struct TwinsClient {
    endpoint: String,
    auth: AuthManager,
    http_client: reqwest::Client,
}

impl TwinsClient {
    pub fn new(endpoint: impl Into<String>, auth: AuthManager) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Self {
            endpoint,
            auth,
            http_client: reqwest::Client::new(),
        }
    }

    /// URL of the model collection, or of a single model when an id is given
    fn model_url(&self, model_id: Option<&str>, parameters: &[(&str, &str)]) -> String {
        let mut url = match model_id {
            Some(id) => format!("{}/model/{}", self.endpoint, id),
            None => format!("{}/model", self.endpoint),
        };
        url.push_str(&format!("?api-version={}", API_VERSION));
        for (name, value) in parameters {
            url.push_str(&format!("&{}={}", name, value));
        }
        url
    }

    /// Retrieves every model in the twin instance, following continuation
    /// links until the listing is exhausted.
    ///
    /// Listed definitions that cannot be turned into a model document are
    /// logged and dropped rather than failing the whole listing.
    pub async fn list_models(&self) -> Result<Vec<ModelDocument>> {
        let token = self.auth.bearer_token().await?;
        let mut models = Vec::new();
        let mut endpoint = self.model_url(None, &[("includeModelDefinition", "true")]);

        loop {
            log::info!("Retrieving models from: {}", endpoint);

            let response = self
                .http_client
                .get(&endpoint)
                .bearer_auth(&token)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .with_context(|| format!("unable to retrieve data from {}", endpoint))?;

            if response.status() != StatusCode::OK {
                return Err(self.response_error(response).await);
            }

            let page: PagedModelsResponse = response
                .json()
                .await
                .context("unable to parse the model listing response")?;

            for value in page.value {
                match ModelDocument::from_value(value) {
                    Ok(model) => models.push(model),
                    Err(error) => log::warn!("ignoring listed model: {}", error),
                }
            }

            match page.next_link {
                Some(next) if !next.is_empty() => endpoint = next,
                _ => break,
            }
        }

        Ok(models)
    }

    /// Uploads models in the given order, split into size-bounded batches.
    ///
    /// Batches are submitted strictly in sequence because later batches may
    /// reference models created by earlier ones. The order must already be
    /// dependency-sorted.
    pub async fn upload_models(&self, models: &[&ModelDocument]) -> Result<()> {
        let batches = plan_batches(models);
        let token = self.auth.bearer_token().await?;
        let endpoint = self.model_url(None, &[]);

        for (index, batch) in batches.iter().enumerate() {
            let body: Vec<&Map<String, Value>> =
                batch.iter().map(|model| model.content()).collect();

            log::info!("Uploading batch {}/{}", index + 1, batches.len());

            let response = self
                .http_client
                .post(&endpoint)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await
                .with_context(|| {
                    format!("unable to submit batch {}/{}", index + 1, batches.len())
                })?;

            if response.status() != StatusCode::CREATED {
                return Err(self.response_error(response).await).with_context(|| {
                    format!("uploading batch {}/{} failed", index + 1, batches.len())
                });
            }
        }

        Ok(())
    }

    /// Deletes the given models one at a time, in the order provided.
    ///
    /// The caller passes models dependents-first so the service's
    /// referential integrity checks never reject a delete.
    pub async fn delete_models(&self, models: &[&ModelDocument]) -> Result<()> {
        let token = self.auth.bearer_token().await?;

        for (index, model) in models.iter().enumerate() {
            let endpoint = self.model_url(Some(&model.id), &[]);

            log::info!("Deleting model {}/{}: {}", index + 1, models.len(), model.id);

            let response = self
                .http_client
                .delete(&endpoint)
                .bearer_auth(&token)
                .send()
                .await
                .with_context(|| format!("unable to delete model {}", model.id))?;

            if response.status() != StatusCode::NO_CONTENT {
                return Err(self.response_error(response).await)
                    .with_context(|| format!("deleting model {} failed", model.id));
            }
        }

        Ok(())
    }

    /// Builds a descriptive error from a non-success response
    async fn response_error(&self, response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        match response.json::<ServiceErrorResponse>().await {
            Ok(ServiceErrorResponse { error: Some(detail) }) => {
                anyhow::anyhow!("non-success status code returned: {}\n{}", status, detail)
            }
            _ => anyhow::anyhow!("non-success status code returned: {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::AuthMethod;

    fn client(endpoint: &str) -> TwinsClient {
        TwinsClient::new(endpoint, AuthManager::new(AuthMethod::AzureCli))
    }

    #[test]
    fn collection_url_carries_the_api_version() {
        let client = client("https://my-twin.api.weu.digitaltwins.azure.net");

        assert_eq!(
            client.model_url(None, &[]),
            "https://my-twin.api.weu.digitaltwins.azure.net/model?api-version=2020-10-31"
        );
    }

    #[test]
    fn extra_parameters_are_appended() {
        let client = client("https://my-twin.api.weu.digitaltwins.azure.net");

        assert_eq!(
            client.model_url(None, &[("includeModelDefinition", "true")]),
            "https://my-twin.api.weu.digitaltwins.azure.net/model?api-version=2020-10-31&includeModelDefinition=true"
        );
    }

    #[test]
    fn single_model_url_embeds_the_id() {
        let client = client("https://my-twin.api.weu.digitaltwins.azure.net");

        assert_eq!(
            client.model_url(Some("dtmi:testing:space;1"), &[]),
            "https://my-twin.api.weu.digitaltwins.azure.net/model/dtmi:testing:space;1?api-version=2020-10-31"
        );
    }

    #[test]
    fn trailing_slash_on_the_endpoint_is_trimmed() {
        let client = client("https://my-twin.api.weu.digitaltwins.azure.net/");

        assert_eq!(
            client.model_url(None, &[]),
            "https://my-twin.api.weu.digitaltwins.azure.net/model?api-version=2020-10-31"
        );
    }
}
