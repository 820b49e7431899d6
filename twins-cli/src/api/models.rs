//! Wire types for the twin service REST API

use serde::Deserialize;
use serde_json::Value;

/// One page of results from the model listing API
#[derive(Debug, Deserialize)]
pub struct PagedModelsResponse {
    /// Continuation link; absent on the final page
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,

    /// Model definitions held by this page
    #[serde(default)]
    pub value: Vec<Value>,
}

/// Error body returned by the service on non-success responses
#[derive(Debug, Default, Deserialize)]
pub struct ServiceErrorResponse {
    #[serde(default)]
    pub error: Option<Value>,
}
