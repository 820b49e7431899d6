//! Constants for the twin service data plane and identity endpoints

/// REST API version sent with every data-plane request
pub const API_VERSION: &str = "2020-10-31";

/// Resource identifier bearer tokens are scoped to
pub const RESOURCE_ID: &str = "https://digitaltwins.azure.net";

/// Authority used for client-credential authentication
pub const AUTHORITY_URL: &str = "https://login.microsoftonline.com";
