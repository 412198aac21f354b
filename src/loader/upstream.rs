use http::{header::ACCEPT, Request};
use kube::Client;
use tracing::{debug, instrument};

use super::parse_document;
use crate::{cluster::ConnectionError, error::LoadError, openapi::SchemaDocument};

/// Path of the cluster's OpenAPI v2 document.
pub const OPENAPI_V2_PATH: &str = "/openapi/v2";

/// Fetches the OpenAPI document the cluster reports.
#[instrument(skip(client))]
pub async fn load(client: &Client) -> Result<SchemaDocument, LoadError> {
    let request = Request::get(OPENAPI_V2_PATH)
        .header(ACCEPT, "application/json")
        .body(Vec::new())
        .map_err(ConnectionError::Request)?;
    let text = client
        .request_text(request)
        .await
        .map_err(ConnectionError::Kube)?;
    debug!(bytes = text.len(), "received cluster schema");
    parse_document(&text, "cluster")
}
