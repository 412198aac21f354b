use std::{io::ErrorKind, path::PathBuf};

use reqwest::Url;
use tokio::fs;
use tracing::{debug, instrument};

use super::parse_document;
use crate::{error::LoadError, openapi::SchemaDocument};

/// Loads a user supplied schema: read from disk when `source` exists there, fetched as a URL otherwise.
#[instrument]
pub async fn load(source: &str) -> Result<SchemaDocument, LoadError> {
    let text = match fs::metadata(source).await {
        Ok(_) => read_file(source).await?,
        Err(e) if e.kind() == ErrorKind::NotFound => fetch(source).await?,
        Err(source_error) => {
            return Err(LoadError::Io {
                path: PathBuf::from(source),
                source: source_error,
            })
        }
    };
    parse_document(&text, source)
}

async fn read_file(path: &str) -> Result<String, LoadError> {
    debug!(path, "reading schema file");
    fs::read_to_string(path).await.map_err(|source| LoadError::Io {
        path: PathBuf::from(path),
        source,
    })
}

async fn fetch(location: &str) -> Result<String, LoadError> {
    let url = Url::parse(location)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| LoadError::NotFound(location.to_string()))?;
    debug!(%url, "fetching schema");
    let network = |source: reqwest::Error| LoadError::Network {
        url: location.to_string(),
        source,
    };
    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(network)?;
    response.text().await.map_err(network)
}
