use std::path::PathBuf;

use thiserror::Error;

use crate::cluster::ConnectionError;

/// Sole failure outcome of a generate run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl Error {
    /// Short name of the pipeline stage that failed, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Resolution(_) => "resolution",
            Error::Load(_) => "load",
            Error::Extraction(_) => "extraction",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("resource to generate required")]
    MissingResource,

    #[error("resource \"{resource}\" is not supported, supported resources: {supported}")]
    Unsupported { resource: String, supported: String },
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("unable to parse resource \"{0}\"")]
    InvalidResource(String),

    #[error("unable to parse api version \"{0}\", expected GROUP/VERSION or VERSION")]
    InvalidApiVersion(String),

    #[error("unable to determine kind for resource \"{resource}\"")]
    NoKind {
        resource: String,
        #[source]
        source: MappingError,
    },

    #[error("unable to connect to cluster")]
    Connection(#[from] ConnectionError),

    #[error("cluster api discovery failed")]
    Discovery(#[source] kube::Error),
}

/// Failure of a [`RestMapper`](crate::resolve::RestMapper) lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("no resource matches {0}")]
    NoMatch(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("schema source \"{0}\" is neither an existing file nor an http(s) URL")]
    NotFound(String),

    #[error("failed to read schema file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch schema from {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {origin} schema")]
    Parse {
        origin: String,
        #[source]
        source: ParseError,
    },

    #[error("unable to load schema from cluster")]
    Connectivity(#[from] ConnectionError),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no schema definition found for {0}")]
    NotFound(String),

    #[error("schema definition {0} has no example")]
    MissingExample(String),

    #[error("failed to render example of {name}")]
    Render {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
}
