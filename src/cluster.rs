//! Kubernetes cluster connection management.

use std::{path::PathBuf, time::Duration};

use clap::Args;
use kube::{
    config::{InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError},
    Client, Config,
};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::{
    error::{LoadError, ResolutionError},
    loader::upstream,
    openapi::SchemaDocument,
    resolve::{DiscoveryMapper, RestMapper},
};

/// Errors that can occur when connecting to a Kubernetes cluster.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),

    #[error(transparent)]
    InferConfig(#[from] InferConfigError),

    #[error("invalid server address `{server}`")]
    InvalidServer {
        server: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    #[error("invalid request")]
    Request(#[source] http::Error),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

/// Flags selecting and overriding the cluster connection, as accepted by kubectl.
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Path to the kubeconfig file to use for CLI requests
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long)]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long)]
    pub user: Option<String>,

    /// The address and port of the Kubernetes API server
    #[arg(short, long)]
    pub server: Option<String>,

    /// Do not verify the server's certificate. Makes HTTPS connections insecure
    #[arg(long)]
    pub insecure_skip_tls_verify: bool,

    /// Time to wait for a single server response (e.g. 30s, 2m); 0 waits forever
    #[arg(long, value_parser = parse_timeout)]
    pub request_timeout: Option<Duration>,
}

/// Parses kubectl style durations: bare seconds or a number with an `s`, `m` or `h` suffix.
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let (number, unit) = match value.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((i, _)) => value.split_at(i),
        None => (value, "s"),
    };
    let number: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration `{value}`"))?;
    let factor = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => return Err(format!("invalid duration unit in `{value}`, expected s, m or h")),
    };
    number
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration `{value}` is too large"))
}

impl ConnectionArgs {
    fn uses_kubeconfig(&self) -> bool {
        self.kubeconfig.is_some()
            || self.context.is_some()
            || self.cluster.is_some()
            || self.user.is_some()
    }

    fn server_uri(&self) -> Result<Option<http::Uri>, ConnectionError> {
        self.server
            .as_ref()
            .map(|server| {
                server
                    .parse()
                    .map_err(|source| ConnectionError::InvalidServer {
                        server: server.clone(),
                        source,
                    })
            })
            .transpose()
    }

    /// Builds the client configuration.
    ///
    /// Without kubeconfig selectors the configuration is inferred (`KUBECONFIG`,
    /// `~/.kube/config`, in-cluster). `--server` alone is enough when nothing can be inferred.
    #[instrument(skip_all)]
    pub async fn to_config(&self) -> Result<Config, ConnectionError> {
        let server = self.server_uri()?;
        let mut config = if self.uses_kubeconfig() {
            let kubeconfig = match &self.kubeconfig {
                Some(path) => Kubeconfig::read_from(path)?,
                None => Kubeconfig::read()?,
            };
            let options = KubeConfigOptions {
                context: self.context.clone(),
                cluster: self.cluster.clone(),
                user: self.user.clone(),
            };
            Config::from_custom_kubeconfig(kubeconfig, &options).await?
        } else {
            match (Config::infer().await, &server) {
                (Ok(config), _) => config,
                (Err(e), Some(server)) => {
                    debug!(error = %e, "no configuration to infer, using --server only");
                    Config::new(server.clone())
                }
                (Err(e), None) => return Err(e.into()),
            }
        };

        if let Some(server) = server {
            config.cluster_url = server;
        }
        if self.insecure_skip_tls_verify {
            config.accept_invalid_certs = true;
        }
        match self.request_timeout {
            Some(timeout) if timeout.is_zero() => config.read_timeout = None,
            Some(timeout) => config.read_timeout = Some(timeout),
            None => {}
        }
        debug!(cluster_url = %config.cluster_url, "using cluster");
        Ok(config)
    }
}

/// What the generate pipeline needs from a cluster.
#[allow(async_fn_in_trait)]
pub trait Cluster {
    type Mapper: RestMapper;

    async fn rest_mapper(&self) -> Result<Self::Mapper, ResolutionError>;

    async fn openapi_schema(&self) -> Result<SchemaDocument, LoadError>;
}

/// A cluster reached through a kube [`Client`] created on first use.
pub struct KubeCluster {
    args: ConnectionArgs,
    client: OnceCell<Client>,
}

impl KubeCluster {
    pub fn new(args: ConnectionArgs) -> KubeCluster {
        KubeCluster {
            args,
            client: OnceCell::new(),
        }
    }

    pub fn from_client(client: Client) -> KubeCluster {
        KubeCluster {
            args: ConnectionArgs::default(),
            client: OnceCell::from(client),
        }
    }

    async fn client(&self) -> Result<&Client, ConnectionError> {
        self.client
            .get_or_try_init(|| async {
                let config = self.args.to_config().await?;
                Ok::<_, ConnectionError>(Client::try_from(config)?)
            })
            .await
    }
}

impl Cluster for KubeCluster {
    type Mapper = DiscoveryMapper;

    async fn rest_mapper(&self) -> Result<DiscoveryMapper, ResolutionError> {
        let client = self.client().await?;
        DiscoveryMapper::discover(client)
            .await
            .map_err(ResolutionError::Discovery)
    }

    async fn openapi_schema(&self) -> Result<SchemaDocument, LoadError> {
        let client = self.client().await?;
        upstream::load(client).await
    }
}
