use clap::Parser;
use kubectl_generate::{
    cluster::{ConnectionArgs, KubeCluster},
    generate, telemetry, GenerateOptions,
};
use rustls::crypto::CryptoProvider;
use tracing::error;

#[derive(Parser)]
#[command(name = "kubectl-generate", about = "Prints Kubernetes resource manifests", version)]
struct Cli {
    /// Resource to generate a manifest for, e.g. deployment
    resource: Option<String>,

    /// Local file path or URL to load as example schema
    #[arg(long)]
    schema: Option<String>,

    /// API version to generate the manifest for, e.g. apps/v1
    #[arg(long)]
    api_version: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<tracing::Level>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_level)?;
    if CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    let options = GenerateOptions {
        resource: cli.resource.map(|r| r.to_lowercase()),
        api_version: cli.api_version,
        schema: cli.schema,
    };
    let cluster = KubeCluster::new(cli.connection);

    match generate(&options, &cluster).await {
        Ok(example) => {
            println!("{example}");
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "generate failed");
            Err(e.into())
        }
    }
}
