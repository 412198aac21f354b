#![allow(dead_code)]

use std::cell::Cell;

use ctor::ctor;
use kube::{core::GroupVersionKind, Client, Config};
use kubectl_generate::{
    cluster::Cluster,
    error::{LoadError, ResolutionError},
    openapi::SchemaDocument,
    resolve::{DiscoveryMapper, MappedResource},
};
use rustls::crypto::CryptoProvider;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[ctor]
fn on_startup() {
    if CryptoProvider::get_default().is_none() {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Error initializing rustls provider");
    }
}

/// OpenAPI document as a cluster would report it, trimmed to a few definitions.
pub fn upstream_schema() -> serde_json::Value {
    json!({
        "swagger": "2.0",
        "info": {"title": "Kubernetes", "version": "v1.30.0"},
        "paths": {},
        "definitions": {
            "io.k8s.api.apps.v1.Deployment": {
                "description": "Deployment enables declarative updates for Pods and ReplicaSets.",
                "type": "object",
                "properties": {
                    "apiVersion": {"type": "string"},
                    "kind": {"type": "string"},
                    "spec": {"$ref": "#/definitions/io.k8s.api.apps.v1.DeploymentSpec"}
                },
                "example": "upstream deployment example",
                "x-kubernetes-group-version-kind": [
                    {"group": "apps", "kind": "Deployment", "version": "v1"}
                ]
            },
            "io.k8s.api.core.v1.Pod": {
                "description": "Pod is a collection of containers that can run on a host.",
                "type": "object",
                "x-kubernetes-group-version-kind": [
                    {"group": "", "kind": "Pod", "version": "v1"}
                ]
            }
        }
    })
}

pub fn upstream_document() -> SchemaDocument {
    serde_json::from_value(upstream_schema()).expect("upstream schema should parse")
}

pub fn mapper() -> DiscoveryMapper {
    DiscoveryMapper::new(vec![
        MappedResource::new(GroupVersionKind::gvk("", "v1", "Pod"), "pods", true),
        MappedResource::new(
            GroupVersionKind::gvk("apps", "v1", "Deployment"),
            "deployments",
            true,
        )
        .with_short_names(&["deploy"]),
    ])
}

/// In-memory cluster counting how often it is asked for something.
pub struct FakeCluster {
    pub upstream: SchemaDocument,
    pub calls: Cell<usize>,
}

impl FakeCluster {
    pub fn new() -> FakeCluster {
        FakeCluster {
            upstream: upstream_document(),
            calls: Cell::new(0),
        }
    }
}

impl Cluster for FakeCluster {
    type Mapper = DiscoveryMapper;

    async fn rest_mapper(&self) -> Result<DiscoveryMapper, ResolutionError> {
        self.calls.set(self.calls.get() + 1);
        Ok(mapper())
    }

    async fn openapi_schema(&self) -> Result<SchemaDocument, LoadError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.upstream.clone())
    }
}

/// Curated examples document overriding the bundled deployment example.
pub const CUSTOM_EXAMPLES: &str = r#"definitions:
  io.k8s.config.examples/api.apps.v1.Deployment:
    description: Custom deployment example.
    example: |
      apiVersion: apps/v1
      kind: Deployment
      metadata:
        name: custom
"#;

pub const CUSTOM_EXAMPLE_TEXT: &str = "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: custom";

pub fn client_for(server: &MockServer) -> Client {
    let config = Config::new(server.uri().parse().expect("mock server uri"));
    Client::try_from(config).expect("unable to create client")
}

pub async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serves legacy discovery for pods (core/v1) and deployments (apps/v1).
///
/// Each of `unavailable` is listed as an extra `<group>/v1beta1` group whose
/// resource list answers 503, like an aggregated API without a healthy backend.
pub async fn mount_discovery(server: &MockServer, unavailable: &[&str]) {
    mount_json(
        server,
        "/api",
        json!({
            "kind": "APIVersions",
            "apiVersion": "v1",
            "versions": ["v1"],
            "serverAddressByClientCIDRs": [
                {"clientCIDR": "0.0.0.0/0", "serverAddress": "127.0.0.1:6443"}
            ]
        }),
    )
    .await;
    mount_json(
        server,
        "/api/v1",
        json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "v1",
            "resources": [
                {"name": "pods", "singularName": "pod", "namespaced": true, "kind": "Pod",
                 "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]}
            ]
        }),
    )
    .await;
    let mut groups = vec![json!({
        "name": "apps",
        "versions": [{"groupVersion": "apps/v1", "version": "v1"}],
        "preferredVersion": {"groupVersion": "apps/v1", "version": "v1"}
    })];
    groups.extend(unavailable.iter().map(|group| {
        json!({
            "name": group,
            "versions": [{"groupVersion": format!("{group}/v1beta1"), "version": "v1beta1"}],
            "preferredVersion": {"groupVersion": format!("{group}/v1beta1"), "version": "v1beta1"}
        })
    }));
    mount_json(
        server,
        "/apis",
        json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": groups,
        }),
    )
    .await;
    for group in unavailable {
        Mock::given(method("GET"))
            .and(path(format!("/apis/{group}/v1beta1")))
            .respond_with(ResponseTemplate::new(503))
            .mount(server)
            .await;
    }
    mount_json(
        server,
        "/apis/apps/v1",
        json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "apps/v1",
            "resources": [
                {"name": "deployments", "singularName": "deployment", "namespaced": true,
                 "kind": "Deployment", "shortNames": ["deploy"],
                 "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]}
            ]
        }),
    )
    .await;
}
