//! Service clients
//!
//! One [`ServiceClient`] per API group (compute, network, ...). It combines the
//! endpoint, the version path segment, the shared HTTP client and the
//! credentials. Clients are immutable once built and cheap to clone.

use super::auth::Credentials;
use super::error::Result;
use super::http::{ApiResponse, EclHttpClient, RequestOpts};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API groups exposed by the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Compute,
    BlockStorage,
    Network,
    Storage,
    Dns,
    Security,
    Baremetal,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::Compute,
        Service::BlockStorage,
        Service::Network,
        Service::Storage,
        Service::Dns,
        Service::Security,
        Service::Baremetal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Service::Compute => "compute",
            Service::BlockStorage => "blockstorage",
            Service::Network => "network",
            Service::Storage => "storage",
            Service::Dns => "dns",
            Service::Security => "security",
            Service::Baremetal => "baremetal",
        }
    }

    /// Host label used by the public endpoints of this service
    fn host_prefix(self) -> &'static str {
        match self {
            Service::Compute => "nova",
            Service::BlockStorage => "cinder",
            Service::Network => "network",
            Service::Storage => "storage",
            Service::Dns => "dns",
            Service::Security => "security-operation",
            Service::Baremetal => "baremetal-server",
        }
    }

    /// Version path segment placed between the endpoint and resource paths
    pub fn version(self) -> &'static str {
        match self {
            Service::Compute => "v2",
            Service::BlockStorage => "v2",
            Service::Network => "v2.0",
            Service::Storage => "v1.0",
            Service::Dns => "v2",
            Service::Security => "v2",
            Service::Baremetal => "v2",
        }
    }

    /// Whether resource paths sit under the tenant id
    pub fn tenant_scoped(self) -> bool {
        matches!(
            self,
            Service::Compute | Service::BlockStorage | Service::Storage | Service::Baremetal
        )
    }

    /// Public endpoint of this service in a region
    pub fn default_endpoint(self, region: &str) -> String {
        format!("https://{}-{}-ecl.api.ntt.com/", self.host_prefix(), region)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|svc| svc.name() == s)
            .ok_or_else(|| format!("unknown service: {}", s))
    }
}

/// Handle on one API group
#[derive(Clone)]
pub struct ServiceClient {
    service: Service,
    endpoint: String,
    resource_base: String,
    http: EclHttpClient,
    credentials: Credentials,
}

impl ServiceClient {
    /// Build a client for `service` rooted at `endpoint`
    ///
    /// The resource base is `endpoint/<version>/` with the tenant id appended
    /// for tenant-scoped services.
    pub fn new(
        service: Service,
        endpoint: &str,
        tenant_id: Option<&str>,
        http: EclHttpClient,
        credentials: Credentials,
    ) -> Self {
        let endpoint = normalize(endpoint);
        let mut resource_base = format!("{}{}/", endpoint, service.version());
        if service.tenant_scoped() {
            if let Some(tenant) = tenant_id {
                resource_base.push_str(tenant);
                resource_base.push('/');
            }
        }

        Self {
            service,
            endpoint,
            resource_base,
            http,
            credentials,
        }
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn resource_base(&self) -> &str {
        &self.resource_base
    }

    /// Join path parts onto the resource base
    pub fn service_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.resource_base, parts.join("/"))
    }

    /// Issue a request with the current token
    pub async fn request(&self, method: Method, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        let token = self.credentials.get_token().await?;
        self.http.request(method, url, &token, opts).await
    }

    pub async fn get(&self, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        self.request(Method::GET, url, opts).await
    }

    pub async fn post(&self, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        self.request(Method::POST, url, opts).await
    }

    pub async fn put(&self, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        self.request(Method::PUT, url, opts).await
    }

    pub async fn patch(&self, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        self.request(Method::PATCH, url, opts).await
    }

    pub async fn delete(&self, url: &str, opts: RequestOpts) -> Result<ApiResponse> {
        self.request(Method::DELETE, url, opts).await
    }
}

fn normalize(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{}/", endpoint)
    }
}
