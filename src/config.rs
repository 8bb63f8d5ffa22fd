//! Configuration Management
//!
//! Handles persistent configuration storage for ecl-provider.

use crate::ecl::auth::{self, CommandToken, Credentials};
use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::http::EclHttpClient;
use crate::resource::WaitOpts;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_REGION: &str = "jp1";
const DEFAULT_TIMEOUT_SECS: u64 = 600;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Already-issued auth token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Command printing a token on stdout, used when `token` is unset
    #[serde(default)]
    pub token_command: Option<String>,
    /// Per-service endpoint overrides
    #[serde(default)]
    pub endpoints: BTreeMap<Service, String>,
    /// Budget for status polling
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ecl-provider").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {:?}: {:#}", path, e);
                Self::default()
            },
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Let `OS_TENANT_ID`, `OS_REGION_NAME` and `OS_TOKEN` win over the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(tenant) = auth::default_tenant_id() {
            self.tenant_id = Some(tenant);
        }
        if let Some(region) = auth::default_region() {
            self.region = Some(region);
        }
        if let Some(token) = auth::default_token() {
            self.token = Some(token);
        }
        self
    }

    pub fn effective_region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Endpoint of `service`: explicit override or the regional default
    pub fn endpoint(&self, service: Service) -> String {
        self.endpoints
            .get(&service)
            .cloned()
            .unwrap_or_else(|| service.default_endpoint(self.effective_region()))
    }

    pub fn wait_opts(&self) -> WaitOpts {
        WaitOpts::from_secs(
            self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            self.poll_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                .max(1),
        )
    }

    /// Check values that would otherwise only fail at request time
    pub fn validate(&self) -> Result<()> {
        if let Some(tenant) = &self.tenant_id {
            if !auth::validate_tenant_id(tenant) {
                anyhow::bail!("Invalid tenant ID format: expected 32 lowercase hex characters");
            }
        }
        for (service, endpoint) in &self.endpoints {
            url::Url::parse(endpoint)
                .with_context(|| format!("Invalid endpoint for {}: {}", service, endpoint))?;
        }
        Ok(())
    }

    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(token) = &self.token {
            return Ok(Credentials::from_token(token.clone()));
        }
        if let Some(command) = &self.token_command {
            let source = CommandToken::parse(command)?;
            return Ok(Credentials::new(Arc::new(source)));
        }
        Ok(Credentials::from_token(""))
    }

    /// One client per service, sharing the HTTP client and credentials
    pub fn service_clients(&self) -> Result<BTreeMap<Service, ServiceClient>> {
        self.validate()?;

        let http = EclHttpClient::with_options(self.insecure).context("Failed to create HTTP client")?;
        let credentials = self.credentials()?;

        Ok(Service::ALL
            .into_iter()
            .map(|service| {
                let client = ServiceClient::new(
                    service,
                    &self.endpoint(service),
                    self.tenant_id.as_deref(),
                    http.clone(),
                    credentials.clone(),
                );
                (service, client)
            })
            .collect())
    }
}
