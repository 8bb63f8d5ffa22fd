//! Enterprise Cloud credentials
//!
//! Tokens are acquired outside this crate. A [`TokenSource`] only hands out a
//! token that was already issued: either a fixed value (config file, `OS_TOKEN`)
//! or the output of an external command, cached for a while.

use super::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL for command-issued tokens (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Something that can hand out an already-issued auth token
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// A token fixed at construction
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(Error::Auth(
                "no token configured; set OS_TOKEN or pass --token".to_string(),
            ));
        }
        Ok(self.0.clone())
    }
}

/// A token printed on stdout by an external command
pub struct CommandToken {
    program: String,
    args: Vec<String>,
}

impl CommandToken {
    /// Split a command line on whitespace: `"mytool token issue"`
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| Error::Auth("empty token command".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl TokenSource for CommandToken {
    async fn token(&self) -> Result<String> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| Error::Auth(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::Auth(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(Error::Auth(format!("{} printed no token", self.program)));
        }
        Ok(token)
    }
}

/// Credentials holder with token caching
#[derive(Clone)]
pub struct Credentials {
    source: Arc<dyn TokenSource>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
    ttl: Duration,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl Credentials {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            token_cache: Arc::new(RwLock::new(None)),
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Credentials around a fixed token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticToken::new(token)))
    }

    /// Get a token for API calls
    /// Security: Checks token expiry before returning cached token
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self.source.token().await?;

        let expires_at = Instant::now() + self.ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        Ok(token)
    }

    /// Drop the cached token and fetch a fresh one
    pub async fn refresh_token(&self) -> Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }
        self.get_token().await
    }
}

/// Validate a tenant ID: 32 lowercase hex characters
pub fn validate_tenant_id(tenant: &str) -> bool {
    tenant.len() == 32
        && tenant
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Read the tenant from the environment
/// Security: Validates tenant ID format before returning
pub fn default_tenant_id() -> Option<String> {
    for var in ["OS_TENANT_ID", "OS_PROJECT_ID"] {
        if let Ok(tenant) = std::env::var(var) {
            if validate_tenant_id(&tenant) {
                return Some(tenant);
            }
            tracing::warn!("Invalid tenant ID format in {}", var);
        }
    }
    None
}

pub fn default_region() -> Option<String> {
    std::env::var("OS_REGION_NAME").ok().filter(|r| !r.is_empty())
}

pub fn default_token() -> Option<String> {
    std::env::var("OS_TOKEN").ok().filter(|t| !t.is_empty())
}
