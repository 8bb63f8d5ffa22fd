//! Provider plugin and REST SDK for Enterprise Cloud
//!
//! - [`ecl`] - HTTP client, credentials, service clients, errors
//! - [`resource`] - Generic CRUD, pagination, extraction and polling
//! - [`services`] - Resource types of each API group
//! - [`provider`] - Schemas and handlers driven by a host
//! - [`config`] - Persistent configuration

pub mod config;
pub mod ecl;
pub mod provider;
pub mod resource;
pub mod services;

/// Version injected at compile time via ECL_PROVIDER_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ECL_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
