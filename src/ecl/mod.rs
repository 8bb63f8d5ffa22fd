//! Enterprise Cloud API interaction module
//!
//! Low-level REST plumbing shared by every service: credentials, the HTTP
//! client with status allow-lists, per-service clients and URL roots, and
//! query-string encoding.
//!
//! # Module Structure
//!
//! - [`auth`] - Token sources and token caching
//! - [`client`] - [`client::ServiceClient`], one per API group
//! - [`error`] - SDK error type
//! - [`http`] - HTTP client, default OkCodes and error formatting
//! - [`query`] - List options to query string
//!
//! # Example
//!
//! ```ignore
//! use ecl_provider::ecl::client::{Service, ServiceClient};
//!
//! async fn example(client: &ServiceClient) -> ecl_provider::ecl::Result<()> {
//!     let url = client.service_url(&["public_ips"]);
//!     let response = client.get(&url, Default::default()).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod query;

pub use error::{Error, Result};
