//! Resource abstraction layer
//!
//! Generic machinery shared by every resource type. A resource is a serde
//! struct plus a constant [`ResourceDescriptor`]; everything else (URLs,
//! paging, envelopes, OkCodes, polling) is written once here.
//!
//! # Architecture
//!
//! - [`crud`] - Descriptor and the generic [`Crud`] component
//! - [`extract`] - Envelope-key extraction of response bodies
//! - [`pagination`] - [`Page`] trait and the lazy [`Pager`]
//! - [`waiter`] - Status polling with a time budget
//!
//! # Example
//!
//! ```ignore
//! use ecl_provider::resource::Crud;
//! use ecl_provider::services::network::public_ips::{ListOpts, PublicIp};
//!
//! async fn list_ips(client: &ServiceClient) -> ecl_provider::ecl::Result<Vec<PublicIp>> {
//!     Crud::<PublicIp>::new(client).list_all(&ListOpts::default()).await
//! }
//! ```

pub mod crud;
pub mod extract;
pub mod pagination;
pub mod waiter;

pub use crud::{ApiResource, Crud, ResourceDescriptor, UpdateVerb};
pub use extract::{Envelope, Extractor};
pub use pagination::{Page, Pager, Paging, ResourcePage};
pub use waiter::{wait_for, wait_for_deletion, wait_for_status, Probe, WaitOpts};
