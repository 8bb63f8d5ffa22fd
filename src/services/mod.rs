//! Per-service resource types
//!
//! Each module declares the serde structs of a resource, its request options
//! and its [`ResourceDescriptor`](crate::resource::ResourceDescriptor). The
//! generic [`Crud`](crate::resource::Crud) does the rest.

pub mod baremetal;
pub mod compute;
pub mod dns;
pub mod network;
pub mod security;
pub mod storage;
