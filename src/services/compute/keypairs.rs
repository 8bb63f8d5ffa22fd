//! SSH keypairs, addressed by name
//!
//! The list response nests every item once more:
//! `{"keypairs": [{"keypair": {...}}]}`.

use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::Result;
use crate::resource::{ApiResource, Crud, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypair {
    pub name: String,
    #[serde(default)]
    pub public_key: String,
    /// Only returned when the server generated the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ApiResource for Keypair {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Compute, "os-keypairs", "keypair", "keypairs")
            .list_item("keypair")
            .create_ok(&[200, 201]);

    fn id(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub name: String,
    /// Omit to have the server generate the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Every keypair of the current user
pub async fn list_all(client: &ServiceClient) -> Result<Vec<Keypair>> {
    Crud::<Keypair>::new(client).list_all(&()).await
}
