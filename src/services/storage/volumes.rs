//! Volumes inside a virtual storage

use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::Result;
use crate::resource::{waiter, ApiResource, Crud, ResourceDescriptor, WaitOpts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Size in GB
    pub size: u32,
    #[serde(default)]
    pub virtual_storage_id: String,
    #[serde(default)]
    pub availability_zone: String,
    /// Block storage only
    #[serde(default)]
    pub iops_per_gb: Option<String>,
    /// File storage only
    #[serde(default)]
    pub throughput: Option<String>,
    #[serde(default)]
    pub initiator_iqns: Vec<String>,
    #[serde(default)]
    pub target_ips: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiResource for Volume {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Storage, "volumes", "volume", "volumes")
            .list_suffix("detail")
            .create_ok(&[202])
            .update_ok(&[202])
            .delete_ok(&[202]);

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub virtual_storage_id: String,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops_per_gb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_iqns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_iqns: Option<Vec<String>>,
}

/// Block until the volume reports `target` (e.g. `available`)
pub async fn wait_for_status(
    client: &ServiceClient,
    id: &str,
    target: &str,
    opts: WaitOpts,
) -> Result<()> {
    let crud = Crud::<Volume>::new(client);
    waiter::wait_for_status(opts, target, || crud.status_of(id)).await
}
