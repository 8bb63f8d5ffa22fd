//! Block storage volumes attached to virtual servers

use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::Result;
use crate::resource::{waiter, ApiResource, Crud, Paging, ResourceDescriptor, WaitOpts};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Size in GiB
    pub size: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub bootable: String,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: String,
}

impl ApiResource for Volume {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::BlockStorage, "volumes", "volume", "volumes")
            .list_suffix("detail")
            .paging(Paging::RelLinks("volumes_links"))
            .create_ok(&[202])
            .update_ok(&[200]);

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    #[serde(
        rename(serialize = "imageRef"),
        alias = "imageRef",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
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
