//! Virtual storages: the network attachment that volumes are carved from

use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::Result;
use crate::resource::{waiter, ApiResource, Crud, ResourceDescriptor, WaitOpts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpAddrPool {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRoute {
    pub destination: String,
    pub nexthop: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualStorage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub network_id: String,
    #[serde(default)]
    pub subnet_id: String,
    #[serde(default)]
    pub volume_type_id: String,
    pub ip_addr_pool: Option<IpAddrPool>,
    #[serde(default)]
    pub host_routes: Vec<HostRoute>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiResource for VirtualStorage {
    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor::new(
        Service::Storage,
        "virtual_storages",
        "virtual_storage",
        "virtual_storages",
    )
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
    pub network_id: String,
    pub subnet_id: String,
    pub volume_type_id: String,
    pub ip_addr_pool: IpAddrPool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_routes: Option<Vec<HostRoute>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addr_pool: Option<IpAddrPool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_routes: Option<Vec<HostRoute>>,
}

/// Block until the virtual storage reports `target` (e.g. `available`)
pub async fn wait_for_status(
    client: &ServiceClient,
    id: &str,
    target: &str,
    opts: WaitOpts,
) -> Result<()> {
    let crud = Crud::<VirtualStorage>::new(client);
    waiter::wait_for_status(opts, target, || crud.status_of(id)).await
}
