//! Dedicated physical servers
//!
//! Same lifecycle shape as virtual servers, slower: provisioning commonly
//! takes tens of minutes, so callers should size their wait budget
//! accordingly. Servers cannot be updated in place.

use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::Result;
use crate::resource::{waiter, ApiResource, Crud, Paging, ResourceDescriptor, WaitOpts};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    /// Provisioning progress, 0-100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub flavor: Value,
    #[serde(default)]
    pub addresses: Value,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(rename(deserialize = "OS-EXT-AZ:availability_zone"), default)]
    pub availability_zone: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl ApiResource for Server {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Baremetal, "servers", "server", "servers")
            .list_suffix("detail")
            .paging(Paging::RelLinks("servers_links"))
            .create_ok(&[202])
            .delete_ok(&[204]);

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
    #[serde(rename = "changes-since", skip_serializing_if = "Option::is_none")]
    pub changes_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOpts {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_ip: Option<String>,
    /// `data` or `storage`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub name: String,
    #[serde(rename(serialize = "flavorRef"), alias = "flavorRef")]
    pub flavor_ref: String,
    #[serde(
        rename(serialize = "imageRef"),
        alias = "imageRef",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,
    pub networks: Vec<NetworkOpts>,
    #[serde(
        rename(serialize = "adminPass"),
        alias = "adminPass",
        skip_serializing_if = "Option::is_none"
    )]
    pub admin_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// Block until the server reports `target` (e.g. `ACTIVE`)
pub async fn wait_for_status(
    client: &ServiceClient,
    id: &str,
    target: &str,
    opts: WaitOpts,
) -> Result<()> {
    let crud = Crud::<Server>::new(client);
    waiter::wait_for_status(opts, target, || crud.status_of(id)).await
}
