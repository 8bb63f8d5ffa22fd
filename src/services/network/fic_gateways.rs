//! FIC gateways
//!
//! Provisioned out of band; the API only lists and shows them.

use crate::ecl::client::Service;
use crate::resource::{ApiResource, Paging, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FicGateway {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fic_service_id: String,
    #[serde(default)]
    pub qos_option_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tenant_id: String,
}

impl ApiResource for FicGateway {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Network, "fic_gateways", "fic_gateway", "fic_gateways")
            .paging(Paging::RelLinks("fic_gateways_links"));

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
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fic_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}
