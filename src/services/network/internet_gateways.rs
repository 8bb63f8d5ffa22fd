//! Internet gateways connecting a tenant to an internet service

use crate::ecl::client::Service;
use crate::resource::{ApiResource, Paging, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternetGateway {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub internet_service_id: String,
    #[serde(default)]
    pub qos_option_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tenant_id: String,
}

impl ApiResource for InternetGateway {
    const DESCRIPTOR: ResourceDescriptor = ResourceDescriptor::new(
        Service::Network,
        "internet_gateways",
        "internet_gateway",
        "internet_gateways",
    )
    .paging(Paging::RelLinks("internet_gateways_links"))
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
    pub internet_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub internet_service_id: String,
    pub qos_option_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_option_id: Option<String>,
}
