//! Public IPs allocated on an internet gateway

use crate::ecl::client::Service;
use crate::resource::{ApiResource, Paging, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicIp {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// First address of the allocated block
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub submask_length: u32,
    #[serde(default)]
    pub internet_gw_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tenant_id: String,
}

impl ApiResource for PublicIp {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Network, "public_ips", "public_ip", "public_ips")
            .paging(Paging::RelLinks("public_ips_links"))
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
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_gw_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub internet_gw_id: String,
    pub submask_length: u32,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_opts_skip_unset_fields() {
        let opts = CreateOpts {
            internet_gw_id: "gw-1".to_string(),
            submask_length: 28,
            ..Default::default()
        };
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"internet_gw_id": "gw-1", "submask_length": 28})
        );
    }
}
