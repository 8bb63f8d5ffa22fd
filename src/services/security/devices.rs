//! Managed security devices (firewall / UTM / WAF appliances)
//!
//! The device list is returned in one response; devices are ordered through
//! a separate workflow and are read-only here.

use crate::ecl::client::Service;
use crate::resource::{ApiResource, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub msa_device_id: String,
    #[serde(default)]
    pub msa_device_type: String,
    #[serde(default)]
    pub os_server_id: String,
    #[serde(default)]
    pub os_server_name: String,
    #[serde(default)]
    pub os_availability_zone: String,
    #[serde(default)]
    pub os_admin_username: String,
    #[serde(default)]
    pub os_server_status: String,
}

impl ApiResource for Device {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Security, "ecl-api/devices", "device", "devices");

    fn id(&self) -> &str {
        &self.msa_device_id
    }

    fn status(&self) -> Option<&str> {
        Some(&self.os_server_status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOpts {
    /// `ja` or `en`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}
