//! Hosted zones

use crate::ecl::client::Service;
use crate::resource::{ApiResource, Paging, ResourceDescriptor, UpdateVerb};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    /// Fully qualified, trailing dot included
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default)]
    pub zone_type: String,
    #[serde(default)]
    pub masters: Vec<String>,
    #[serde(default)]
    pub pool_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiResource for Zone {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Dns, "zones", "zone", "zones")
            .root_objects()
            .paging(Paging::NextField("links.next"))
            .update_verb(UpdateVerb::Patch)
            .create_ok(&[200, 201, 202])
            .update_ok(&[200, 202])
            .delete_ok(&[200, 202, 204]);

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
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masters: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masters: Option<Vec<String>>,
}
