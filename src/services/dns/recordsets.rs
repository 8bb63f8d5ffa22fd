//! Record sets, nested under a zone: `zones/<zone_id>/recordsets`

use crate::ecl::client::{Service, ServiceClient};
use crate::resource::{ApiResource, Crud, Paging, ResourceDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub id: String,
    pub zone_id: String,
    #[serde(default)]
    pub zone_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiResource for RecordSet {
    const DESCRIPTOR: ResourceDescriptor =
        ResourceDescriptor::new(Service::Dns, "recordsets", "recordset", "recordsets")
            .root_objects()
            .paging(Paging::NextField("links.next"))
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

/// CRUD scoped to one zone
pub fn in_zone<'a>(client: &'a ServiceClient, zone_id: &str) -> Crud<'a, RecordSet> {
    Crud::nested(client, &["zones", zone_id])
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOpts {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub records: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
