//! Resource and data source registry
//!
//! Maps host-facing type names to handlers. Each entry pairs an SDK
//! resource with its schema and lifecycle options (statuses to wait for,
//! nesting, in-place updates).

use super::handler::{CrudResource, DataSourceHandler, ListDataSource, ResourceHandler};
use super::schema::AttrType::{Bool, Int, List, Map as MapAttr, Object, String as Str};
use super::schema::{Attribute, Schema};
use crate::services::{baremetal, compute, dns, network, security, storage};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options for types whose API takes no list filters or has no update call
type Untyped = Map<String, Value>;

pub type Resources = BTreeMap<&'static str, Box<dyn ResourceHandler>>;
pub type DataSources = BTreeMap<&'static str, Box<dyn DataSourceHandler>>;

pub fn resources() -> Resources {
    let mut map: Resources = BTreeMap::new();

    map.insert(
        "ecl_network_network_v2",
        Box::new(
            CrudResource::<
                network::networks::Network,
                network::networks::ListOpts,
                network::networks::CreateOpts,
                network::networks::UpdateOpts,
            >::new(network_schema)
            .wait_until("ACTIVE")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_network_subnet_v2",
        Box::new(
            CrudResource::<
                network::subnets::Subnet,
                network::subnets::ListOpts,
                network::subnets::CreateOpts,
                network::subnets::UpdateOpts,
            >::new(subnet_schema)
            .wait_until("ACTIVE")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_network_internet_gateway_v2",
        Box::new(
            CrudResource::<
                network::internet_gateways::InternetGateway,
                network::internet_gateways::ListOpts,
                network::internet_gateways::CreateOpts,
                network::internet_gateways::UpdateOpts,
            >::new(internet_gateway_schema)
            .wait_until("ACTIVE")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_network_public_ip_v2",
        Box::new(
            CrudResource::<
                network::public_ips::PublicIp,
                network::public_ips::ListOpts,
                network::public_ips::CreateOpts,
                network::public_ips::UpdateOpts,
            >::new(public_ip_schema)
            .wait_until("ACTIVE")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_compute_instance_v2",
        Box::new(
            CrudResource::<
                compute::servers::Server,
                compute::servers::ListOpts,
                compute::servers::CreateOpts,
                compute::servers::UpdateOpts,
            >::new(instance_schema)
            .wait_until("ACTIVE")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_compute_keypair_v2",
        Box::new(
            CrudResource::<compute::keypairs::Keypair, Untyped, compute::keypairs::CreateOpts, Untyped>::new(
                keypair_schema,
            )
            .immutable(),
        ),
    );
    map.insert(
        "ecl_compute_volume_v2",
        Box::new(
            CrudResource::<
                compute::volumes::Volume,
                compute::volumes::ListOpts,
                compute::volumes::CreateOpts,
                compute::volumes::UpdateOpts,
            >::new(compute_volume_schema)
            .wait_until("available")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_storage_virtualstorage_v1",
        Box::new(
            CrudResource::<
                storage::virtual_storages::VirtualStorage,
                Untyped,
                storage::virtual_storages::CreateOpts,
                storage::virtual_storages::UpdateOpts,
            >::new(virtual_storage_schema)
            .wait_until("available")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_storage_volume_v1",
        Box::new(
            CrudResource::<
                storage::volumes::Volume,
                Untyped,
                storage::volumes::CreateOpts,
                storage::volumes::UpdateOpts,
            >::new(storage_volume_schema)
            .wait_until("available")
            .wait_for_delete(),
        ),
    );
    map.insert(
        "ecl_dns_zone_v2",
        Box::new(CrudResource::<
            dns::zones::Zone,
            dns::zones::ListOpts,
            dns::zones::CreateOpts,
            dns::zones::UpdateOpts,
        >::new(zone_schema)),
    );
    map.insert(
        "ecl_dns_recordset_v2",
        Box::new(
            CrudResource::<
                dns::recordsets::RecordSet,
                dns::recordsets::ListOpts,
                dns::recordsets::CreateOpts,
                dns::recordsets::UpdateOpts,
            >::new(recordset_schema)
            .nested("zones", "zone_id"),
        ),
    );
    map.insert(
        "ecl_baremetal_server_v2",
        Box::new(
            CrudResource::<
                baremetal::servers::Server,
                baremetal::servers::ListOpts,
                baremetal::servers::CreateOpts,
                Untyped,
            >::new(baremetal_server_schema)
            .wait_until("ACTIVE")
            .wait_for_delete()
            .immutable(),
        ),
    );

    map
}

pub fn data_sources() -> DataSources {
    let mut map: DataSources = BTreeMap::new();

    map.insert(
        "ecl_network_network_v2",
        Box::new(ListDataSource::<network::networks::Network, network::networks::ListOpts>::new(
            network_data_schema,
        )),
    );
    map.insert(
        "ecl_network_internet_gateway_v2",
        Box::new(ListDataSource::<
            network::internet_gateways::InternetGateway,
            network::internet_gateways::ListOpts,
        >::new(internet_gateway_data_schema)),
    );
    map.insert(
        "ecl_network_public_ip_v2",
        Box::new(ListDataSource::<network::public_ips::PublicIp, network::public_ips::ListOpts>::new(
            public_ip_data_schema,
        )),
    );
    map.insert(
        "ecl_network_fic_gateway_v2",
        Box::new(ListDataSource::<
            network::fic_gateways::FicGateway,
            network::fic_gateways::ListOpts,
        >::new(fic_gateway_data_schema)),
    );
    map.insert(
        "ecl_security_device_v2",
        Box::new(ListDataSource::<security::devices::Device, security::devices::ListOpts>::new(
            device_data_schema,
        )),
    );

    map
}

fn network_schema() -> Schema {
    Schema::new(
        "Tenant network",
        vec![
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("admin_state_up", Bool),
            Attribute::optional_computed("plane", Str)
                .force_new()
                .describe("`data` or `storage`"),
            Attribute::optional("tags", MapAttr),
            Attribute::optional_computed("tenant_id", Str).force_new(),
            Attribute::computed("shared", Bool),
            Attribute::computed("status", Str),
            Attribute::computed("subnets", List),
        ],
    )
}

fn subnet_schema() -> Schema {
    Schema::new(
        "Subnet of a tenant network",
        vec![
            Attribute::required("network_id", Str).force_new(),
            Attribute::required("cidr", Str).force_new(),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("gateway_ip", Str),
            Attribute::optional_computed("enable_dhcp", Bool),
            Attribute::optional_computed("ip_version", Int).force_new(),
            Attribute::optional_computed("allocation_pools", List).force_new(),
            Attribute::optional("dns_nameservers", List),
            Attribute::optional("ntp_servers", List),
            Attribute::optional("host_routes", List),
            Attribute::optional("tags", MapAttr),
            Attribute::computed("status", Str),
            Attribute::computed("tenant_id", Str),
        ],
    )
}

fn internet_gateway_schema() -> Schema {
    Schema::new(
        "Internet gateway",
        vec![
            Attribute::required("internet_service_id", Str).force_new(),
            Attribute::required("qos_option_id", Str),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("tenant_id", Str).force_new(),
            Attribute::computed("status", Str),
        ],
    )
}

fn public_ip_schema() -> Schema {
    Schema::new(
        "Block of public addresses on an internet gateway",
        vec![
            Attribute::required("internet_gw_id", Str).force_new(),
            Attribute::required("submask_length", Int)
                .force_new()
                .describe("Prefix length of the allocated block"),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("tenant_id", Str).force_new(),
            Attribute::computed("cidr", Str),
            Attribute::computed("status", Str),
        ],
    )
}

fn instance_schema() -> Schema {
    Schema::new(
        "Virtual server",
        vec![
            Attribute::required("name", Str),
            Attribute::required("image_ref", Str).force_new(),
            Attribute::required("flavor_ref", Str).force_new(),
            Attribute::optional("networks", List)
                .force_new()
                .describe("List of {uuid, port, fixed_ip}"),
            Attribute::optional("key_name", Str).force_new(),
            Attribute::optional_computed("availability_zone", Str).force_new(),
            Attribute::optional("metadata", MapAttr).force_new(),
            Attribute::optional("user_data", Str).force_new(),
            Attribute::optional("admin_pass", Str).force_new().sensitive(),
            Attribute::computed("status", Str),
            Attribute::computed("image", Object),
            Attribute::computed("flavor", Object),
            Attribute::computed("addresses", Object),
        ],
    )
}

fn keypair_schema() -> Schema {
    Schema::new(
        "SSH keypair",
        vec![
            Attribute::required("name", Str).force_new(),
            Attribute::optional_computed("public_key", Str)
                .force_new()
                .describe("Generated by the server when omitted"),
            Attribute::computed("private_key", Str).sensitive(),
            Attribute::computed("fingerprint", Str),
        ],
    )
}

fn compute_volume_schema() -> Schema {
    Schema::new(
        "Block storage volume for virtual servers",
        vec![
            Attribute::required("size", Int).force_new().describe("Size in GiB"),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("availability_zone", Str).force_new(),
            Attribute::optional_computed("volume_type", Str).force_new(),
            Attribute::optional("image_ref", Str).force_new(),
            Attribute::optional("metadata", MapAttr),
            Attribute::computed("status", Str),
            Attribute::computed("bootable", Str),
            Attribute::computed("attachments", List),
        ],
    )
}

fn virtual_storage_schema() -> Schema {
    Schema::new(
        "Virtual storage",
        vec![
            Attribute::required("network_id", Str).force_new(),
            Attribute::required("subnet_id", Str).force_new(),
            Attribute::required("volume_type_id", Str).force_new(),
            Attribute::required("ip_addr_pool", Object).describe("{start, end}"),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional("host_routes", List),
            Attribute::computed("status", Str),
            Attribute::computed("error_message", Str),
        ],
    )
}

fn storage_volume_schema() -> Schema {
    Schema::new(
        "Volume inside a virtual storage",
        vec![
            Attribute::required("virtual_storage_id", Str).force_new(),
            Attribute::required("size", Int).force_new(),
            Attribute::optional("name", Str),
            Attribute::optional("description", Str),
            Attribute::optional_computed("availability_zone", Str).force_new(),
            Attribute::optional_computed("iops_per_gb", Str).force_new(),
            Attribute::optional_computed("throughput", Str).force_new(),
            Attribute::optional("initiator_iqns", List),
            Attribute::computed("target_ips", List),
            Attribute::computed("status", Str),
            Attribute::computed("error_message", Str),
        ],
    )
}

fn zone_schema() -> Schema {
    Schema::new(
        "DNS zone",
        vec![
            Attribute::required("name", Str).force_new().describe("Fully qualified, with trailing dot"),
            Attribute::optional("description", Str),
            Attribute::optional_computed("email", Str),
            Attribute::optional_computed("ttl", Int),
            Attribute::optional_computed("type", Str).force_new(),
            Attribute::optional("masters", List),
            Attribute::computed("serial", Int),
            Attribute::computed("status", Str),
            Attribute::computed("pool_id", Str),
            Attribute::computed("project_id", Str),
        ],
    )
}

fn recordset_schema() -> Schema {
    Schema::new(
        "DNS record set",
        vec![
            Attribute::required("zone_id", Str).force_new(),
            Attribute::required("name", Str).force_new(),
            Attribute::required("type", Str).force_new(),
            Attribute::required("records", List),
            Attribute::optional_computed("ttl", Int),
            Attribute::optional("description", Str),
            Attribute::computed("status", Str),
        ],
    )
}

fn baremetal_server_schema() -> Schema {
    Schema::new(
        "Dedicated physical server",
        vec![
            Attribute::required("name", Str).force_new(),
            Attribute::required("flavor_ref", Str).force_new(),
            Attribute::required("networks", List)
                .force_new()
                .describe("List of {uuid, fixed_ip, plane}"),
            Attribute::optional("image_ref", Str).force_new(),
            Attribute::optional("admin_pass", Str).force_new().sensitive(),
            Attribute::optional("key_name", Str).force_new(),
            Attribute::optional("availability_zone", Str).force_new(),
            Attribute::optional("metadata", MapAttr).force_new(),
            Attribute::optional("user_data", Str).force_new(),
            Attribute::computed("status", Str),
            Attribute::computed("progress", Int),
        ],
    )
}

fn network_data_schema() -> Schema {
    Schema::new(
        "Look up a tenant network",
        vec![
            Attribute::optional_computed("name", Str),
            Attribute::optional_computed("description", Str),
            Attribute::optional_computed("plane", Str),
            Attribute::optional_computed("status", Str),
            Attribute::optional_computed("tenant_id", Str),
            Attribute::computed("admin_state_up", Bool),
            Attribute::computed("shared", Bool),
            Attribute::computed("subnets", List),
            Attribute::computed("tags", MapAttr),
        ],
    )
}

fn internet_gateway_data_schema() -> Schema {
    Schema::new(
        "Look up an internet gateway",
        vec![
            Attribute::optional_computed("name", Str),
            Attribute::optional_computed("description", Str),
            Attribute::optional_computed("internet_service_id", Str),
            Attribute::optional_computed("qos_option_id", Str),
            Attribute::optional_computed("status", Str),
            Attribute::optional_computed("tenant_id", Str),
        ],
    )
}

fn public_ip_data_schema() -> Schema {
    Schema::new(
        "Look up a public IP block",
        vec![
            Attribute::optional_computed("id", Str),
            Attribute::optional_computed("name", Str),
            Attribute::optional_computed("description", Str),
            Attribute::optional_computed("internet_gw_id", Str),
            Attribute::optional_computed("submask_length", Int),
            Attribute::optional_computed("cidr", Str),
            Attribute::optional_computed("status", Str),
            Attribute::optional_computed("tenant_id", Str),
        ],
    )
}

fn fic_gateway_data_schema() -> Schema {
    Schema::new(
        "Look up a FIC gateway",
        vec![
            Attribute::optional_computed("id", Str),
            Attribute::optional_computed("name", Str),
            Attribute::optional_computed("description", Str),
            Attribute::optional_computed("fic_service_id", Str),
            Attribute::optional_computed("qos_option_id", Str),
            Attribute::optional_computed("status", Str),
            Attribute::optional_computed("tenant_id", Str),
        ],
    )
}

fn device_data_schema() -> Schema {
    Schema::new(
        "Look up a managed security device",
        vec![
            Attribute::optional("locale", Str).describe("`ja` or `en`"),
            Attribute::optional_computed("msa_device_type", Str),
            Attribute::optional_computed("os_server_name", Str),
            Attribute::optional_computed("os_server_id", Str),
            Attribute::optional_computed("os_availability_zone", Str),
            Attribute::computed("msa_device_id", Str),
            Attribute::computed("os_admin_username", Str),
            Attribute::computed("os_server_status", Str),
        ],
    )
}
