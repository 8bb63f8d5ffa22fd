//! Network service (`v2.0`)
//!
//! Neutron-style collections: list responses carry `<plural>_links` with a
//! `rel: next` entry, updates answer `200`.

pub mod fic_gateways;
pub mod internet_gateways;
pub mod networks;
pub mod public_ips;
pub mod subnets;
