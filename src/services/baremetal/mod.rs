//! Baremetal server service (`v2/<tenant>`)

pub mod servers;
