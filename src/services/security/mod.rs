//! Security service (`v2`)

pub mod devices;
