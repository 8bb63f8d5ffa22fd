//! Compute service (`v2/<tenant>`) and its block storage companion
//!
//! Servers and volumes list through `/detail` and page with
//! `<plural>_links`. Creates are accepted asynchronously (`202`) and the
//! resource converges server-side; see [`servers::wait_for_status`] and
//! [`volumes::wait_for_status`].

pub mod keypairs;
pub mod servers;
pub mod volumes;
