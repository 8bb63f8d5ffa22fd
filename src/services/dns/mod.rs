//! DNS service (`v2`)
//!
//! Designate-style API: single objects come back without an envelope and
//! lists page through `links.next`.

pub mod recordsets;
pub mod zones;
