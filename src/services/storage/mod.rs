//! Storage service (`v1.0/<tenant>`)
//!
//! Block storage delivered through virtual storages. Lists are unpaginated
//! and every mutating call answers `202`; progress is visible only through
//! the `status` field.

pub mod virtual_storages;
pub mod volumes;
