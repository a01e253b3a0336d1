//! HTTP route modules.

pub mod admin;
pub mod leads;
pub mod probes;
