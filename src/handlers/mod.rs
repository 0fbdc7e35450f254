// handlers/mod.rs - HTTP handlers
//
// authors: the author resource; access rules come from the route table and are
// enforced by middleware::auth before these run.
// system: service description and health probe, always anonymous.

pub mod authors;
pub mod system;
