//! Ports module
//!
//! Hexagonal architecture interfaces: inbound use cases consumed by the
//! HTTP layer and timer, outbound contracts the infrastructure fulfils.

pub mod inbound;
pub mod outbound;
