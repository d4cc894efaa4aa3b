//! Ports: the render API offered, the adapter and store capabilities used.

pub mod inbound;
pub mod outbound;
