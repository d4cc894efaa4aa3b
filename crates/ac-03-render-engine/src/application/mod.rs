//! Application layer: the render service and the subscription driver.

pub mod service;
pub mod subscription;
