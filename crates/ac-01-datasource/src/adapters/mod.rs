//! Reference adapter implementations

pub mod database;
pub mod fixture;
pub mod rest;
