//! Object-store contracts, wire types, and in-process adapters.

pub mod memory;
pub mod service;
pub mod types;
