//! Post persistence and the service layer on top of it.

pub mod client;
pub mod memory;
mod record;
pub mod service;
pub mod store;
