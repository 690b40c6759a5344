//! Domain model shared by the folio store and HTTP crates.

pub mod model;
