//! Material token and palette crate.
#![forbid(unsafe_code)]

pub mod material;

pub use material::{Material, MaterialCatalog, MaterialId};
