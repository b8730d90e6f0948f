//! Handler module declarations and re-exports

pub mod export;
pub mod file;
pub mod histogram;
pub mod query;
pub mod rows;

// Re-export all handlers for convenient access
pub use export::*;
pub use file::*;
pub use histogram::*;
pub use query::*;
pub use rows::*;
