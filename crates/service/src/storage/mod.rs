//! Storage backends and shared query helpers.

pub mod memory;
pub(crate) mod sql;

pub use memory::MemoryStore;
