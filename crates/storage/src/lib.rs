pub mod error;
pub mod memory;
pub mod registry;
pub mod store;
