pub mod config;
pub mod copy;
pub mod delete;
pub mod driver;
