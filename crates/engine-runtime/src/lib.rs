pub mod batch;
pub mod context;
pub mod error;
pub mod queue;
