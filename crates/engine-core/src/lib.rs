pub mod error;
pub mod ops;
pub mod queue;
pub mod throttle;
