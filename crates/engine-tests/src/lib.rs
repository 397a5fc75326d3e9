#![allow(dead_code)]

pub mod utils;

mod batch_copy;
mod batch_delete;
