pub mod row;
pub mod row_ref;
