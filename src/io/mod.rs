//! CSV input and output.

pub mod export;
pub mod table;
