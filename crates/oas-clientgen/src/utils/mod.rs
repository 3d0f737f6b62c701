pub mod spec;
pub mod text;
pub mod writer;
