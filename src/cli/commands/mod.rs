pub mod render;
pub mod scan;
