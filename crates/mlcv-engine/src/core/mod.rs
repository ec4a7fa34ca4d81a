pub mod ids;
pub mod visualization;
