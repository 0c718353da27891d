pub mod color;
pub mod constants;
pub mod system;
pub mod types;
