pub mod check_config;
pub mod enhance;

pub use check_config::*;
pub use enhance::*;
