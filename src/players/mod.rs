pub mod player;
pub use player::*;

pub mod registry;
pub use registry::*;
