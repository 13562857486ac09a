pub mod advisor;
pub use advisor::*;

pub mod batch;
pub use batch::*;
