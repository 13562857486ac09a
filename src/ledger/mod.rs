pub mod pairs;
pub use pairs::*;

pub mod lineage;
pub use lineage::*;
