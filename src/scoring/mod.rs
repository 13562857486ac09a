pub mod action;
pub use action::*;

pub mod bonus;
pub use bonus::*;

pub mod change;
pub use change::*;

pub mod dealer;
pub use dealer::*;

pub mod error;
pub use error::*;
