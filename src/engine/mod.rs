pub mod history;
pub use history::*;

pub mod outcome;
pub use outcome::*;

pub mod session;
pub use session::*;

pub mod table;
pub use table::*;
