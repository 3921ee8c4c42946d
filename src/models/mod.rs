pub mod common;
pub mod credit_history;
pub mod edition;
pub mod pagination;
pub mod title;

pub use common::*;
pub use credit_history::*;
pub use edition::*;
pub use pagination::*;
pub use title::*;
