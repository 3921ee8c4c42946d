pub mod base_title_service;
pub mod credit_history_service;
pub mod edition_service;
pub mod title_service;

pub use base_title_service::*;
pub use credit_history_service::*;
pub use edition_service::*;
pub use title_service::*;
