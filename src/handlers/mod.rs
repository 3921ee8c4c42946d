pub mod credit_history;
pub mod edition;
pub mod title;

pub use credit_history::credit_history_config;
pub use edition::edition_config;
pub use title::title_config;
