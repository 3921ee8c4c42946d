pub mod base_titles;
pub mod buyed_titles;
pub mod credit_histories;
pub mod draw_items;
pub mod editions;
pub mod titles;
pub mod users;

pub use base_titles as base_title_entity;
pub use buyed_titles as buyed_title_entity;
pub use credit_histories as credit_history_entity;
pub use draw_items as draw_item_entity;
pub use editions as edition_entity;
pub use titles as title_entity;
pub use users as user_entity;

pub use base_titles::Dozens;
pub use buyed_titles::{PaymentForm, PaymentStatus};
pub use credit_histories::{CreditStatus, DepositType};
pub use editions::EditionStatus;
