pub mod badge;
pub mod card;
pub mod field;

pub use badge::status_badge;
pub use card::card;
pub use field::{error_summary, field_error};
