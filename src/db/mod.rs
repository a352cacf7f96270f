pub mod connection;
pub mod drafts;

pub use connection::{init_db, Database};
